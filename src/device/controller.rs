use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::SystemTime;
use log::{debug, info};
use tokio::spawn;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::config::types::{DeviceSeed, Timings};
use crate::device::lifecycle::DeviceLifecycle;
use crate::device::types::DeviceSnapshot;

struct Shared {
    lifecycle: Mutex<DeviceLifecycle>,
    snapshot_sender: watch::Sender<DeviceSnapshot>,
    // cancelled when the controller is disposed or the last handle is dropped
    cancel: CancellationToken,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, DeviceLifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, snapshot: &DeviceSnapshot) {
        self.snapshot_sender.send_if_modified(|current| {
            if current == snapshot {
                return false;
            }
            *current = snapshot.clone();
            true
        });
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Owns the clip's state and is the only thing allowed to change it.
///
/// Clones share the same state. Commands return immediately; exit transitions are applied
/// by a driver task that sleeps until the next deadline. The driver only holds a weak
/// reference, so once the controller is disposed or dropped nothing it had scheduled will
/// touch the state again.
#[derive(Clone)]
pub struct DeviceController {
    shared: Arc<Shared>,
    // wakes the driver when a command schedules a new deadline
    reschedule: Arc<Notify>,
}

impl DeviceController {
    /// Must be called from within a tokio runtime.
    pub fn new(seed: &DeviceSeed, timings: Timings, cancel: &CancellationToken) -> (Self, JoinHandle<()>) {
        let lifecycle = DeviceLifecycle::new(seed, timings, SystemTime::now());
        let (snapshot_sender, _) = watch::channel(lifecycle.snapshot().clone());

        let shared = Arc::new(Shared {
            lifecycle: Mutex::new(lifecycle),
            snapshot_sender,
            cancel: cancel.child_token(),
        });
        let reschedule = Arc::new(Notify::new());

        let handle = drive_deferred_task(
            Arc::downgrade(&shared),
            shared.cancel.clone(),
            reschedule.clone(),
        );

        (DeviceController { shared, reschedule }, handle)
    }

    pub fn snapshot(&self) -> DeviceSnapshot {
        self.shared.lock().snapshot().clone()
    }

    /// The receiver is marked changed whenever a command or a deferred transition produces a
    /// different snapshot.
    pub fn subscribe(&self) -> watch::Receiver<DeviceSnapshot> {
        self.shared.snapshot_sender.subscribe()
    }

    pub fn pending_timers(&self) -> usize {
        self.shared.lock().pending_timers()
    }

    pub fn is_disposed(&self) -> bool {
        self.shared.cancel.is_cancelled()
    }

    /// Stops the driver. Pending transitions are dropped and further commands are ignored.
    pub fn dispose(&self) {
        if !self.is_disposed() {
            info!("Disposing device controller");
            self.shared.cancel.cancel();
        }
    }

    fn command<F>(&self, name: &'static str, f: F)
    where
        F: FnOnce(&mut DeviceLifecycle, Instant) -> bool,
    {
        if self.is_disposed() {
            debug!("Ignoring {} on a disposed device controller", name);
            return;
        }

        let mut lifecycle = self.shared.lock();
        let timers_before = lifecycle.pending_timers();

        if f(&mut lifecycle, Instant::now()) {
            self.shared.publish(lifecycle.snapshot());
        }

        if lifecycle.pending_timers() != timers_before {
            self.reschedule.notify_one();
        }
    }

    pub fn start_scan(&self) {
        self.command("start_scan", |lifecycle, now| lifecycle.start_scan(now));
    }

    pub fn connect(&self) {
        self.command("connect", |lifecycle, _| {
            lifecycle.connect();
            true
        });
    }

    pub fn disconnect(&self) {
        self.command("disconnect", |lifecycle, _| {
            lifecycle.disconnect();
            true
        });
    }

    pub fn sync(&self) {
        self.command("sync", |lifecycle, now| lifecycle.sync(now));
    }

    pub fn calibrate(&self) {
        self.command("calibrate", |lifecycle, now| lifecycle.calibrate(now));
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

fn drive_deferred_task(shared: Weak<Shared>, cancel: CancellationToken, reschedule: Arc<Notify>) -> JoinHandle<()> {
    spawn(async move {
        'mainloop: loop {
            // never hold on to the state across an await
            let deadline = match shared.upgrade() {
                Some(shared) => shared.lock().next_deadline(),
                None => break 'mainloop,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    break 'mainloop;
                },
                _ = reschedule.notified() => {},
                _ = wait_until(deadline) => {
                    let Some(shared) = shared.upgrade() else {
                        debug!("Device state is gone, dropping deferred transition");
                        break 'mainloop;
                    };
                    if cancel.is_cancelled() {
                        break 'mainloop;
                    }

                    let mut lifecycle = shared.lock();
                    if lifecycle.fire_due(Instant::now()) > 0 {
                        shared.publish(lifecycle.snapshot());
                    }
                },
            }
        }

        debug!("Deferred transition driver stopped");
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::sleep;

    use super::*;
    use crate::device::types::CalibrationPhase;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn controller(connected: bool) -> (DeviceController, JoinHandle<()>, CancellationToken) {
        let cancel = CancellationToken::new();
        let seed = DeviceSeed { connected, battery_level: 84 };
        let (controller, handle) = DeviceController::new(&seed, Timings::default(), &cancel);
        (controller, handle, cancel)
    }

    #[tokio::test(start_paused = true)]
    async fn scan_is_visible_immediately_and_completes_later() {
        let (device, _handle, _cancel) = controller(false);

        device.start_scan();
        assert!(device.snapshot().is_scanning());

        sleep(ms(2999)).await;
        assert!(device.snapshot().is_scanning());
        assert!(!device.snapshot().is_connected());

        sleep(ms(2)).await;
        assert!(!device.snapshot().is_scanning());
        assert!(device.snapshot().is_connected());
        assert_eq!(device.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn double_tap_on_scan_schedules_one_timer() {
        let (device, _handle, _cancel) = controller(false);
        device.start_scan();
        device.start_scan();
        device.start_scan();

        assert_eq!(device.pending_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn calibration_cycle_with_real_timers() {
        let (device, _handle, _cancel) = controller(true);
        device.calibrate();
        device.calibrate();
        assert_eq!(device.pending_timers(), 1);

        sleep(ms(2001)).await;
        assert_eq!(device.snapshot().calibration(), CalibrationPhase::Succeeded);

        device.calibrate();
        assert_eq!(device.pending_timers(), 1);

        sleep(ms(3000)).await;
        assert_eq!(device.snapshot().calibration(), CalibrationPhase::Idle);
        assert_eq!(device.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_see_every_transition() {
        let (device, _handle, _cancel) = controller(false);
        let mut receiver = device.subscribe();
        receiver.borrow_and_update();

        device.start_scan();
        assert!(receiver.has_changed().unwrap());
        assert!(receiver.borrow_and_update().is_scanning());

        receiver.changed().await.unwrap();
        assert!(receiver.borrow_and_update().is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn ignored_commands_do_not_notify() {
        let (device, _handle, _cancel) = controller(true);
        let mut receiver = device.subscribe();
        receiver.borrow_and_update();

        device.start_scan();
        device.connect();

        assert!(!receiver.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn disposed_controller_ignores_pending_transitions() {
        let (device, handle, _cancel) = controller(false);
        device.start_scan();
        device.dispose();

        handle.await.unwrap();
        sleep(ms(5000)).await;

        assert!(device.snapshot().is_scanning());
        assert!(!device.snapshot().is_connected());

        device.disconnect();
        device.connect();
        assert!(!device.snapshot().is_connected());
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_controller_stops_the_driver() {
        let (device, handle, _cancel) = controller(false);
        device.start_scan();
        drop(device);

        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn application_cancel_stops_the_driver() {
        let (device, handle, cancel) = controller(true);
        device.sync();
        cancel.cancel();

        handle.await.unwrap();
        assert!(device.is_disposed());

        sleep(ms(2500)).await;
        assert!(device.snapshot().is_syncing());
    }
}
