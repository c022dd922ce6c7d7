use std::time::{Duration, SystemTime};
use log::{debug, info};
use tokio::time::Instant;

use crate::config::types::{DeviceSeed, Timings};
use crate::device::types::{CalibrationPhase, DeviceSnapshot};

/// Exit transitions waiting for their delay to elapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    ScanComplete,
    SyncComplete,
    CalibrationComplete,
    CalibrationExpired,
}

#[derive(Debug)]
struct PendingTimer {
    due: Instant,
    // registration order, breaks ties between timers that are due at the same instant
    seq: u64,
    deferred: Deferred,
}

/// The connection and calibration state machine of the clip.
///
/// Time is passed in by the caller, which makes every transition deterministic: commands
/// apply their entry transition right away and queue a [`Deferred`] exit transition, and
/// [`DeviceLifecycle::fire_due`] applies whatever has expired by the given instant.
#[derive(Debug)]
pub struct DeviceLifecycle {
    state: DeviceSnapshot,
    timings: Timings,
    // kept sorted by (due, seq)
    pending: Vec<PendingTimer>,
    next_seq: u64,
}

impl DeviceLifecycle {
    pub fn new(seed: &DeviceSeed, timings: Timings, started_at: SystemTime) -> Self {
        DeviceLifecycle {
            state: DeviceSnapshot::from_seed(seed, started_at),
            timings,
            pending: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn snapshot(&self) -> &DeviceSnapshot {
        &self.state
    }

    pub fn pending_timers(&self) -> usize {
        self.pending.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.first().map(|timer| timer.due)
    }

    fn schedule(&mut self, due: Instant, deferred: Deferred) {
        let seq = self.next_seq;
        self.next_seq += 1;

        let index = self.pending.partition_point(|timer| (timer.due, timer.seq) <= (due, seq));
        self.pending.insert(index, PendingTimer { due, seq, deferred });
    }

    fn schedule_after(&mut self, from: Instant, delay: Duration, deferred: Deferred) {
        self.schedule(from + delay, deferred);
    }

    /// Returns false if the request was ignored because a scan is running or the clip is
    /// already connected.
    pub fn start_scan(&mut self, now: Instant) -> bool {
        if self.state.is_connected || self.state.is_scanning {
            debug!(
                "Ignoring scan request (connected: {}, scanning: {})",
                self.state.is_connected, self.state.is_scanning,
            );
            return false;
        }

        info!("Scanning for the clip...");
        self.state.is_scanning = true;
        self.schedule_after(now, self.timings.scan(), Deferred::ScanComplete);
        true
    }

    pub fn connect(&mut self) {
        if !self.state.is_connected {
            info!("Clip connected");
        }
        self.state.is_connected = true;
    }

    pub fn disconnect(&mut self) {
        if self.state.is_connected {
            info!("Clip disconnected");
        }
        self.state.is_connected = false;
    }

    /// Always accepted, even while disconnected.
    pub fn sync(&mut self, now: Instant) -> bool {
        if !self.state.is_connected {
            debug!("Syncing while disconnected");
        }

        self.state.is_syncing = true;
        self.schedule_after(now, self.timings.sync(), Deferred::SyncComplete);
        true
    }

    /// Returns false if a calibration is running or its success indicator is still shown.
    pub fn calibrate(&mut self, now: Instant) -> bool {
        if self.state.calibration != CalibrationPhase::Idle {
            debug!("Ignoring calibration request ({:?})", self.state.calibration);
            return false;
        }

        info!("Calibrating...");
        self.state.calibration = CalibrationPhase::Calibrating;
        self.schedule_after(now, self.timings.calibration(), Deferred::CalibrationComplete);
        true
    }

    /// Applies every deferred transition due at or before `now`, in the order the delays
    /// expire. Returns how many were applied.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let mut fired = 0;

        while let Some(first) = self.pending.first() {
            if first.due > now {
                break;
            }

            let timer = self.pending.remove(0);
            self.apply(timer.deferred, timer.due);
            fired += 1;
        }

        fired
    }

    // `due` is when the timer expired, which may be earlier than the caller's now. Follow-up
    // timers are measured from there.
    fn apply(&mut self, deferred: Deferred, due: Instant) {
        match deferred {
            Deferred::ScanComplete => {
                info!("Scan complete, clip connected");
                self.state.is_scanning = false;
                self.state.is_connected = true;
            },
            Deferred::SyncComplete => {
                // the last synced timestamp is deliberately left untouched
                info!("Sync complete");
                self.state.is_syncing = false;
            },
            Deferred::CalibrationComplete => {
                info!("Calibration succeeded");
                self.state.calibration = CalibrationPhase::Succeeded;
                self.schedule_after(due, self.timings.calibration_success(), Deferred::CalibrationExpired);
            },
            Deferred::CalibrationExpired => {
                debug!("Calibration success indicator cleared");
                self.state.calibration = CalibrationPhase::Idle;
            },
        }
    }
}
