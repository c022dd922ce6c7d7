use std::convert::Infallible;
use futures::SinkExt;
use futures::channel::mpsc::Sender;
use iced::subscription::{self, Subscription};
use log::{info, warn};

use crate::device::controller::DeviceController;
use crate::device::types::DeviceEvent;

async fn forward_device_state(controller: DeviceController, mut sender: Sender<DeviceEvent>) {
    let mut receiver = controller.subscribe();
    // the receiver alone does not keep the controller alive
    drop(controller);

    loop {
        let snapshot = receiver.borrow_and_update().clone();
        if let Err(err) = sender.send(DeviceEvent::StateChange(snapshot)).await {
            warn!("Failed to forward device state: {:?}", err);
        }

        if receiver.changed().await.is_err() {
            info!("Device controller is gone, no more state changes to forward");
            return;
        }
    }
}

/// Streams every state change of `controller` into the GUI, starting with the current state.
pub fn device_subscription(controller: DeviceController) -> Subscription<DeviceEvent> {
    struct ForwardDeviceState;

    subscription::channel(
        std::any::TypeId::of::<ForwardDeviceState>(),
        64,
        move |subscription_sender| async move {
            forward_device_state(controller, subscription_sender).await;

            // note: subscription::channel expects the future to never resolve (Infallible)
            std::future::pending::<Infallible>().await
        },
    )
}
