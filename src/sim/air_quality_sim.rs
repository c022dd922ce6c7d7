use std::convert::Infallible;
use futures::SinkExt;
use futures::channel::mpsc::Sender;
use iced::subscription::{self, Subscription};
use log::{debug, warn};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::spawn;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::types::AirQualityConfig;
use crate::sim::constants::AQI_MAX_STEP;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AirQualityEvent {
    Reading(u16),
}

/// Bounded random walk standing in for the clip's AQI sensor.
pub struct AqiWalk<R: Rng> {
    value: u16,
    min: u16,
    max: u16,
    rng: R,
}

impl<R: Rng> AqiWalk<R> {
    pub fn new(config: &AirQualityConfig, rng: R) -> Self {
        let min = config.min.min(config.max);
        let max = config.max.max(config.min);

        AqiWalk {
            value: config.initial.clamp(min, max),
            min,
            max,
            rng,
        }
    }

    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn step(&mut self) -> u16 {
        let change = self.rng.gen_range(-AQI_MAX_STEP..=AQI_MAX_STEP);
        let next = (i32::from(self.value) + change).clamp(i32::from(self.min), i32::from(self.max));
        // clamped to a u16 range above
        self.value = next as u16;
        self.value
    }
}

pub fn air_quality_sim<R>(
    cancel: CancellationToken,
    config: AirQualityConfig,
    rng: R,
    mut senders: Vec<Sender<AirQualityEvent>>,
) -> JoinHandle<()>
where
    R: Rng + Send + 'static,
{
    spawn(async move {
        let mut walk = AqiWalk::new(&config, rng);
        let mut ticker = interval_at(Instant::now() + config.tick(), config.tick());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        'mainloop: loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    break 'mainloop;
                },
                _ = ticker.tick() => {
                    let previous = walk.value();
                    let value = walk.step();
                    if value == previous {
                        continue 'mainloop;
                    }

                    debug!("AQI {} -> {}", previous, value);
                    for sender in &mut senders {
                        if let Err(err) = sender.send(AirQualityEvent::Reading(value)).await {
                            warn!("Failed to send AQI reading: {:?}", err);
                        }
                    }
                },
            }
        }
    })
}

pub fn air_quality_subscription(cancel: CancellationToken, config: AirQualityConfig) -> Subscription<AirQualityEvent> {
    struct AirQuality;

    subscription::channel(
        std::any::TypeId::of::<AirQuality>(),
        16,
        move |subscription_sender| async move {
            let _handle = air_quality_sim(cancel, config, StdRng::from_entropy(), vec![subscription_sender]);

            // note: subscription::channel expects the future to never resolve (Infallible)
            std::future::pending::<Infallible>().await
        },
    )
}
