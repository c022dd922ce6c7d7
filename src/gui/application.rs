use iced::{Alignment, Application, Color, Command, Element, Length, Settings, Size, Subscription, window};
use iced::event::{self, Event};
use iced::theme::{self, Theme};
use iced::widget::{
    Canvas, Space, button, column, container, horizontal_rule, row, text, toggler,
};
use iced::window::icon;
use log::{error, info};
use tokio::runtime::Runtime;
use tokio_util::sync::{CancellationToken};

use crate::config::io::{ConfigIO};
use crate::config::types::{Config, Preferences};
use crate::device::controller::DeviceController;
use crate::device::subscription::device_subscription;
use crate::device::types::{DeviceEvent, DeviceSnapshot};
use crate::error::AppRunError;
use crate::gui::ring::{AqiRingProgram, PulseProgram};
use crate::gui::style::{BadgeStyleSheet, CardStyleSheet, tone_color};
use crate::gui::types::Message;
use crate::options::Options;
use crate::sim::air_quality_sim::{AirQualityEvent, air_quality_subscription};
use crate::view::{Badge, Tone};
use crate::view::aqi::RING_BOX;
use crate::view::dashboard::{CalibrateButton, DashboardView, FORECAST_STATION, ForecastSlot};
use crate::view::device::{DeviceAction, DeviceView};

pub struct ApplicationFlags {
    app_cancel: CancellationToken,
    device: DeviceController,
    config: Config,
    notices: Vec<String>,
}

pub struct AirSenseApplication {
    // this token is cancelled upon exit
    app_cancel: CancellationToken,

    // messages that the user must click away
    notices: Vec<String>,

    config: Config,
    // session only, starts from the config file
    preferences: Preferences,

    device: DeviceController,
    // latest state from the device controller
    latest_device_state: DeviceSnapshot,
    latest_aqi: u16,
}

impl AirSenseApplication {
    fn before_close(&mut self) {
        self.device.dispose();
        self.app_cancel.cancel();
    }

    fn dashboard_panel(&self) -> Element<Message> {
        let view = DashboardView::new(&self.latest_device_state, self.latest_aqi);

        let presses = DashboardPresses::new(&view);

        let mut sync_button = button(text(view.sync_label()).size(12))
            .style(theme::Button::Secondary);
        if let Some(message) = presses.sync {
            sync_button = sync_button.on_press(message);
        }

        let calibrate_label = match view.calibrate {
            CalibrateButton::Ready => "Calibrate",
            CalibrateButton::Running => "Calibrating…",
            CalibrateButton::Succeeded => "Calibrated ✓",
        };
        let mut calibrate_button = button(text(calibrate_label).size(12))
            .style(match view.calibrate {
                CalibrateButton::Succeeded => theme::Button::Positive,
                _ => theme::Button::Secondary,
            });
        if let Some(message) = presses.calibrate {
            calibrate_button = calibrate_button.on_press(message);
        }

        let forecast = view.forecast.iter().fold(row![].spacing(8), |strip, slot| {
            strip.push(forecast_tile(slot))
        });

        card(
            column![
                row![
                    text("Morning").size(24),
                    Space::with_width(Length::Fill),
                    sync_button,
                    calibrate_button,
                    badge(&view.badge),
                ].align_items(Alignment::Center).spacing(8),

                column![
                    Canvas::new(AqiRingProgram(view.ring))
                        .width(RING_BOX)
                        .height(RING_BOX),
                    text(view.aqi).size(64).style(tone_color(view.ring.tone)),
                    text("AQI MY").size(10).style(tone_color(Tone::Neutral)),
                    text(view.headline()).size(20),
                ].align_items(Alignment::Center).spacing(12),

                row![
                    tile("PM2.5", format!("{} µg/m³", view.pm25)),
                    tile("Humidity", format!("{} %", view.humidity)),
                ].spacing(12),

                column![
                    row![
                        text("Hourly Forecast").size(14),
                        Space::with_width(Length::Fill),
                        text(FORECAST_STATION).size(10).style(tone_color(Tone::Neutral)),
                    ].align_items(Alignment::Center),
                    forecast,
                ].spacing(8),

                text(format!("Last synced {}", view.last_synced))
                    .size(12)
                    .style(tone_color(Tone::Neutral)),
            ].spacing(24)
        )
    }

    fn device_panel(&self) -> Element<Message> {
        let view = DeviceView::new(&self.latest_device_state, self.preferences);

        let status_tone = view.artwork_tone();
        let badge_element: Element<Message> = match &view.badge {
            Some(online) => badge(online),
            None => Space::with_width(Length::Shrink).into(),
        };
        let battery = match view.battery_level {
            Some(level) => format!("Battery {}%", level),
            None => "Battery unavailable".to_string(),
        };

        let action: Element<Message> = match view.action {
            DeviceAction::Disconnect => button(text("Disconnect Device"))
                .style(theme::Button::Destructive)
                .width(Length::Fill)
                .on_press(Message::Disconnect)
                .into(),
            DeviceAction::Scan { enabled, label } => {
                let mut scan = button(text(label))
                    .style(theme::Button::Positive)
                    .width(Length::Fill);
                if enabled {
                    scan = scan.on_press(Message::StartScan);
                }

                let mut reconnect = button(text("Reconnect"))
                    .style(theme::Button::Secondary);
                if enabled {
                    reconnect = reconnect.on_press(Message::Connect);
                }

                row![scan, reconnect].spacing(8).into()
            },
        };

        card(
            column![
                column![
                    text("My Device").size(24),
                    text(format!("Manage your {}.", view.title))
                        .size(12)
                        .style(tone_color(Tone::Neutral)),
                ].spacing(4),

                column![
                    Canvas::new(PulseProgram { tone: view.artwork_tone(), pulsing: view.pulsing })
                        .width(96.0)
                        .height(96.0),
                    row![text(view.title).size(18), badge_element]
                        .align_items(Alignment::Center)
                        .spacing(8),
                    text(&view.status_line).size(12).style(tone_color(status_tone)),
                    text(battery).size(12).style(tone_color(Tone::Neutral)),
                ].align_items(Alignment::Center).spacing(6).width(Length::Fill),

                horizontal_rule(10),

                text("CONFIGURATIONS").size(10).style(tone_color(Tone::Neutral)),
                toggler(String::from("Bluetooth"), view.preferences.bluetooth, Message::BluetoothToggled),
                toggler(String::from("Auto-Sync"), view.preferences.auto_sync, Message::AutoSyncToggled),

                action,
            ].spacing(20)
        )
    }
}

fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(theme::Container::Custom(Box::new(CardStyleSheet)))
        .into()
}

fn badge<'a>(badge: &Badge) -> Element<'a, Message> {
    container(text(badge.label).size(10))
        .padding([2, 8])
        .style(theme::Container::Custom(Box::new(BadgeStyleSheet(badge.tone))))
        .into()
}

fn forecast_tile<'a>(slot: &ForecastSlot) -> Element<'a, Message> {
    let color = tone_color(slot.tone);
    let dot = if slot.highlighted { color } else { Color { a: 0.5, ..color } };

    container(
        column![
            text(slot.label).size(10).style(tone_color(Tone::Neutral)),
            text("●").size(8).style(dot),
            text(slot.aqi).size(18),
        ].align_items(Alignment::Center).spacing(6)
    )
        .padding([12, 8])
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(CardStyleSheet)))
        .into()
}

/// What the dashboard buttons send when pressed, `None` disables the button.
struct DashboardPresses {
    // every press schedules its own completion, the spinner does not block further presses
    sync: Option<Message>,
    calibrate: Option<Message>,
}

impl DashboardPresses {
    fn new(view: &DashboardView) -> Self {
        DashboardPresses {
            sync: Some(Message::Sync),
            calibrate: view.calibrate.enabled().then_some(Message::Calibrate),
        }
    }
}

fn tile<'a>(label: &'a str, value: String) -> Element<'a, Message> {
    container(
        column![
            text(label).size(10).style(tone_color(Tone::Neutral)),
            text(value).size(18),
        ].spacing(4)
    )
        .padding(16)
        .width(Length::Fill)
        .style(theme::Container::Custom(Box::new(CardStyleSheet)))
        .into()
}

impl Application for AirSenseApplication {
    type Executor = iced::executor::Default;
    type Message = Message;
    type Theme = Theme;
    type Flags = ApplicationFlags;

    fn new(flags: ApplicationFlags) -> (AirSenseApplication, Command<Self::Message>) {
        let latest_device_state = flags.device.snapshot();

        let app = AirSenseApplication {
            app_cancel: flags.app_cancel,
            notices: flags.notices,
            preferences: flags.config.preferences,
            latest_aqi: flags.config.air_quality.initial,
            config: flags.config,
            device: flags.device,
            latest_device_state,
        };

        (app, Command::none())
    }

    fn title(&self) -> String {
        String::from(concat!("AirSense ", env!("CARGO_PKG_VERSION")))
    }

    fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn update(&mut self, message: Message) -> Command<Self::Message> {
        match message {
            Message::NoticeConfirmed => {
                if !self.notices.is_empty() {
                    self.notices.remove(0);
                }
            },
            Message::EventOccurred(Event::Window(id, window::Event::CloseRequested)) => {
                info!("Close requested");
                self.before_close();
                return window::close(id);
            },
            Message::DeviceEvent(DeviceEvent::StateChange(state)) => {
                self.latest_device_state = state;
            },
            Message::AirQualityEvent(AirQualityEvent::Reading(aqi)) => {
                self.latest_aqi = aqi;
            },

            Message::StartScan => self.device.start_scan(),
            Message::Connect => self.device.connect(),
            Message::Disconnect => self.device.disconnect(),
            Message::Sync => self.device.sync(),
            Message::Calibrate => self.device.calibrate(),

            Message::BluetoothToggled(on) => {
                self.preferences.bluetooth = on;
            },
            Message::AutoSyncToggled(on) => {
                self.preferences.auto_sync = on;
            },

            _ => {}
        }

        Command::none()
    }

    fn subscription(&self) -> Subscription<Message> {
        Subscription::batch([
            event::listen().map(Message::EventOccurred),
            device_subscription(self.device.clone())
                .map(Message::DeviceEvent),
            air_quality_subscription(self.app_cancel.clone(), self.config.air_quality)
                .map(Message::AirQualityEvent),
        ])
    }

    fn view(&self) -> Element<Message> {
        if let Some(notice) = self.notices.first() {
            return container(
                column![
                    text(notice),

                    button(text("Okay"))
                        .on_press(Message::NoticeConfirmed),

                ].align_items(Alignment::Center).spacing(20),
            )
            .width(Length::Fill)
            .padding(20)
            .into()
        }

        container(
            row![
                self.dashboard_panel(),
                self.device_panel(),
            ].spacing(20),
        )
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(20)
        .into()
    }
}

fn make_icon() -> Option<icon::Icon> {
    let bytes = include_bytes!(concat!(env!("OUT_DIR"), "/icon-32-rgba"));

    match icon::from_rgba(bytes.to_vec(), 32, 32) {
        Ok(icon) => Some(icon),
        Err(err) => {
            error!("Failed to load window icon: {:?}", err);
            None
        },
    }
}

async fn load_config(config_io: &ConfigIO) -> (Config, Vec<String>) {
    match config_io.read().await {
        Ok(config) => (config, Vec::new()),
        Err(err) => {
            let mut notices = Vec::new();

            if err.is_file_not_found_error() {
                info!("Config file not found, using defaults");
            } else {
                error!("Failed to load config: {:?}", &err);
                notices.push(format!("Failed to load config, using defaults: {}", &err));
            }
            (Config::default(), notices)
        }
    }
}

pub fn run_application(options: Options) -> Result<(), AppRunError> {
    let config_io = ConfigIO::new_sync(options.config.as_deref())?;
    let mut config_locker = config_io.locker()?;
    let _lock_guard = config_locker.lock()?;

    // the device controller and its timers live on this runtime, separate from iced's executor
    let runtime = Runtime::new()?;
    let (config, notices) = runtime.block_on(load_config(&config_io));
    let config = options.apply(config);

    let app_cancel = CancellationToken::new();
    let (device, _driver) = {
        let _enter = runtime.enter();
        DeviceController::new(&config.device, config.timings, &app_cancel)
    };

    let flags = ApplicationFlags { app_cancel, device, config, notices };
    let mut settings = Settings::with_flags(flags);

    // handle exits ourselves (Event::CloseRequested)
    settings.id = Some("airsense".to_string());
    settings.window.exit_on_close_request = false;
    settings.window.size = Size::new(960.0, 940.0);
    settings.window.resizable = false;
    settings.window.icon = make_icon();

    // this function will call process::exit() unless there was a startup error
    AirSenseApplication::run(settings)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;
    use tokio::time::sleep;

    use super::*;

    fn application() -> AirSenseApplication {
        let config = Config::default();
        let app_cancel = CancellationToken::new();
        let (device, _driver) = DeviceController::new(&config.device, config.timings, &app_cancel);

        let (app, _) = AirSenseApplication::new(ApplicationFlags {
            app_cancel,
            device,
            config,
            notices: Vec::new(),
        });
        app
    }

    fn dashboard(app: &AirSenseApplication) -> DashboardView {
        DashboardView::new(&app.device.snapshot(), app.latest_aqi)
    }

    #[tokio::test(start_paused = true)]
    async fn sync_stays_pressable_while_spinning() {
        let mut app = application();
        assert!(matches!(DashboardPresses::new(&dashboard(&app)).sync, Some(Message::Sync)));

        let _ = app.update(Message::Sync);
        let view = dashboard(&app);
        assert!(view.sync_spinning);
        assert_eq!(view.sync_label(), "Syncing…");

        let Some(message) = DashboardPresses::new(&view).sync else {
            panic!("sync button is disabled while spinning");
        };
        let _ = app.update(message);
        assert_eq!(app.device.pending_timers(), 2);

        sleep(Duration::from_millis(2001)).await;
        assert!(!app.device.snapshot().is_syncing());
        assert_eq!(app.device.pending_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn calibrate_is_disabled_until_the_cycle_ends() {
        let mut app = application();
        let _ = app.update(Message::Calibrate);
        assert!(DashboardPresses::new(&dashboard(&app)).calibrate.is_none());

        sleep(Duration::from_millis(2001)).await;
        assert_eq!(dashboard(&app).calibrate, CalibrateButton::Succeeded);
        assert!(DashboardPresses::new(&dashboard(&app)).calibrate.is_none());

        sleep(Duration::from_millis(3000)).await;
        assert!(matches!(DashboardPresses::new(&dashboard(&app)).calibrate, Some(Message::Calibrate)));
    }
}
