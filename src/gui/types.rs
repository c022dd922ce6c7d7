use iced::{Event};

use crate::device::types::{DeviceEvent};
use crate::sim::air_quality_sim::AirQualityEvent;

#[derive(Debug, Clone)]
pub enum Message {
    EventOccurred(Event),
    NoticeConfirmed,
    DeviceEvent(DeviceEvent),
    AirQualityEvent(AirQualityEvent),

    // device commands
    StartScan,
    Connect,
    Disconnect,
    Sync,
    Calibrate,

    BluetoothToggled(bool),
    AutoSyncToggled(bool),
}
