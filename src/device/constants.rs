/**
 * How long (milliseconds) a scan takes before the clip reports as connected.
 */
pub const SCAN_DELAY: u64 = 3000;

/**
 * How long (milliseconds) the sync indicator stays on.
 */
pub const SYNC_DELAY: u64 = 2000;

/**
 * How long (milliseconds) the calibration self-check runs.
 */
pub const CALIBRATION_DELAY: u64 = 2000;

/**
 * How long (milliseconds) the calibration success indicator is displayed before it clears.
 */
pub const CALIBRATION_SUCCESS_WINDOW: u64 = 3000;

/**
 * Battery charge (percent) the clip reports when the session starts.
 */
pub const DEFAULT_BATTERY_LEVEL: u8 = 84;

pub const MAX_BATTERY_LEVEL: u8 = 100;

pub const DEVICE_NAME: &str = "AirSense Clip";

/**
 * The phone the clip pretends to be paired with.
 */
pub const HOST_NAME: &str = "iPhone 14 Pro";
