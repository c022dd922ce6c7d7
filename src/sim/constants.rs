/**
 * AQI shown on the dashboard when the session starts.
 */
pub const AQI_INITIAL: u16 = 42;

/**
 * Bounds of the simulated AQI walk.
 */
pub const AQI_MIN: u16 = 35;
pub const AQI_MAX: u16 = 55;

/**
 * How often (milliseconds) the simulated AQI moves.
 */
pub const AQI_TICK: u64 = 3000;

/**
 * Largest change of the AQI in a single tick, in either direction.
 */
pub const AQI_MAX_STEP: i32 = 1;
