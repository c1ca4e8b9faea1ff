//! Wire constants for the instrument cluster's gauge receivers
//!
//! Identifiers and fixed payload bytes were found by observing the cluster on
//! the bench. The receivers ignore frames whose fixed bytes differ, so these
//! must be emitted verbatim.

/// Coolant temperature gauge (repurposed for outdoor temperature).
pub const COOLANT_TEMP_ID: u32 = 0x3B4;

/// Fuel gauge (repurposed for tide level).
pub const FUEL_ID: u32 = 0x7C0;

/// Speedometer (repurposed for the hour).
pub const SPEED_ID: u32 = 0x0B4;

/// Tachometer (repurposed for the minute).
pub const RPM_ID: u32 = 0x2C4;

/// ABS and brake warning lamp state.
pub const WARNING_LIGHTS_ID: u32 = 0x3B7;

/// Leading byte of the coolant frame. `0x46` also switches off the steering
/// and TPMS lamps on this cluster model.
pub const COOLANT_TEMP_PREFIX: [u8; 2] = [0x46, 0x00];

/// Leading bytes of the fuel frame; the level follows at offset 4.
pub const FUEL_PREFIX: [u8; 4] = [0x04, 0x30, 0x03, 0x00];

/// Trailing state bytes the speedometer receiver expects after the value.
pub const SPEED_SUFFIX: [u8; 2] = [0x66, 0xB5];

/// Payload that turns off the ABS, yellow brake and red brake lamps.
pub const WARNING_LIGHTS_OFF: [u8; 8] = [0xA9, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Upper bound on the cycle period. Needles visibly wobble when frames arrive
/// less often than this.
pub const MAX_CYCLE_INTERVAL_MS: u64 = 100;

/// Default cycle period, kept under [`MAX_CYCLE_INTERVAL_MS`] with margin.
pub const DEFAULT_CYCLE_INTERVAL_MS: u64 = 70;
