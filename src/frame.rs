//! Gauge frame encoding
//!
//! Each gauge receiver listens on one standard 11-bit identifier and expects an
//! exact 8-byte layout. Encoders here are pure; the matching decoders recover
//! the gauge value from a frame and return `None` when the identifier or any
//! fixed byte does not match.

use std::fmt;

use crate::constants::{
    COOLANT_TEMP_ID, COOLANT_TEMP_PREFIX, FUEL_ID, FUEL_PREFIX, RPM_ID, SPEED_ID, SPEED_SUFFIX,
    WARNING_LIGHTS_ID, WARNING_LIGHTS_OFF,
};

pub const FRAME_LEN: usize = 8;

/// One frame addressed to a gauge receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GaugeFrame {
    pub id: u32,
    pub data: [u8; FRAME_LEN],
}

impl GaugeFrame {
    pub const fn new(id: u32, data: [u8; FRAME_LEN]) -> Self {
        Self { id, data }
    }

    /// Payload as contiguous uppercase hex, e.g. `A900000000000000`.
    pub fn data_hex(&self) -> String {
        self.data.iter().map(|b| format!("{:02X}", b)).collect()
    }
}

impl fmt::Display for GaugeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03X}#{}", self.id, self.data_hex())
    }
}

/// Coolant gauge frame carrying a mapped temperature.
pub fn encode_temperature(value: u8) -> GaugeFrame {
    let mut data = [0u8; FRAME_LEN];
    data[..2].copy_from_slice(&COOLANT_TEMP_PREFIX);
    data[2] = value;
    GaugeFrame::new(COOLANT_TEMP_ID, data)
}

/// Fuel gauge frame carrying a discrete stepper position.
pub fn encode_fuel(position: u8) -> GaugeFrame {
    let mut data = [0u8; FRAME_LEN];
    data[..4].copy_from_slice(&FUEL_PREFIX);
    data[4] = position;
    GaugeFrame::new(FUEL_ID, data)
}

/// Speedometer frame; the value sits big-endian in bytes 4-5.
pub fn encode_speed(value: u16) -> GaugeFrame {
    let [hi, lo] = value.to_be_bytes();
    GaugeFrame::new(
        SPEED_ID,
        [0, 0, 0, 0, hi, lo, SPEED_SUFFIX[0], SPEED_SUFFIX[1]],
    )
}

/// Tachometer frame. The receiver takes the 32-bit big-endian value with its
/// byte order reversed, least significant byte first.
pub fn encode_rpm(value: u32) -> GaugeFrame {
    let be = value.to_be_bytes();
    GaugeFrame::new(RPM_ID, [be[3], be[2], be[1], be[0], 0, 0, 0, 0])
}

/// Constant frame that keeps the ABS and brake lamps dark.
pub const fn warning_suppression() -> GaugeFrame {
    GaugeFrame::new(WARNING_LIGHTS_ID, WARNING_LIGHTS_OFF)
}

pub fn decode_temperature(frame: &GaugeFrame) -> Option<u8> {
    let valid = frame.id == COOLANT_TEMP_ID
        && frame.data[..2] == COOLANT_TEMP_PREFIX
        && frame.data[3..].iter().all(|&b| b == 0);
    valid.then_some(frame.data[2])
}

pub fn decode_fuel(frame: &GaugeFrame) -> Option<u8> {
    let valid = frame.id == FUEL_ID
        && frame.data[..4] == FUEL_PREFIX
        && frame.data[5..].iter().all(|&b| b == 0);
    valid.then_some(frame.data[4])
}

pub fn decode_speed(frame: &GaugeFrame) -> Option<u16> {
    let valid = frame.id == SPEED_ID
        && frame.data[..4].iter().all(|&b| b == 0)
        && frame.data[6..] == SPEED_SUFFIX;
    valid.then(|| u16::from_be_bytes([frame.data[4], frame.data[5]]))
}

pub fn decode_rpm(frame: &GaugeFrame) -> Option<u32> {
    let valid = frame.id == RPM_ID && frame.data[4..].iter().all(|&b| b == 0);
    valid.then(|| {
        u32::from_be_bytes([frame.data[3], frame.data[2], frame.data[1], frame.data[0]])
    })
}
