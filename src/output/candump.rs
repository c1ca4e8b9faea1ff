//! Output in the layout of `candump`, so dry runs can be compared against a
//! capture from the real bus.
//!
//! Example: `  can0  3B7   [8]  A9 00 00 00 00 00 00 00`

use chrono::Utc;

use super::FrameFormatter;
use crate::frame::GaugeFrame;

pub struct CandumpFormatter {
    timestamps: bool,
}

impl CandumpFormatter {
    pub fn new(timestamps: bool) -> Self {
        Self { timestamps }
    }
}

impl FrameFormatter for CandumpFormatter {
    fn format(&self, interface: &str, frame: &GaugeFrame) -> String {
        let bytes = frame
            .data
            .iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(" ");
        let line = format!(
            "  {}  {:03X}   [{}]  {}",
            interface,
            frame.id,
            frame.data.len(),
            bytes
        );

        if self.timestamps {
            let now = Utc::now();
            format!(
                " ({}.{:06}){}",
                now.timestamp(),
                now.timestamp_subsec_micros(),
                line
            )
        } else {
            line
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{encode_temperature, warning_suppression};

    #[test]
    fn test_candump_line() {
        let formatter = CandumpFormatter::new(false);
        assert_eq!(
            formatter.format("can0", &warning_suppression()),
            "  can0  3B7   [8]  A9 00 00 00 00 00 00 00"
        );
        assert_eq!(
            formatter.format("vcan0", &encode_temperature(0xC8)),
            "  vcan0  3B4   [8]  46 00 C8 00 00 00 00 00"
        );
    }

    #[test]
    fn test_candump_timestamp_prefix() {
        let line = CandumpFormatter::new(true).format("can0", &warning_suppression());
        assert!(line.starts_with(" ("));
        assert!(line.ends_with("  can0  3B7   [8]  A9 00 00 00 00 00 00 00"));
    }
}
