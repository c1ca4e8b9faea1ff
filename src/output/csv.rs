use super::{FrameFormatter, timestamp_millis};
use crate::frame::GaugeFrame;

pub struct CsvFormatter;

impl FrameFormatter for CsvFormatter {
    fn format(&self, interface: &str, frame: &GaugeFrame) -> String {
        format!(
            "{},{},{:03X},{}",
            timestamp_millis(),
            interface,
            frame.id,
            frame.data_hex()
        )
    }

    fn header(&self) -> Option<&'static str> {
        Some("timestamp_ms,interface,id,data")
    }
}
