use super::{FrameFormatter, iso8601_timestamp};
use crate::frame::GaugeFrame;

pub struct JsonFormatter;

impl FrameFormatter for JsonFormatter {
    fn format(&self, interface: &str, frame: &GaugeFrame) -> String {
        format!(
            r#"{{"ts":"{}","interface":"{}","id":"0x{:03X}","data":"{}"}}"#,
            iso8601_timestamp(),
            interface,
            frame.id,
            frame.data_hex()
        )
    }
}
