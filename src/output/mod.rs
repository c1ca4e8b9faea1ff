mod candump;
mod csv;
mod json;

use chrono::Utc;

pub use self::candump::CandumpFormatter;
pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
use crate::frame::GaugeFrame;

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    Candump,
    Json,
    Csv,
}

/// Renders frames for dry-run output instead of writing them to the bus.
pub trait FrameFormatter: Send {
    fn format(&self, interface: &str, frame: &GaugeFrame) -> String;

    fn header(&self) -> Option<&'static str> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, timestamps: bool) -> Box<dyn FrameFormatter> {
    match format {
        OutputFormat::Candump => Box::new(CandumpFormatter::new(timestamps)),
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub fn timestamp_millis() -> u64 {
    Utc::now().timestamp_millis() as u64
}
