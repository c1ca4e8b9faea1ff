pub mod config;
pub mod constants;
pub mod control;
pub mod error;
pub mod frame;
pub mod mapping;
pub mod output;
pub mod source;
pub mod transport;

pub use config::ClusterConfig;
pub use control::{Clock, ControlLoop, CycleReport, GaugeReadings, SystemClock};
pub use error::{ClusterError, FetchError, Result};
pub use frame::GaugeFrame;
