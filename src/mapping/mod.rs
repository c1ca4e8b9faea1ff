//! Domain values to gauge-native values
//!
//! Every function here is total over its clamped domain and never fails.

pub mod clock;
pub mod fuel;
pub mod segmented;

pub use clock::{ClockReading, map_clock_to_rpm, map_clock_to_speed};
pub use fuel::{fuel_position_to_percent, map_tide_to_fuel_position};
pub use segmented::{
    MappingRange, Segment, TEMPERATURE_RANGE, map_temperature_to_gauge, map_to_gauge_range,
};
