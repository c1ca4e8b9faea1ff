use crate::error::{ClusterError, Result};

/// Inclusive band of gauge-native output values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub start: u8,
    pub end: u8,
}

impl Segment {
    pub const fn new(start: u8, end: u8) -> Self {
        Self { start, end }
    }

    fn span(&self) -> f64 {
        f64::from(self.end) - f64::from(self.start)
    }
}

/// Two-segment piecewise-linear transform from a domain range onto a gauge.
///
/// The lower half of the input range lands on `lower`, the upper half on
/// `upper`. Whatever lies between the two segments is a dead zone the needle
/// never rests in.
///
/// # Example
/// ```
/// use gaugeclock::mapping::{MappingRange, Segment, map_to_gauge_range};
///
/// let range = MappingRange::new(0.0, 10.0, Segment::new(0, 50), Segment::new(200, 250)).unwrap();
/// assert_eq!(map_to_gauge_range(5.0, &range), 50);
/// assert_eq!(map_to_gauge_range(7.5, &range), 225);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappingRange {
    low: f64,
    high: f64,
    lower: Segment,
    upper: Segment,
}

/// Coolant gauge calibration: 55-100 °F, skipping the band around the
/// midpoint where the needle parks as "normal".
pub const TEMPERATURE_RANGE: MappingRange = MappingRange {
    low: 55.0,
    high: 100.0,
    lower: Segment::new(90, 150),
    upper: Segment::new(215, 255),
};

impl MappingRange {
    /// Build a range, rejecting an empty or inverted domain and segments that
    /// run backwards or overlap.
    pub fn new(low: f64, high: f64, lower: Segment, upper: Segment) -> Result<Self> {
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(ClusterError::Config(format!(
                "mapping range [{}, {}] must be finite with low < high",
                low, high
            )));
        }
        if lower.start > lower.end || upper.start > upper.end || lower.end > upper.start {
            return Err(ClusterError::Config(format!(
                "gauge segments {:?} and {:?} must be ascending and disjoint",
                lower, upper
            )));
        }
        Ok(Self {
            low,
            high,
            lower,
            upper,
        })
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn lower(&self) -> Segment {
        self.lower
    }

    pub fn upper(&self) -> Segment {
        self.upper
    }
}

impl Default for MappingRange {
    fn default() -> Self {
        TEMPERATURE_RANGE
    }
}

/// Map `value` onto the gauge, clamping to the domain first.
///
/// # Panics
/// Panics if `value` is not finite. Callers filter invalid readings before
/// they reach the mapper.
pub fn map_to_gauge_range(value: f64, range: &MappingRange) -> u8 {
    assert!(
        value.is_finite(),
        "mapping input out of domain: {}",
        value
    );

    let clamped = value.clamp(range.low, range.high);
    let pct = (clamped - range.low) / (range.high - range.low);

    let mapped = if pct <= 0.5 {
        f64::from(range.lower.start) + pct * 2.0 * range.lower.span()
    } else {
        f64::from(range.upper.start) + (pct - 0.5) * 2.0 * range.upper.span()
    };

    mapped as u8
}

/// Coolant gauge position for an outdoor temperature in °F.
pub fn map_temperature_to_gauge(temp_f: f64) -> u8 {
    map_to_gauge_range(temp_f, &TEMPERATURE_RANGE)
}
