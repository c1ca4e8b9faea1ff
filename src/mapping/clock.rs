//! Clock-to-needle conversions for the speedometer and tachometer.

use chrono::{NaiveDateTime, Timelike};

/// Highest tachometer reading the conversion accepts before scaling.
pub const RPM_CEILING: u32 = 8000;

/// Speedometer ratio between the usable face and full needle deflection.
const SPEED_FACE_RATIO: f64 = 98.0 / 160.0;

/// Time fields consumed by the clock gauges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    /// Hour on a 12-hour dial, 1-12
    pub hour12: u32,
    /// Fraction of the current hour elapsed, 0.0 up to (not including) 1.0
    pub minute_fraction: f64,
    pub minute: u32,
    pub second: u32,
}

impl ClockReading {
    pub fn from_time(now: &NaiveDateTime) -> Self {
        let (_, hour12) = now.hour12();
        Self {
            hour12,
            minute_fraction: f64::from(now.minute()) / 60.0,
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// Speedometer value for the hour hand.
///
/// The hour is read as tens of mph (3:30 shows 35 mph) and then scaled into
/// the drive unit the gauge expects. The result is truncated.
pub fn map_clock_to_speed(hour12: u32, minute_fraction: f64) -> u16 {
    let speed_mph = (f64::from(hour12) * 100.0 + minute_fraction * 100.0) / 10.0;
    (speed_mph * SPEED_FACE_RATIO) as u16
}

/// Tachometer value for the minute hand.
///
/// The minute and second are read as hundreds and units of rpm (12:34 is
/// 1234 rpm), then divided down by 200. The receiver mis-renders values that
/// are not whole after the division, so the quotient is rounded (ties to even).
pub fn map_clock_to_rpm(minute: u32, second: u32) -> u32 {
    let raw = minute.saturating_mul(100).saturating_add(second).min(RPM_CEILING);
    (f64::from(raw) / 200.0).round_ties_even() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_speed_on_the_hour() {
        assert_eq!(map_clock_to_speed(1, 0.0), 6);
        assert_eq!(map_clock_to_speed(6, 0.0), 36);
        assert_eq!(map_clock_to_speed(12, 0.0), 73);
    }

    #[test]
    fn test_speed_includes_minutes() {
        // 35 mph * 98/160 = 21.44
        assert_eq!(map_clock_to_speed(3, 0.5), 21);
        // 12:59 -> 129.83 mph * 98/160 = 79.52
        assert_eq!(map_clock_to_speed(12, 59.0 / 60.0), 79);
    }

    #[test]
    fn test_rpm_rounding() {
        assert_eq!(map_clock_to_rpm(12, 34), 6);
        assert_eq!(map_clock_to_rpm(0, 0), 0);
        assert_eq!(map_clock_to_rpm(0, 99), 0);
        assert_eq!(map_clock_to_rpm(1, 1), 1);
        assert_eq!(map_clock_to_rpm(59, 59), 30);
    }

    #[test]
    fn test_rpm_ties_round_to_even() {
        assert_eq!(map_clock_to_rpm(13, 0), 6);
        assert_eq!(map_clock_to_rpm(15, 0), 8);
        assert_eq!(map_clock_to_rpm(1, 0), 0);
    }

    #[test]
    fn test_rpm_ceiling() {
        assert_eq!(map_clock_to_rpm(90, 0), 40);
        assert_eq!(map_clock_to_rpm(80, 0), 40);
        assert_eq!(map_clock_to_rpm(50_000_000, 0), 40);
        assert_eq!(map_clock_to_rpm(u32::MAX, u32::MAX), 40);
    }

    #[test]
    fn test_reading_uses_twelve_hour_dial() {
        let reading = ClockReading::from_time(&at(15, 30, 12));
        assert_eq!(reading.hour12, 3);
        assert_eq!(reading.minute, 30);
        assert_eq!(reading.second, 12);
        assert!((reading.minute_fraction - 0.5).abs() < 1e-12);

        assert_eq!(ClockReading::from_time(&at(0, 5, 0)).hour12, 12);
        assert_eq!(ClockReading::from_time(&at(12, 5, 0)).hour12, 12);
    }
}
