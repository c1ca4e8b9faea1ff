//! Configuration for the gauge clock.
//!
//! There is no configuration file. Every setting has a named default here and
//! the binaries override individual fields from the command line.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::TimeDelta;

use crate::constants::{DEFAULT_CYCLE_INTERVAL_MS, MAX_CYCLE_INTERVAL_MS};
use crate::error::{ClusterError, Result};
use crate::mapping::MappingRange;

/// A span of time given on the command line
///
/// # Parsing formats
/// - `70ms` - milliseconds
/// - `30s` or `30` - seconds (no suffix)
/// - `15m` or `15min` - minutes
/// - `2h` - hours
///
/// # Example
/// ```
/// use gaugeclock::config::Interval;
///
/// let interval: Interval = "15min".parse().unwrap();
/// assert_eq!(interval.as_duration().as_secs(), 900);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval(Duration);

impl Interval {
    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub const fn from_mins(mins: u64) -> Self {
        Self(Duration::from_secs(mins * 60))
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self(Duration::from_secs(hours * 3600))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    /// Same span as a calendar delta, for arithmetic on wall-clock times.
    pub fn as_time_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.0).unwrap_or(TimeDelta::MAX)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.0.as_millis();
        if ms % 3_600_000 == 0 && ms > 0 {
            write!(f, "{}h", ms / 3_600_000)
        } else if ms % 60_000 == 0 && ms > 0 {
            write!(f, "{}m", ms / 60_000)
        } else if ms % 1000 == 0 {
            write!(f, "{}s", ms / 1000)
        } else {
            write!(f, "{}ms", ms)
        }
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        // "ms" has to be tried before the single-letter suffixes
        let (num, scale_ms) = if let Some(num) = s.strip_suffix("ms") {
            (num, 1)
        } else if let Some(num) = s.strip_suffix("min") {
            (num, 60_000)
        } else if let Some(num) = s.strip_suffix('m') {
            (num, 60_000)
        } else if let Some(num) = s.strip_suffix('h') {
            (num, 3_600_000)
        } else if let Some(num) = s.strip_suffix('s') {
            (num, 1000)
        } else {
            (s, 1000)
        };

        let value: u64 = num
            .trim()
            .parse()
            .map_err(|_| format!("invalid interval: {}", s))?;
        if value == 0 {
            return Err("interval must be positive".to_string());
        }
        value
            .checked_mul(scale_ms)
            .map(|ms| Self(Duration::from_millis(ms)))
            .ok_or_else(|| format!("interval too large: {}", s))
    }
}

/// System-wide configuration
///
/// Use `ClusterConfig::default()` for the bench setup.
///
/// # Example
/// ```
/// use gaugeclock::config::{ClusterConfig, Interval};
///
/// let mut config = ClusterConfig::default();
/// config.weather.api_key = "secret".into();
/// config.cycle.interval = Interval::from_millis(50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClusterConfig {
    pub bus: BusConfig,
    pub weather: WeatherConfig,
    pub tide: TideConfig,
    pub gauges: GaugeConfig,
    pub cycle: LoopConfig,
}

/// CAN bus connection
#[derive(Debug, Clone)]
pub struct BusConfig {
    /// SocketCAN interface name
    pub interface: String,
}

/// Current conditions from OpenWeatherMap
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub base_url: String,
    /// US postal code the temperature is looked up for
    pub zip_code: String,
    pub api_key: String,
    /// Minimum time between fetch attempts
    pub refresh_interval: Interval,
    /// HTTP request timeout
    pub timeout: Interval,
}

/// High/low tide predictions from NOAA CO-OPS
#[derive(Debug, Clone)]
pub struct TideConfig {
    pub base_url: String,
    pub station: String,
    /// How far ahead predictions are requested
    pub horizon: Interval,
    /// Minimum time between fetch attempts once the prediction has passed
    pub retry_interval: Interval,
    /// HTTP request timeout
    pub timeout: Interval,
}

/// Gauge calibration
#[derive(Debug, Clone, Default)]
pub struct GaugeConfig {
    /// Coolant gauge mapping for outdoor temperature (°F)
    pub temperature: MappingRange,
}

/// Control loop timing
#[derive(Debug, Clone)]
pub struct LoopConfig {
    /// Pause between cycles
    pub interval: Interval,
    /// Stop after this many cycles (run forever when `None`)
    pub max_cycles: Option<u64>,
    /// Warn once a source's last good value is older than this
    pub stale_warning: Option<Interval>,
}

impl ClusterConfig {
    /// Check cross-field invariants before the loop starts.
    pub fn validate(&self) -> Result<()> {
        if self.cycle.interval.as_duration() > Duration::from_millis(MAX_CYCLE_INTERVAL_MS) {
            return Err(ClusterError::Config(format!(
                "cycle interval {} exceeds {}ms; needles will wobble",
                self.cycle.interval, MAX_CYCLE_INTERVAL_MS
            )));
        }
        if self.weather.api_key.trim().is_empty() {
            return Err(ClusterError::Config("weather API key is required".to_string()));
        }
        if self.weather.zip_code.trim().is_empty() {
            return Err(ClusterError::Config("zip code is required".to_string()));
        }
        if self.tide.station.trim().is_empty() {
            return Err(ClusterError::Config("tide station is required".to_string()));
        }
        Ok(())
    }
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            interface: "can0".to_string(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: "http://api.openweathermap.org/data/2.5/weather".to_string(),
            zip_code: "33129".to_string(),
            api_key: String::new(),
            refresh_interval: Interval::from_mins(30),
            timeout: Interval::from_secs(10),
        }
    }
}

impl Default for TideConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.tidesandcurrents.noaa.gov/api/prod/datagetter".to_string(),
            // Miami, FL
            station: "8723214".to_string(),
            horizon: Interval::from_hours(18),
            retry_interval: Interval::from_mins(15),
            timeout: Interval::from_secs(10),
        }
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            interval: Interval::from_millis(DEFAULT_CYCLE_INTERVAL_MS),
            max_cycles: None,
            stale_warning: Some(Interval::from_hours(2)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TEMPERATURE_RANGE;

    #[test]
    fn test_interval_suffixes() {
        let ms: Interval = "70ms".parse().unwrap();
        assert_eq!(ms.as_duration(), Duration::from_millis(70));

        let secs: Interval = "30s".parse().unwrap();
        assert_eq!(secs.as_duration(), Duration::from_secs(30));

        let bare: Interval = "45".parse().unwrap();
        assert_eq!(bare.as_duration(), Duration::from_secs(45));

        let mins: Interval = "15m".parse().unwrap();
        assert_eq!(mins, "15min".parse::<Interval>().unwrap());
        assert_eq!(mins.as_duration(), Duration::from_secs(900));

        let hours: Interval = " 2h ".parse().unwrap();
        assert_eq!(hours.as_duration(), Duration::from_secs(7200));
    }

    #[test]
    fn test_interval_invalid() {
        assert!("abc".parse::<Interval>().is_err());
        assert!("0ms".parse::<Interval>().is_err());
        assert!("-5m".parse::<Interval>().is_err());
        assert!("1.5h".parse::<Interval>().is_err());
    }

    #[test]
    fn test_interval_display() {
        assert_eq!(Interval::from_millis(70).to_string(), "70ms");
        assert_eq!(Interval::from_secs(10).to_string(), "10s");
        assert_eq!(Interval::from_mins(15).to_string(), "15m");
        assert_eq!(Interval::from_hours(18).to_string(), "18h");
    }

    #[test]
    fn test_interval_as_time_delta() {
        assert_eq!(Interval::from_mins(30).as_time_delta(), TimeDelta::minutes(30));
    }

    #[test]
    fn test_default_needs_api_key() {
        let mut config = ClusterConfig::default();
        assert!(config.validate().is_err());

        config.weather.api_key = "key".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_slow_cycle_rejected() {
        let mut config = ClusterConfig::default();
        config.weather.api_key = "key".to_string();
        config.cycle.interval = Interval::from_millis(150);
        assert!(config.validate().is_err());

        config.cycle.interval = Interval::from_millis(100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_match_bench_setup() {
        let config = ClusterConfig::default();
        assert_eq!(config.bus.interface, "can0");
        assert_eq!(config.weather.refresh_interval, Interval::from_mins(30));
        assert_eq!(config.tide.retry_interval, Interval::from_mins(15));
        assert_eq!(config.tide.horizon, Interval::from_hours(18));
        assert_eq!(config.cycle.interval, Interval::from_millis(70));
        assert_eq!(config.gauges.temperature, TEMPERATURE_RANGE);
    }
}
