pub mod external;
pub mod refresher;
pub mod tide;
pub mod weather;

pub use external::{ExternalSource, SourceState};
pub use refresher::{DataSourceRefresher, Fetch, RefreshOutcome};
pub use tide::{TideClient, parse_next_high_tide, tide_percentage};
pub use weather::{WeatherClient, parse_temperature};

use chrono::NaiveDateTime;

use crate::config::{TideConfig, WeatherConfig};

/// Outdoor temperature source on the configured refresh cadence.
pub fn temperature_source(config: &WeatherConfig) -> ExternalSource<f64> {
    let interval = config.refresh_interval.as_time_delta();
    ExternalSource::new("temperature", interval, interval)
}

/// Next-high-tide source. The prediction is refetched once it has passed,
/// rate limited by the retry interval.
pub fn tide_source(config: &TideConfig) -> ExternalSource<NaiveDateTime> {
    ExternalSource::new(
        "tide",
        config.horizon.as_time_delta(),
        config.retry_interval.as_time_delta(),
    )
    .with_expiry(|next_high| Some(*next_high))
}
