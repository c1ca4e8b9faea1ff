//! Next high tide from NOAA CO-OPS hi/lo predictions, and the tide level
//! estimate derived from it.

use chrono::{NaiveDateTime, TimeDelta};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;

use super::refresher::Fetch;
use crate::config::TideConfig;
use crate::error::{ClusterError, FetchError, Result};

/// Timestamp format of `predictions[].t` in the response.
const PREDICTION_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Timestamp format of `begin_date` and `end_date` in the request.
const QUERY_TIME_FORMAT: &str = "%Y%m%d %H:%M";

/// Half of a semidiurnal tide cycle.
const HALF_CYCLE_HOURS: f64 = 6.0;

#[derive(Debug, Deserialize)]
struct PredictionsResponse {
    predictions: Option<Vec<Prediction>>,
    error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    t: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    message: String,
}

pub struct TideClient {
    client: Client,
    base_url: String,
    station: String,
    horizon: TimeDelta,
}

impl TideClient {
    pub fn new(config: &TideConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout.as_duration())
            .build()
            .map_err(|e| ClusterError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            station: config.station.clone(),
            horizon: config.horizon.as_time_delta(),
        })
    }

    /// Predictions request covering `now` through the configured horizon, in
    /// station local time with daylight saving applied.
    fn request(&self, now: NaiveDateTime) -> RequestBuilder {
        let begin = now.format(QUERY_TIME_FORMAT).to_string();
        let end = (now + self.horizon).format(QUERY_TIME_FORMAT).to_string();
        log::debug!(
            "Requesting tide predictions for station {} from {} to {}",
            self.station,
            begin,
            end
        );

        self.client.get(&self.base_url).query(&[
            ("begin_date", begin.as_str()),
            ("end_date", end.as_str()),
            ("station", self.station.as_str()),
            ("product", "predictions"),
            ("datum", "MLLW"),
            ("interval", "hilo"),
            ("units", "english"),
            ("time_zone", "lst_ldt"),
            ("format", "json"),
        ])
    }
}

impl Fetch<NaiveDateTime> for TideClient {
    fn fetch(&mut self, now: NaiveDateTime) -> std::result::Result<NaiveDateTime, FetchError> {
        let response = self.request(now).send()?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.text()?;
        log::trace!("Tide response: {}", body);
        parse_next_high_tide(&body, now)
    }
}

/// Soonest high tide strictly after `now` in a hi/lo predictions body.
pub fn parse_next_high_tide(
    body: &str,
    now: NaiveDateTime,
) -> std::result::Result<NaiveDateTime, FetchError> {
    let response: PredictionsResponse = serde_json::from_str(body)?;

    let predictions = match (response.predictions, response.error) {
        (Some(predictions), _) => predictions,
        (None, Some(error)) => return Err(FetchError::Remote(error.message)),
        (None, None) => return Err(FetchError::MissingField("predictions")),
    };

    let mut next_high: Option<NaiveDateTime> = None;
    for prediction in predictions.iter().filter(|p| p.kind == "H") {
        let t = NaiveDateTime::parse_from_str(&prediction.t, PREDICTION_TIME_FORMAT)
            .map_err(|e| FetchError::Parse(format!("prediction time {:?}: {}", prediction.t, e)))?;
        if t > now && next_high.is_none_or(|best| t < best) {
            next_high = Some(t);
        }
    }

    next_high.ok_or(FetchError::NoHighTide)
}

/// Estimated tide level in percent, from hours remaining until the next high.
///
/// Within six hours of high tide the level rises linearly to 100 %. Further
/// out the tide is taken to be falling from the previous high, which
/// assumes a twelve-hour cycle. Values outside 0-100 are possible when the
/// prediction has already passed or lies more than twelve hours ahead.
pub fn tide_percentage(next_high: NaiveDateTime, now: NaiveDateTime) -> f64 {
    let hours_until = (next_high - now).num_milliseconds() as f64 / 3_600_000.0;

    if (0.0..=HALF_CYCLE_HOURS).contains(&hours_until) {
        (1.0 - hours_until / HALF_CYCLE_HOURS) * 100.0
    } else {
        ((hours_until - HALF_CYCLE_HOURS) / HALF_CYCLE_HOURS) * 100.0
    }
}
