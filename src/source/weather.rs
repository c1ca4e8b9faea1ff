use chrono::NaiveDateTime;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use super::refresher::Fetch;
use crate::config::WeatherConfig;
use crate::error::{ClusterError, FetchError, Result};

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: Option<WeatherMain>,
}

#[derive(Debug, Deserialize)]
struct WeatherMain {
    temp: Option<f64>,
}

/// Current outdoor temperature (°F) from the OpenWeatherMap current
/// conditions endpoint.
pub struct WeatherClient {
    client: Client,
    base_url: String,
    zip_code: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout.as_duration())
            .build()
            .map_err(|e| ClusterError::Config(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            zip_code: config.zip_code.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

impl Fetch<f64> for WeatherClient {
    fn fetch(&mut self, _now: NaiveDateTime) -> std::result::Result<f64, FetchError> {
        log::debug!("Requesting current conditions for zip {}", self.zip_code);

        // The URL carries the API key, so it is stripped from any error
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("zip", self.zip_code.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "imperial"),
            ])
            .send()
            .map_err(|e| FetchError::Http(e.without_url()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| FetchError::Http(e.without_url()))?;
        log::trace!("Weather response: {}", body);
        parse_temperature(&body)
    }
}

/// Extract `main.temp` from a current conditions response body.
pub fn parse_temperature(body: &str) -> std::result::Result<f64, FetchError> {
    let response: WeatherResponse = serde_json::from_str(body)?;
    let temp = response
        .main
        .ok_or(FetchError::MissingField("main"))?
        .temp
        .ok_or(FetchError::MissingField("main.temp"))?;

    if !temp.is_finite() {
        return Err(FetchError::InvalidValue(format!("temperature {}", temp)));
    }
    Ok(temp)
}
