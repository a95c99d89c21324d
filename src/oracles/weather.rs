/*
 * src/oracles/weather.rs
 *
 * Production weather oracle. Failures here are always non-fatal to the
 * caller (see `planner::enrichment`): this module only ever returns
 * `Err` to signal "omit weather for this day", never to abort generation.
 */

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::itinerary::WeatherSummary;
use crate::oracles::{OracleError, WeatherOracle};

pub struct HttpWeatherOracle {
	client: reqwest::Client,
	base_url: String,
}

impl HttpWeatherOracle {
	pub fn new(base_url: String, timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.expect("failed to build weather oracle HTTP client");
		Self { client, base_url }
	}
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
	condition: String,
	precipitation_probability: f64,
	high_celsius: f64,
	low_celsius: f64,
}

#[async_trait]
impl WeatherOracle for HttpWeatherOracle {
	async fn forecast(&self, city: &str, date: Option<NaiveDate>) -> Result<WeatherSummary, OracleError> {
		let mut query = vec![("city", city.to_string())];
		if let Some(date) = date {
			query.push(("date", date.to_string()));
		}

		let response = self
			.client
			.get(format!("{}/forecast", self.base_url))
			.query(&query)
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() { OracleError::Timeout } else { OracleError::Unavailable(e.to_string()) }
			})?;

		let body: ForecastResponse = response
			.error_for_status()
			.map_err(|e| OracleError::Unavailable(e.to_string()))?
			.json()
			.await
			.map_err(|e| OracleError::Unavailable(e.to_string()))?;

		Ok(WeatherSummary {
			condition: body.condition,
			precipitation_probability: body.precipitation_probability,
			high_celsius: body.high_celsius,
			low_celsius: body.low_celsius,
		})
	}
}
