/*
 * src/oracles/fakes.rs
 *
 * Deterministic oracle doubles. Not `#[cfg(test)]`-gated so integration
 * tests under `tests/` can construct a full router without a network.
 */

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::geo::Coordinates;
use crate::models::itinerary::{TravelMode, WeatherSummary};
use crate::oracles::routing::HaversineFallbackRouting;
use crate::oracles::{OracleError, RouteEstimate, RoutingOracle, WeatherOracle};

/// Always-fails routing oracle; pair with `HaversineFallbackRouting` to get
/// a deterministic, network-free estimate in tests.
pub struct NullRoutingOracle;

#[async_trait]
impl RoutingOracle for NullRoutingOracle {
	async fn estimate(
		&self,
		_origin: Coordinates,
		_destination: Coordinates,
		_mode: TravelMode,
	) -> Result<RouteEstimate, OracleError> {
		Err(OracleError::Unavailable("fake oracle: no network in tests".to_string()))
	}
}

pub fn fake_routing_oracle() -> HaversineFallbackRouting<NullRoutingOracle> {
	HaversineFallbackRouting::new(NullRoutingOracle)
}

/// Fixed-table weather oracle. Always succeeds with a condition derived
/// from the city name's length so results are deterministic without being
/// uniform across cities.
pub struct FixedWeatherOracle;

#[async_trait]
impl WeatherOracle for FixedWeatherOracle {
	async fn forecast(&self, city: &str, _date: Option<NaiveDate>) -> Result<WeatherSummary, OracleError> {
		let conditions = ["clear", "partly cloudy", "overcast", "light rain"];
		let index = city.len() % conditions.len();
		Ok(WeatherSummary {
			condition: conditions[index].to_string(),
			precipitation_probability: (index as f64) * 0.1,
			high_celsius: 22.0,
			low_celsius: 14.0,
		})
	}
}

/// Weather oracle that always fails, to exercise the non-fatal-omission path.
pub struct FailingWeatherOracle;

#[async_trait]
impl WeatherOracle for FailingWeatherOracle {
	async fn forecast(&self, _city: &str, _date: Option<NaiveDate>) -> Result<WeatherSummary, OracleError> {
		Err(OracleError::Unavailable("fake oracle: always fails".to_string()))
	}
}
