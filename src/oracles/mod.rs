/*
 * src/oracles/mod.rs
 *
 * Pluggable external collaborators the planner depends on but does not
 * own: a routing estimate between two points, and a per-day weather
 * forecast. Both are traits so the sequencer/enrichment stages never see a
 * concrete HTTP client; tests inject deterministic fakes instead.
 */

pub mod fakes;
pub mod routing;
pub mod weather;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::geo::Coordinates;
use crate::models::itinerary::{TravelMode, WeatherSummary};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteEstimate {
	pub duration_seconds: u32,
	pub distance_meters: u32,
}

#[async_trait]
pub trait RoutingOracle: Send + Sync {
	async fn estimate(
		&self,
		origin: Coordinates,
		destination: Coordinates,
		mode: TravelMode,
	) -> Result<RouteEstimate, OracleError>;
}

#[async_trait]
pub trait WeatherOracle: Send + Sync {
	async fn forecast(&self, city: &str, date: Option<NaiveDate>) -> Result<WeatherSummary, OracleError>;
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
	#[error("oracle request timed out")]
	Timeout,
	#[error("oracle request failed: {0}")]
	Unavailable(String),
}
