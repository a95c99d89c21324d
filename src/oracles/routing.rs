/*
 * src/oracles/routing.rs
 *
 * Production routing oracle (`reqwest` against a configured base URL) plus
 * the Haversine fallback decorator that makes the fallback path unit
 * testable independent of any HTTP client.
 */

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::geo::Coordinates;
use crate::geo::distance::haversine_meters;
use crate::models::itinerary::TravelMode;
use crate::oracles::{OracleError, RouteEstimate, RoutingOracle};

pub struct HttpRoutingOracle {
	client: reqwest::Client,
	base_url: String,
}

impl HttpRoutingOracle {
	pub fn new(base_url: String, timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.expect("failed to build routing oracle HTTP client");
		Self { client, base_url }
	}
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
	duration_seconds: u32,
	distance_meters: u32,
}

#[async_trait]
impl RoutingOracle for HttpRoutingOracle {
	async fn estimate(
		&self,
		origin: Coordinates,
		destination: Coordinates,
		mode: TravelMode,
	) -> Result<RouteEstimate, OracleError> {
		let response = self
			.client
			.get(format!("{}/route", self.base_url))
			.query(&[
				("origin_lat", origin.lat.to_string()),
				("origin_lng", origin.lng.to_string()),
				("dest_lat", destination.lat.to_string()),
				("dest_lng", destination.lng.to_string()),
				("mode", mode_str(mode).to_string()),
			])
			.send()
			.await
			.map_err(|e| {
				if e.is_timeout() { OracleError::Timeout } else { OracleError::Unavailable(e.to_string()) }
			})?;

		let body: RouteResponse = response
			.error_for_status()
			.map_err(|e| OracleError::Unavailable(e.to_string()))?
			.json()
			.await
			.map_err(|e| OracleError::Unavailable(e.to_string()))?;

		Ok(RouteEstimate { duration_seconds: body.duration_seconds, distance_meters: body.distance_meters })
	}
}

fn mode_str(mode: TravelMode) -> &'static str {
	match mode {
		TravelMode::Driving => "driving",
		TravelMode::Walking => "walking",
		TravelMode::Transit => "transit",
		TravelMode::Cycling => "cycling",
	}
}

/// Average effective speed, in km/h, used to synthesize an estimate from
/// straight-line distance when the upstream oracle times out or errors.
fn fallback_speed_kmh(mode: TravelMode) -> f64 {
	match mode {
		TravelMode::Walking => 4.5,
		TravelMode::Cycling => 15.0,
		TravelMode::Driving => 35.0,
		TravelMode::Transit => 25.0,
	}
}

/// Wraps any `RoutingOracle` and substitutes a Haversine-distance estimate
/// on timeout or failure, so a flaky or absent upstream never blocks route
/// sequencing.
pub struct HaversineFallbackRouting<O: RoutingOracle> {
	inner: O,
}

impl<O: RoutingOracle> HaversineFallbackRouting<O> {
	pub fn new(inner: O) -> Self {
		Self { inner }
	}

	pub fn fallback_estimate(origin: Coordinates, destination: Coordinates, mode: TravelMode) -> RouteEstimate {
		let meters = haversine_meters(origin, destination);
		let speed_kmh = fallback_speed_kmh(mode);
		let hours = (meters / 1000.0) / speed_kmh;
		RouteEstimate {
			duration_seconds: (hours * 3600.0).round() as u32,
			distance_meters: meters.round() as u32,
		}
	}
}

#[async_trait]
impl<O: RoutingOracle> RoutingOracle for HaversineFallbackRouting<O> {
	async fn estimate(
		&self,
		origin: Coordinates,
		destination: Coordinates,
		mode: TravelMode,
	) -> Result<RouteEstimate, OracleError> {
		match self.inner.estimate(origin, destination, mode).await {
			Ok(estimate) => Ok(estimate),
			Err(_) => Ok(Self::fallback_estimate(origin, destination, mode)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct AlwaysFails;

	#[async_trait]
	impl RoutingOracle for AlwaysFails {
		async fn estimate(
			&self,
			_origin: Coordinates,
			_destination: Coordinates,
			_mode: TravelMode,
		) -> Result<RouteEstimate, OracleError> {
			Err(OracleError::Timeout)
		}
	}

	#[tokio::test]
	async fn falls_back_to_haversine_estimate_on_failure() {
		let oracle = HaversineFallbackRouting::new(AlwaysFails);
		let kyoto = Coordinates::new(35.0116, 135.7681);
		let osaka = Coordinates::new(34.6937, 135.5023);

		let estimate = oracle.estimate(kyoto, osaka, TravelMode::Walking).await.unwrap();
		assert!(estimate.distance_meters > 0);
		assert!(estimate.duration_seconds > 0);
	}

	#[test]
	fn faster_modes_yield_shorter_durations_for_same_distance() {
		let a = Coordinates::new(35.0, 135.0);
		let b = Coordinates::new(35.5, 135.5);

		let walking = HaversineFallbackRouting::<AlwaysFails>::fallback_estimate(a, b, TravelMode::Walking);
		let driving = HaversineFallbackRouting::<AlwaysFails>::fallback_estimate(a, b, TravelMode::Driving);
		assert!(driving.duration_seconds < walking.duration_seconds);
		assert_eq!(walking.distance_meters, driving.distance_meters);
	}
}
