/*
 * src/geo/distance.rs
 *
 * Pure great-circle distance. No I/O, no panics.
 */

/// Mean Earth radius in meters, matching the constant used by most
/// consumer-grade mapping stacks.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct Coordinates {
	pub lat: f64,
	pub lng: f64,
}

impl Coordinates {
	pub fn new(lat: f64, lng: f64) -> Self {
		Self { lat, lng }
	}
}

/// Great-circle distance between two points, in meters.
pub fn haversine_meters(a: Coordinates, b: Coordinates) -> f64 {
	let lat1 = a.lat.to_radians();
	let lat2 = b.lat.to_radians();
	let delta_lat = (b.lat - a.lat).to_radians();
	let delta_lng = (b.lng - a.lng).to_radians();

	let sin_lat = (delta_lat / 2.0).sin();
	let sin_lng = (delta_lng / 2.0).sin();

	let h = sin_lat * sin_lat + lat1.cos() * lat2.cos() * sin_lng * sin_lng;
	let c = 2.0 * h.sqrt().clamp(0.0, 1.0).asin();

	EARTH_RADIUS_METERS * c
}

pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
	haversine_meters(a, b) / 1000.0
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn same_point_is_zero() {
		let p = Coordinates::new(35.0116, 135.7681);
		assert!(haversine_meters(p, p) < 1e-6);
	}

	#[test]
	fn kyoto_to_osaka_is_roughly_40km() {
		let kyoto = Coordinates::new(35.0116, 135.7681);
		let osaka = Coordinates::new(34.6937, 135.5023);
		let km = haversine_km(kyoto, osaka);
		assert!((35.0..50.0).contains(&km), "expected ~40km, got {km}");
	}

	#[test]
	fn is_symmetric() {
		let a = Coordinates::new(35.0, 135.0);
		let b = Coordinates::new(36.2, 139.7);
		assert!((haversine_meters(a, b) - haversine_meters(b, a)).abs() < 1e-6);
	}
}
