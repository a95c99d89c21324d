/*
 * src/geo/normalize.rs
 *
 * City-name normalization and region-consistency checks for incoming trip
 * requests. Raw user/catalog input for a "city" is frequently a ward
 * ("Kita-ku"), a suffixed municipality name ("Kyoto-shi"), or already a bare
 * city name; this module collapses all three to the same canonical form.
 */

use super::distance::{Coordinates, haversine_km};
use super::tables::{
	AMBIGUOUS_WARDS, CITY_CENTERS, PREFECTURE_TO_REGION, REGIONS_IN_LISTED_ORDER, REGION_BOUNDS, WARD_PREFECTURE_TO_CITY, WARD_TO_CITY,
};
use crate::sql_models::Region;

/// Why a (city, region) or (coordinates, region) pair was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictReason {
	/// The prefecture names a region other than the one claimed.
	PrefectureRegionMismatch { expected: Region, actual: Region },
	/// The coordinates fall well outside the claimed region's bounding box.
	CoordinatesOutsideRegion { region: Region },
}

/// Strips a trailing administrative suffix (`-shi`, `-ku`, `City`, `Ward`)
/// and resolves ward names to their parent city where the mapping is known.
/// Unrecognized input is returned with only the suffix trimmed; normalization
/// is best-effort, never a hard validation gate.
pub fn normalize_city(raw: &str, prefecture: Option<&str>) -> String {
	let trimmed = raw.trim();
	let stripped = strip_suffix(trimmed);

	if let Some(&city) = WARD_TO_CITY.get(stripped) {
		return city.to_string();
	}

	if AMBIGUOUS_WARDS.contains(stripped) {
		if let Some(pref) = prefecture {
			if let Some(&city) = WARD_PREFECTURE_TO_CITY.get(&(stripped, pref)) {
				return city.to_string();
			}
		}
	}

	stripped.to_string()
}

fn strip_suffix(s: &str) -> &str {
	for suffix in ["-shi", "-ku", " City", " Ward"] {
		if let Some(stripped) = s.strip_suffix(suffix) {
			return stripped;
		}
	}
	s
}

/// Region a prefecture name belongs to, if recognized.
pub fn region_of(prefecture: &str) -> Option<Region> {
	PREFECTURE_TO_REGION.get(prefecture).copied()
}

/// Whether a coordinate pair falls within a region's (coarse) bounding box.
pub fn region_contains(region: Region, lat: f64, lng: f64) -> bool {
	REGION_BOUNDS.get(&region).is_some_and(|bounds| bounds.contains(lat, lng))
}

/// The region whose bounding box contains `(lat, lng)`, walking
/// `REGIONS_IN_LISTED_ORDER` and returning the first match. Regions are
/// disjoint in practice, so ties only arise from the coarse rectangles
/// overlapping near a border; the first listed region wins that tie.
pub fn region_containing(lat: f64, lng: f64) -> Option<Region> {
	REGIONS_IN_LISTED_ORDER.iter().find(|&&region| region_contains(region, lat, lng)).copied()
}

/// Cross-checks a claimed (city, prefecture, region, coordinates) combination
/// for gross inconsistency. Returns `Ok(())` when there isn't enough
/// information to contradict the claim: this is a sanity check, not proof
/// of correctness.
pub fn validate_city_against_region(
	prefecture: Option<&str>,
	claimed_region: Region,
	coordinates: Option<(f64, f64)>,
) -> Result<(), ConflictReason> {
	if let Some(pref) = prefecture {
		if let Some(actual) = region_of(pref) {
			if actual != claimed_region {
				return Err(ConflictReason::PrefectureRegionMismatch { expected: claimed_region, actual });
			}
		}
	}

	if let Some((lat, lng)) = coordinates {
		if !region_contains(claimed_region, lat, lng) {
			return Err(ConflictReason::CoordinatesOutsideRegion { region: claimed_region });
		}
	}

	Ok(())
}

/// Distance in kilometers from a named city's representative center to
/// arbitrary coordinates, if the city is in the known-centers table.
pub fn distance_from_city_center_km(city_slug: &str, lat: f64, lng: f64) -> Option<f64> {
	CITY_CENTERS.get(city_slug.to_lowercase().as_str()).map(|&(clat, clng)| {
		haversine_km(Coordinates::new(clat, clng), Coordinates::new(lat, lng))
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_shi_suffix() {
		assert_eq!(normalize_city("Kyoto-shi", None), "Kyoto");
	}

	#[test]
	fn resolves_unambiguous_ward() {
		assert_eq!(normalize_city("Shibuya", None), "Tokyo");
	}

	#[test]
	fn ambiguous_ward_without_prefecture_is_untouched() {
		assert_eq!(normalize_city("Chuo", None), "Chuo");
	}

	#[test]
	fn ambiguous_ward_with_prefecture_resolves() {
		assert_eq!(normalize_city("Chuo", Some("Osaka")), "Osaka");
		assert_eq!(normalize_city("Chuo", Some("Fukuoka")), "Fukuoka");
	}

	#[test]
	fn region_of_recognizes_prefecture() {
		assert_eq!(region_of("Kyoto"), Some(Region::Kansai));
		assert_eq!(region_of("Hokkaido"), Some(Region::Hokkaido));
		assert_eq!(region_of("Atlantis"), None);
	}

	#[test]
	fn region_containing_finds_kyoto_in_kansai() {
		assert_eq!(region_containing(35.0116, 135.7681), Some(Region::Kansai));
	}

	#[test]
	fn region_containing_returns_none_outside_every_bounding_box() {
		assert_eq!(region_containing(0.0, 0.0), None);
	}

	#[test]
	fn validate_catches_prefecture_region_mismatch() {
		let result = validate_city_against_region(Some("Hokkaido"), Region::Kansai, None);
		assert_eq!(
			result,
			Err(ConflictReason::PrefectureRegionMismatch { expected: Region::Kansai, actual: Region::Hokkaido })
		);
	}

	#[test]
	fn validate_catches_coordinates_outside_region() {
		// Sapporo coordinates claimed as Kansai.
		let result = validate_city_against_region(None, Region::Kansai, Some((43.0618, 141.3545)));
		assert_eq!(result, Err(ConflictReason::CoordinatesOutsideRegion { region: Region::Kansai }));
	}

	#[test]
	fn validate_passes_when_consistent() {
		let result = validate_city_against_region(Some("Kyoto"), Region::Kansai, Some((35.0116, 135.7681)));
		assert_eq!(result, Ok(()));
	}
}
