/*
 * src/geo/tables.rs
 *
 * Fixed geographic reference tables: prefecture -> region, region bounding
 * boxes, known city centers, and ward -> parent-city normalization.
 */

use crate::sql_models::Region;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Approximate bounding box for a region. These are coarse rectangles, not
/// administrative polygons; they exist to catch gross coordinate/region
/// mismatches (see `validate_city_against_region`), not to adjudicate points
/// near a regional border.
#[derive(Debug, Clone, Copy)]
pub struct RegionBounds {
	pub north: f64,
	pub south: f64,
	pub east: f64,
	pub west: f64,
}

impl RegionBounds {
	pub fn contains(&self, lat: f64, lng: f64) -> bool {
		lat <= self.north && lat >= self.south && lng <= self.east && lng >= self.west
	}
}

pub static PREFECTURE_TO_REGION: LazyLock<HashMap<&'static str, Region>> = LazyLock::new(|| {
	use Region::*;
	HashMap::from([
		("Hokkaido", Hokkaido),
		("Aomori", Tohoku),
		("Iwate", Tohoku),
		("Miyagi", Tohoku),
		("Akita", Tohoku),
		("Yamagata", Tohoku),
		("Fukushima", Tohoku),
		("Ibaraki", Kanto),
		("Tochigi", Kanto),
		("Gunma", Kanto),
		("Saitama", Kanto),
		("Chiba", Kanto),
		("Tokyo", Kanto),
		("Kanagawa", Kanto),
		("Niigata", Chubu),
		("Toyama", Chubu),
		("Ishikawa", Chubu),
		("Fukui", Chubu),
		("Yamanashi", Chubu),
		("Nagano", Chubu),
		("Gifu", Chubu),
		("Shizuoka", Chubu),
		("Aichi", Chubu),
		("Mie", Kansai),
		("Shiga", Kansai),
		("Kyoto", Kansai),
		("Osaka", Kansai),
		("Hyogo", Kansai),
		("Nara", Kansai),
		("Wakayama", Kansai),
		("Tottori", Chugoku),
		("Shimane", Chugoku),
		("Okayama", Chugoku),
		("Hiroshima", Chugoku),
		("Yamaguchi", Chugoku),
		("Tokushima", Shikoku),
		("Kagawa", Shikoku),
		("Ehime", Shikoku),
		("Kochi", Shikoku),
		("Fukuoka", Kyushu),
		("Saga", Kyushu),
		("Nagasaki", Kyushu),
		("Kumamoto", Kyushu),
		("Oita", Kyushu),
		("Miyazaki", Kyushu),
		("Kagoshima", Kyushu),
		("Okinawa", Okinawa),
	])
});

/// Fixed listing order for the nine regions. `geo::normalize::region_containing`
/// walks this order so an overlapping pair of bounding boxes resolves the
/// same way every time (the first listed region wins).
pub const REGIONS_IN_LISTED_ORDER: [Region; 9] = [
	Region::Hokkaido,
	Region::Tohoku,
	Region::Kanto,
	Region::Chubu,
	Region::Kansai,
	Region::Chugoku,
	Region::Shikoku,
	Region::Kyushu,
	Region::Okinawa,
];

pub static REGION_BOUNDS: LazyLock<HashMap<Region, RegionBounds>> = LazyLock::new(|| {
	use Region::*;
	HashMap::from([
		(
			Hokkaido,
			RegionBounds { north: 45.6, south: 41.3, east: 145.9, west: 139.3 },
		),
		(
			Tohoku,
			RegionBounds { north: 41.6, south: 36.7, east: 142.1, west: 139.3 },
		),
		(
			Kanto,
			RegionBounds { north: 37.2, south: 34.8, east: 140.9, west: 138.3 },
		),
		(
			Chubu,
			RegionBounds { north: 38.6, south: 34.5, east: 139.9, west: 135.9 },
		),
		(
			Kansai,
			RegionBounds { north: 35.8, south: 33.4, east: 136.5, west: 134.2 },
		),
		(
			Chugoku,
			RegionBounds { north: 35.8, south: 33.7, east: 134.5, west: 130.8 },
		),
		(
			Shikoku,
			RegionBounds { north: 34.4, south: 32.7, east: 134.8, west: 132.0 },
		),
		(
			Kyushu,
			RegionBounds { north: 34.0, south: 31.0, east: 132.0, west: 128.6 },
		),
		(
			Okinawa,
			RegionBounds { north: 27.9, south: 24.0, east: 131.4, west: 122.9 },
		),
	])
});

/// Representative (lat, lng) for well-known cities, keyed by lowercase slug.
pub static CITY_CENTERS: LazyLock<HashMap<&'static str, (f64, f64)>> = LazyLock::new(|| {
	HashMap::from([
		("kyoto", (35.0116, 135.7681)),
		("osaka", (34.6937, 135.5023)),
		("tokyo", (35.6762, 139.6503)),
		("yokohama", (35.4437, 139.6380)),
		("nagoya", (35.1815, 136.9066)),
		("sapporo", (43.0618, 141.3545)),
		("sendai", (38.2682, 140.8694)),
		("hiroshima", (34.3853, 132.4553)),
		("fukuoka", (33.5904, 130.4017)),
		("kobe", (34.6901, 135.1955)),
		("nara", (34.6851, 135.8048)),
		("kanazawa", (36.5613, 136.6562)),
		("naha", (26.2124, 127.6809)),
		("takamatsu", (34.3428, 134.0466)),
		("matsuyama", (33.8392, 132.7657)),
		("kumamoto", (32.8031, 130.7079)),
		("nagasaki", (32.7503, 129.8779)),
		("okayama", (34.6551, 133.9195)),
	])
});

/// Region each known city center belongs to. Used by the route sequencer to
/// group a trip's selected cities by region without a round trip through
/// the location store.
pub static CITY_REGION: LazyLock<HashMap<&'static str, Region>> = LazyLock::new(|| {
	use Region::*;
	HashMap::from([
		("kyoto", Kansai),
		("osaka", Kansai),
		("kobe", Kansai),
		("nara", Kansai),
		("tokyo", Kanto),
		("yokohama", Kanto),
		("nagoya", Chubu),
		("kanazawa", Chubu),
		("sapporo", Hokkaido),
		("sendai", Tohoku),
		("hiroshima", Chugoku),
		("okayama", Chugoku),
		("fukuoka", Kyushu),
		("kumamoto", Kyushu),
		("nagasaki", Kyushu),
		("takamatsu", Shikoku),
		("matsuyama", Shikoku),
		("naha", Okinawa),
	])
});

/// Ward names that also denote an independent city in a different region.
/// Normalizing these requires a prefecture signal; without one, the raw
/// residue is returned unchanged rather than guessed at.
pub static AMBIGUOUS_WARDS: LazyLock<HashSet<&'static str>> =
	LazyLock::new(|| HashSet::from(["Chuo", "Naka", "Minato", "Higashi", "Nishi", "Midori"]));

/// Ward -> canonical parent city, for wards whose name is unique enough that
/// no prefecture signal is needed. Ambiguous wards (`AMBIGUOUS_WARDS`) are
/// deliberately absent from this table; they are resolved in
/// `geo::normalize` via `WARD_PREFECTURE_TO_CITY` instead.
pub static WARD_TO_CITY: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
	HashMap::from([
		("Fushimi", "Kyoto"),
		("Sakyo", "Kyoto"),
		("Ukyo", "Kyoto"),
		("Sumiyoshi", "Osaka"),
		("Tennoji", "Osaka"),
		("Shibuya", "Tokyo"),
		("Shinjuku", "Tokyo"),
		("Setagaya", "Tokyo"),
		("Taito", "Tokyo"),
	])
});

/// `(ward, prefecture) -> city` resolution table for ambiguous wards. Used
/// only once a prefecture is known; see `AMBIGUOUS_WARDS`.
pub static WARD_PREFECTURE_TO_CITY: LazyLock<HashMap<(&'static str, &'static str), &'static str>> =
	LazyLock::new(|| {
		HashMap::from([
			(("Kita", "Kyoto"), "Kyoto"),
			(("Kita", "Osaka"), "Osaka"),
			(("Kita", "Hokkaido"), "Sapporo"),
			(("Chuo", "Osaka"), "Osaka"),
			(("Chuo", "Fukuoka"), "Fukuoka"),
			(("Chuo", "Hokkaido"), "Sapporo"),
			(("Chuo", "Hyogo"), "Kobe"),
			(("Naka", "Hiroshima"), "Hiroshima"),
			(("Naka", "Kanagawa"), "Yokohama"),
			(("Minato", "Tokyo"), "Tokyo"),
			(("Minato", "Aichi"), "Nagoya"),
			(("Higashi", "Osaka"), "Osaka"),
			(("Higashi", "Aichi"), "Nagoya"),
			(("Nishi", "Osaka"), "Osaka"),
			(("Nishi", "Fukuoka"), "Fukuoka"),
			(("Midori", "Aichi"), "Nagoya"),
			(("Midori", "Kanagawa"), "Yokohama"),
		])
	});
