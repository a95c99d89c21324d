/*
 * src/models/location.rs
 *
 * The planner's view of a catalog entry: an immutable snapshot built once
 * from `sql_models::location::LocationRow` (or a fixture, in tests) and
 * never mutated afterward.
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::Coordinates;
use crate::sql_models::{Category, Region};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OperatingPeriod {
	/// 0 = Monday .. 6 = Sunday
	pub weekday: u8,
	pub open_hour: u8,
	pub open_minute: u8,
	pub close_hour: u8,
	pub close_minute: u8,
	pub overnight: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OperatingHours {
	pub timezone: String,
	pub periods: Vec<OperatingPeriod>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Location {
	pub id: String,
	pub name: String,
	pub category: Category,
	pub city: String,
	pub prefecture: Option<String>,
	pub region: Region,
	pub coordinates: Option<Coordinates>,
	pub rating: Option<f64>,
	pub review_count: Option<u32>,
	pub operating_hours: Option<OperatingHours>,
	pub price_level: Option<u8>,
	pub tags: Vec<String>,
	pub recommended_visit_minutes: Option<u32>,
	pub place_id: Option<String>,
}

impl Location {
	/// Best-effort "is this place open" check against a weekday + local
	/// time-of-day. Locations with no operating hours are assumed open.
	pub fn is_open_at(&self, weekday: u8, hour: u8, minute: u8) -> bool {
		let Some(hours) = &self.operating_hours else { return true };
		let minutes_of_day = (hour as u32) * 60 + minute as u32;
		hours.periods.iter().any(|p| {
			if p.weekday != weekday {
				return false;
			}
			let open = (p.open_hour as u32) * 60 + p.open_minute as u32;
			let close = (p.close_hour as u32) * 60 + p.close_minute as u32;
			if p.overnight {
				minutes_of_day >= open || minutes_of_day <= close
			} else {
				minutes_of_day >= open && minutes_of_day <= close
			}
		})
	}

	/// Neighborhood key used by the validator's clustering rule. Falls back
	/// to the city when no finer-grained tag is present.
	pub fn neighborhood(&self) -> &str {
		self.tags
			.iter()
			.find(|t| t.starts_with("neighborhood:"))
			.map(|t| t.trim_start_matches("neighborhood:"))
			.unwrap_or(&self.city)
	}
}
