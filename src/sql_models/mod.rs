use serde::{Deserialize, Serialize};
use sqlx::Type;
use utoipa::ToSchema;

pub mod account;
pub mod location;

/// Budget band. Mapped to Postgres `budget_bucket`, shared by the `accounts`
/// table (a stored preference) and `TripRequest.budget` (a per-trip override).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Type, ToSchema)]
#[sqlx(type_name = "budget_bucket")]
#[serde(rename_all = "camelCase")]
pub enum BudgetBucket {
	VeryLow,
	Low,
	Medium,
	High,
	Luxury,
}

/// The slot a place or note activity is scheduled into within a day.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Type, ToSchema)]
#[sqlx(type_name = "time_of_day")]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
	Morning,
	Afternoon,
	Evening,
}

impl TimeOfDay {
	pub const ALL: [TimeOfDay; 3] = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening];
}

/// Normalized location category. `Hotel` participates in scoring but is
/// excluded from the day packer's per-slot candidate pool (it is surfaced
/// separately, e.g. for a trip's lodging, never as a morning/afternoon/evening stop).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Type, ToSchema)]
#[sqlx(type_name = "location_category")]
#[serde(rename_all = "lowercase")]
pub enum Category {
	Culture,
	Nature,
	Food,
	Shopping,
	Attraction,
	Hotel,
}

impl Category {
	pub fn from_interest_str(s: &str) -> Option<Category> {
		match s {
			"culture" => Some(Category::Culture),
			"nature" => Some(Category::Nature),
			"food" => Some(Category::Food),
			"shopping" => Some(Category::Shopping),
			"attraction" => Some(Category::Attraction),
			"hotel" => Some(Category::Hotel),
			_ => None,
		}
	}
}

/// One of the nine top-level geographic divisions the location catalog is
/// normalized against (see `geo::tables::PREFECTURE_TO_REGION`).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Type, ToSchema)]
#[sqlx(type_name = "region")]
pub enum Region {
	Hokkaido,
	Tohoku,
	Kanto,
	Chubu,
	Kansai,
	Chugoku,
	Shikoku,
	Kyushu,
	Okinawa,
}

/// A single open/close period within a location's operating hours.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Type, ToSchema)]
#[sqlx(type_name = "operating_period")]
pub struct Period {
	/// 0 = Monday .. 6 = Sunday
	pub weekday: i16,
	pub open_hour: i16,
	pub open_minute: i16,
	pub close_hour: i16,
	pub close_minute: i16,
	/// Closes after midnight on the following day.
	pub overnight: bool,
}
