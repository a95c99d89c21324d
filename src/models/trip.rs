/*
 * src/models/trip.rs
 *
 * The inbound planning request, once parsed and validated out of its wire
 * shape (`http_models::itinerary::PlanRequest`).
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sql_models::{BudgetBucket, Category};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Pace {
	Relaxed,
	Balanced,
	Fast,
}

impl Pace {
	/// (minimum, target) activities per day.
	pub fn targets(&self) -> (u32, u32) {
		match self {
			Pace::Relaxed => (3, 4),
			Pace::Balanced => (4, 5),
			Pace::Fast => (5, 7),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartyKind {
	Solo,
	Couple,
	Family,
	Friends,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartyProfile {
	pub kind: PartyKind,
	#[serde(default)]
	pub children: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TripRequest {
	/// 1..=30
	pub duration: u32,
	pub start_date: Option<chrono::NaiveDate>,
	/// Already-normalized city names (see `geo::normalize_city`).
	pub cities: Vec<String>,
	pub interests: Vec<Category>,
	pub pace: Pace,
	pub budget: Option<BudgetBucket>,
	pub party: Option<PartyProfile>,
	#[serde(default)]
	pub saved_ids: Vec<String>,
	pub trip_id: Option<String>,
}

impl TripRequest {
	/// A request carrying `savedIds` bypasses the plan cache entirely: it is
	/// personalized and must not be served from, or written to, shared state.
	pub fn bypasses_cache(&self) -> bool {
		!self.saved_ids.is_empty()
	}
}
