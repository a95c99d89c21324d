/*
 * src/http_models/location.rs
 *
 * Wire DTOs for the supporting location endpoints: `GET /locations/:id`,
 * `GET /locations`, `POST /itinerary/availability`, `POST
 * /itinerary/replacements`. These carry no planning logic of their own:
 * they delegate straight to the location store (and, for replacements, the
 * scoring engine).
 */

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::location::Location;
use crate::models::trip::{Pace, PartyProfile};
use crate::sql_models::{BudgetBucket, Category, Region};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LocationsQuery {
	pub region: Option<Region>,
	pub city: Option<String>,
	pub category: Option<Category>,
	#[serde(default)]
	pub limit: Option<u32>,
	#[serde(default)]
	pub offset: Option<u32>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LocationsResponse {
	pub locations: Vec<Location>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
	pub activity_ids: Vec<String>,
	/// Weekday (0 = Monday) and local hour/minute to check against. Defaults
	/// to the server's current UTC time when omitted.
	pub weekday: Option<u8>,
	pub hour: Option<u8>,
	pub minute: Option<u8>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityEntry {
	pub id: String,
	/// `None` when the id doesn't resolve to a known location.
	pub open_now: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
	pub results: Vec<AvailabilityEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementsRequest {
	pub place_id: String,
	pub city: String,
	#[serde(default)]
	pub interests: Vec<Category>,
	pub pace: Pace,
	pub budget: Option<BudgetBucket>,
	pub party: Option<PartyProfile>,
	#[serde(default)]
	pub exclude_ids: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementCandidate {
	pub id: String,
	pub name: String,
	pub score: f64,
	pub reasons: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplacementsResponse {
	pub candidates: Vec<ReplacementCandidate>,
}
