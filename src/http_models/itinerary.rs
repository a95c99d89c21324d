/*
 * src/http_models/itinerary.rs
 *
 * Wire DTOs for `POST /itinerary/plan`. `PlanRequest` is the
 * camelCase JSON shape a client sends; `into_domain` is where wire-only
 * constraints (duration bounds, the `tripId` charset) get checked before
 * the rest of the pipeline ever sees a `TripRequest`.
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, PublicError};
use crate::models::itinerary::{DayIntro, Itinerary, Trip};
use crate::models::trip::{Pace, PartyProfile, TripRequest};
use crate::models::validation::Validation;
use crate::sql_models::{BudgetBucket, Category};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuilderData {
	/// 1..=30
	pub duration: u32,
	pub start_date: Option<chrono::NaiveDate>,
	pub cities: Vec<String>,
	#[serde(default)]
	pub interests: Vec<Category>,
	pub pace: Pace,
	pub budget: Option<BudgetBucket>,
	pub party: Option<PartyProfile>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
	pub builder_data: BuilderData,
	/// Opaque, `[A-Za-z0-9._-]{1,255}`.
	pub trip_id: Option<String>,
	#[serde(default)]
	pub saved_ids: Vec<String>,
}

impl PlanRequest {
	/// Wire-level validation the JSON schema alone can't express, then a
	/// conversion into the domain `TripRequest` the pipeline operates on.
	pub fn into_domain(self) -> Result<TripRequest, AppError> {
		let duration = self.builder_data.duration;
		if !(1..=30).contains(&duration) {
			return Err(PublicError::BadRequest("duration must be between 1 and 30 days".to_string()).into());
		}
		if self.builder_data.cities.is_empty() {
			return Err(PublicError::BadRequest("at least one city is required".to_string()).into());
		}
		if let Some(trip_id) = &self.trip_id {
			let valid = !trip_id.is_empty()
				&& trip_id.len() <= 255
				&& trip_id.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
			if !valid {
				return Err(PublicError::BadRequest("tripId must match [A-Za-z0-9._-]{1,255}".to_string()).into());
			}
		}

		Ok(TripRequest {
			duration,
			start_date: self.builder_data.start_date,
			cities: self.builder_data.cities,
			interests: self.builder_data.interests,
			pace: self.builder_data.pace,
			budget: self.builder_data.budget,
			party: self.builder_data.party,
			saved_ids: self.saved_ids,
			trip_id: self.trip_id,
		})
	}
}

/// Response for `POST /itinerary/plan`. `validation` and `itineraryValidation`
/// carry the same `Validation` value twice over the wire, matching the
/// shape clients already expect; see DESIGN.md.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
	pub trip: Trip,
	pub itinerary: Itinerary,
	pub day_intros: Vec<DayIntro>,
	pub validation: Validation,
	pub itinerary_validation: Validation,
}
