/*
 * src/controllers/itinerary.rs
 *
 * File for Itinerary Controller API Endpoints
 *
 * Purpose:
 *   Serve the itinerary planning surface: the core
 *   generation endpoint plus the availability and replacement helpers that
 *   delegate into the location store and scoring engine.
 *
 * Include:
 *   api_plan          - POST /api/itinerary/plan         -> generates (or serves cached) an itinerary
 *   api_availability  - POST /api/itinerary/availability  -> batch open-now check
 *   api_replacements  - POST /api/itinerary/replacements  -> candidate substitutes for one place
 */

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use axum::{Extension, Json, Router, extract::Request, http::StatusCode, response::IntoResponse, response::Response, routing::post};
use chrono::{Timelike, Utc};
use tracing::{info, warn};
use utoipa::OpenApi;

use crate::cache::{self, CachedPlan};
use crate::error::{ApiResult, AppError, PrivateError, PublicError};
use crate::global;
use crate::http_models::itinerary::{PlanRequest, PlanResponse};
use crate::http_models::location::{
	AvailabilityEntry, AvailabilityRequest, AvailabilityResponse, ReplacementCandidate, ReplacementsRequest, ReplacementsResponse,
};
use crate::middleware::{AuthUser, auth_optional};
use crate::models::itinerary::{Itinerary, Trip};
use crate::planner::pipeline::{self, GeneratorDeps};
use crate::planner::scoring::{ScoringContext, score};
use crate::planner::validator::validate;
use crate::state::AppState;
use crate::store::LocationFilter;

/// A JSON extractor that maps content-type/body-size/schema rejections onto
/// the unified `AppError` response shape instead of axum's bare-text default.
pub struct ValidatedJson<T>(pub T);

impl<S, T> axum::extract::FromRequest<S> for ValidatedJson<T>
where
	T: serde::de::DeserializeOwned,
	S: Send + Sync,
{
	type Rejection = AppError;

	async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
		match Json::<T>::from_request(req, state).await {
			Ok(Json(value)) => Ok(ValidatedJson(value)),
			Err(rejection) => {
				if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
					Err(PublicError::PayloadTooLarge.into())
				} else {
					Err(PublicError::BadRequest(rejection.body_text()).into())
				}
			}
		}
	}
}

/// Generate (or serve cached) an itinerary for a trip request.
///
/// # Method
/// `POST /api/itinerary/plan`
///
/// # Auth
/// Auth-optional: `middleware::auth_optional` attaches `AuthUser` when a
/// valid session cookie is present, but the planner never requires one.
///
/// # Responses
/// - `200 OK` - the generated plan, `X-Cache: HIT|MISS`, `Cache-Control: no-store`
/// - `400 BAD_REQUEST` - schema or content-type violation
/// - `413 PAYLOAD_TOO_LARGE` - body over 1 MiB
/// - `504 GATEWAY_TIMEOUT` - the 25s generation deadline was exceeded
/// - `500 INTERNAL_SERVER_ERROR` - internal error (private)
pub async fn api_plan(
	Extension(state): Extension<Arc<AppState>>,
	user: Option<Extension<AuthUser>>,
	ValidatedJson(payload): ValidatedJson<PlanRequest>,
) -> ApiResult<Response> {
	let started = Instant::now();
	let request = payload.into_domain()?;

	info!(
		user_id = user.map(|Extension(u)| u.id),
		cities = ?request.cities,
		duration = request.duration,
		"HANDLER ->> /api/itinerary/plan 'api_plan'"
	);

	let deadline = global::generation_deadline().saturating_sub(started.elapsed());
	let bypass_cache = request.bypasses_cache();

	let outcome = tokio::time::timeout(deadline, async {
		if bypass_cache {
			let deps =
				GeneratorDeps { store: state.store.as_ref(), routing: state.routing.as_ref(), weather: state.weather.as_ref() };
			let output = pipeline::generate(&request, &deps).await?;
			Ok((CachedPlan { trip_id: output.trip.id, itinerary: output.trip.itinerary, day_intros: output.day_intros }, false))
		} else {
			let fingerprint = cache::fingerprint(&request);
			let store = state.store.clone();
			let routing = state.routing.clone();
			let weather = state.weather.clone();
			state
				.cache
				.get_or_build(fingerprint, move || async move {
					let deps = GeneratorDeps { store: store.as_ref(), routing: routing.as_ref(), weather: weather.as_ref() };
					let output = pipeline::generate(&request, &deps)
						.await
						.map_err(|e| cache::BuildFailed(e.to_string()))?;
					Ok(CachedPlan { trip_id: output.trip.id, itinerary: output.trip.itinerary, day_intros: output.day_intros })
				})
				.await
				.map(|(plan, hit)| ((*plan).clone(), hit))
				.map_err(|e| AppError::from(PrivateError::Internal(e.0)))
		}
	})
	.await;

	let (plan, was_hit) = match outcome {
		Ok(result) => result?,
		Err(_) => {
			warn!(elapsed_ms = started.elapsed().as_millis(), "generation deadline exceeded");
			return Err(PublicError::Timeout.into());
		}
	};

	// Re-run validation on the served itinerary regardless of hit/miss:
	// a cache hit is re-validated rather than trusted blindly.
	let place_ids: Vec<String> =
		plan.itinerary.days.iter().flat_map(|d| &d.activities).filter_map(|a| a.place_id()).map(|s| s.to_string()).collect();
	let locations = state.store.bulk_by_ids(&place_ids).await?;
	let locations_by_id = locations.into_iter().map(|l| (l.id.clone(), l)).collect();
	let itinerary_validation = validate(&plan.itinerary, &locations_by_id);

	let trip = Trip { id: plan.trip_id, itinerary: plan.itinerary.clone(), validation: itinerary_validation.clone() };
	let response_body = PlanResponse {
		trip,
		itinerary: plan.itinerary,
		day_intros: plan.day_intros,
		validation: itinerary_validation.clone(),
		itinerary_validation,
	};

	let mut response = Json(response_body).into_response();
	let headers = response.headers_mut();
	headers.insert("x-cache", if was_hit && !bypass_cache { "HIT" } else { "MISS" }.parse().unwrap());
	headers.insert(axum::http::header::CACHE_CONTROL, "no-store".parse().unwrap());
	Ok(response)
}

/// Batch open-now check for a set of activity ids.
///
/// # Method
/// `POST /api/itinerary/availability`
pub async fn api_availability(
	Extension(state): Extension<Arc<AppState>>,
	ValidatedJson(payload): ValidatedJson<AvailabilityRequest>,
) -> ApiResult<Json<AvailabilityResponse>> {
	let now = Utc::now();
	let weekday = payload.weekday.unwrap_or_else(|| now.weekday().num_days_from_monday() as u8);
	let hour = payload.hour.unwrap_or(now.hour() as u8);
	let minute = payload.minute.unwrap_or(now.minute() as u8);

	let locations = state.store.bulk_by_ids(&payload.activity_ids).await?;
	let by_id: std::collections::HashMap<String, _> = locations.into_iter().map(|l| (l.id.clone(), l)).collect();

	let results = payload
		.activity_ids
		.iter()
		.map(|id| AvailabilityEntry { id: id.clone(), open_now: by_id.get(id).map(|loc| loc.is_open_at(weekday, hour, minute)) })
		.collect();

	Ok(Json(AvailabilityResponse { results }))
}

/// Candidate substitutes for one place, scored the same way the packer
/// scores its own candidates.
///
/// # Method
/// `POST /api/itinerary/replacements`
pub async fn api_replacements(
	Extension(state): Extension<Arc<AppState>>,
	ValidatedJson(payload): ValidatedJson<ReplacementsRequest>,
) -> ApiResult<Json<ReplacementsResponse>> {
	let pool = state.store.list_by_filter(&LocationFilter { city: Some(payload.city.clone()), limit: 200, ..Default::default() }).await?;

	let mut already_placed: HashSet<String> = payload.exclude_ids.iter().cloned().collect();
	already_placed.insert(payload.place_id.clone());

	let saved_ids = HashSet::new();
	let ctx = ScoringContext {
		interests: &payload.interests,
		pace: payload.pace,
		budget: payload.budget,
		party: payload.party.as_ref(),
		saved_ids: &saved_ids,
		anchor: None,
		already_placed: &already_placed,
	};

	let mut candidates: Vec<ReplacementCandidate> = pool
		.iter()
		.filter_map(|location| score(location, &ctx).map(|s| (location, s)))
		.map(|(location, s)| ReplacementCandidate { id: location.id.clone(), name: location.name.clone(), score: s.value, reasons: s.reasons })
		.collect();

	candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
	candidates.truncate(10);

	Ok(Json(ReplacementsResponse { candidates }))
}

#[derive(OpenApi)]
#[openapi(
	paths(api_plan, api_availability, api_replacements),
	components(schemas(
		crate::http_models::itinerary::PlanRequest,
		crate::http_models::itinerary::BuilderData,
		crate::http_models::itinerary::PlanResponse,
		crate::http_models::location::AvailabilityRequest,
		crate::http_models::location::AvailabilityResponse,
		crate::http_models::location::ReplacementsRequest,
		crate::http_models::location::ReplacementsResponse,
		Itinerary,
		Trip,
	)),
	tags((name = "itinerary", description = "Itinerary generation and supporting helpers"))
)]
pub struct ItineraryApiDoc;

pub fn itinerary_routes() -> Router {
	Router::new()
		.route("/plan", post(api_plan))
		.route("/availability", post(api_availability))
		.route("/replacements", post(api_replacements))
		.route_layer(axum::middleware::from_fn(auth_optional))
		.layer(axum::extract::DefaultBodyLimit::max(global::MAX_BODY_BYTES))
}
