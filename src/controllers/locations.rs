/*
 * src/controllers/locations.rs
 *
 * File for Location Catalog API Endpoints
 *
 * Purpose:
 *   Expose the catalog a plan is built from: paginated listing and
 *   single-id lookup, both delegating straight to the `LocationStore`.
 *
 * Include:
 *   api_list_locations - GET /api/locations      -> filtered, paginated listing
 *   api_get_location   - GET /api/locations/{id} -> single location, 404 on miss
 */

use std::sync::Arc;

use axum::{
	Extension, Json, Router,
	extract::{Path, Query},
	routing::get,
};
use tracing::info;
use utoipa::OpenApi;

use crate::error::{ApiResult, PublicError};
use crate::http_models::location::{LocationsQuery, LocationsResponse};
use crate::models::location::Location;
use crate::state::AppState;
use crate::store::LocationFilter;

const DEFAULT_PAGE_SIZE: u32 = 50;
const MAX_PAGE_SIZE: u32 = 200;

/// List locations, optionally filtered by region/city/category.
///
/// # Method
/// `GET /api/locations`
pub async fn api_list_locations(
	Extension(state): Extension<Arc<AppState>>,
	Query(query): Query<LocationsQuery>,
) -> ApiResult<Json<LocationsResponse>> {
	let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
	let offset = query.offset.unwrap_or(0);

	info!(region = ?query.region, city = ?query.city, category = ?query.category, limit, offset, "HANDLER ->> /api/locations 'api_list_locations'");

	let filter = LocationFilter { region: query.region, city: query.city, category: query.category, limit, offset, ..Default::default() };
	let locations = state.store.list_by_filter(&filter).await?;

	Ok(Json(LocationsResponse { locations }))
}

/// Fetch a single location by id.
///
/// # Method
/// `GET /api/locations/{id}`
///
/// # Responses
/// - `200 OK` - the location
/// - `404 NOT_FOUND` - no location with that id
pub async fn api_get_location(Extension(state): Extension<Arc<AppState>>, Path(id): Path<String>) -> ApiResult<Json<Location>> {
	let mut matches = state.store.bulk_by_ids(&[id]).await?;
	match matches.pop() {
		Some(location) => Ok(Json(location)),
		None => Err(PublicError::NotFound.into()),
	}
}

#[derive(OpenApi)]
#[openapi(
	paths(api_list_locations, api_get_location),
	components(schemas(LocationsResponse, Location)),
	tags((name = "locations", description = "Read-only location catalog"))
)]
pub struct LocationsApiDoc;

pub fn location_routes() -> Router {
	Router::new().route("/", get(api_list_locations)).route("/{id}", get(api_get_location))
}
