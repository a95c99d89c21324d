/*
 * src/state.rs
 *
 * The handful of shared, long-lived collaborators every itinerary/location
 * handler needs: the location store, the two external oracles, the plan
 * cache, and the rate limiter. Injected via `axum::Extension` the way the
 * teacher injects its `PgPool`, rather than `axum::extract::State`.
 */

use std::sync::Arc;

use crate::cache::PlanCache;
use crate::oracles::{RoutingOracle, WeatherOracle};
use crate::ratelimit::RateLimiter;
use crate::store::LocationStore;

pub struct AppState {
	pub store: Arc<dyn LocationStore>,
	pub routing: Arc<dyn RoutingOracle>,
	pub weather: Arc<dyn WeatherOracle>,
	pub cache: PlanCache,
	pub rate_limiter: Arc<dyn RateLimiter>,
}
