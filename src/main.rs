#![allow(unexpected_cfgs)]

mod cache;
mod controllers;
mod db;
mod error;
mod geo;
mod global;
mod http_models;
mod log;
mod middleware;
mod models;
mod oracles;
mod planner;
mod ratelimit;
mod sql_models;
mod state;
mod store;

#[cfg(not(tarpaulin_include))]
mod swagger;

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::Extension;
use http::{Method, header::HeaderValue};
use tower_cookies::CookieManagerLayer;
use tower_cookies::cookie::Key;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::controllers::AxumRouter;
use crate::global::*;
use crate::oracles::fakes::{fake_routing_oracle, FixedWeatherOracle};
use crate::oracles::routing::{HaversineFallbackRouting, HttpRoutingOracle};
use crate::oracles::weather::HttpWeatherOracle;
use crate::oracles::{RoutingOracle, WeatherOracle};
use crate::ratelimit::{InMemoryRateLimiter, RateLimiter, RemoteRateLimiter};
use crate::state::AppState;
use crate::store::postgres::PostgresLocationStore;
use crate::store::LocationStore;

fn build_routing_oracle() -> Arc<dyn RoutingOracle> {
	match env::var("ROUTING_ORACLE_URL") {
		Ok(base_url) => Arc::new(HaversineFallbackRouting::new(HttpRoutingOracle::new(base_url, oracle_timeout()))),
		Err(_) => Arc::new(fake_routing_oracle()),
	}
}

fn build_weather_oracle() -> Arc<dyn WeatherOracle> {
	match env::var("WEATHER_ORACLE_URL") {
		Ok(base_url) => Arc::new(HttpWeatherOracle::new(base_url, oracle_timeout())),
		Err(_) => Arc::new(FixedWeatherOracle),
	}
}

fn build_rate_limiter() -> Arc<dyn RateLimiter> {
	match (env::var("RATE_LIMIT_BACKEND_URL"), env::var("RATE_LIMIT_BACKEND_TOKEN")) {
		(Ok(base_url), Ok(token)) => {
			Arc::new(RemoteRateLimiter::new(base_url, token, rate_limit_per_minute(), oracle_timeout()))
		}
		_ => Arc::new(InMemoryRateLimiter::new(rate_limit_per_minute())),
	}
}

#[cfg(not(tarpaulin_include))]
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
	// Load our evironment variables
	dotenvy::dotenv().ok();
	log::init_panic_handler();
	log::init_logger();

	// Read and store loaded environment variables
	let api_base_url = env::var("API_BASE_URL").expect("API_BASE_URL must be set");
	let front_end_url = env::var("FRONTEND_URL").expect("FRONTEND_URL must be set");
	let bind_address = env::var("BIND_ADDRESS").expect("BIND_ADDRESS must be set");

	// Initialize the database pool connection
	let pool = db::create_pool().await;

	/*
	/ Configure CORS
	/ CORS is needed when a frontend (running on one domain or port)
	/ wants to send HTTP requests to a backend running on another domain or port.
	*/
	let cors = CorsLayer::new()
		.allow_origin(front_end_url.parse::<HeaderValue>().expect("Invalid frontend_url format"))
		.allow_credentials(true)
		.allow_methods([Method::GET, Method::POST, Method::DELETE])
		.allow_headers([
			http::header::CONTENT_TYPE,
			http::header::ACCEPT,
			http::header::AUTHORIZATION,
			http::header::HeaderName::from_static("x-requested-with"),
		]);

	// Use an encryption/signing key for private cookies
	let cookie_key = Key::generate();

	let state = Arc::new(AppState {
		store: Arc::new(PostgresLocationStore::new(pool.clone())) as Arc<dyn LocationStore>,
		routing: build_routing_oracle(),
		weather: build_weather_oracle(),
		cache: cache::PlanCache::new(cache_capacity(), cache_ttl()),
		rate_limiter: build_rate_limiter(),
	});

	// API routes with CORS middleware
	let api_routes = AxumRouter::new()
		.nest("/account", controllers::account::account_routes())
		.nest("/itinerary", controllers::itinerary::itinerary_routes())
		.nest("/locations", controllers::locations::location_routes());

	let api_routes = AxumRouter::new().nest("/api", api_routes);

	#[cfg(all(not(test), debug_assertions))]
	let api_routes = crate::swagger::merge_swagger(api_routes);

	// Build the main router
	let app = axum::Router::new()
		.merge(api_routes)
		.layer(axum::middleware::from_fn(middleware::security_headers))
		.layer(axum::middleware::from_fn(middleware::request_id))
		.layer(axum::middleware::from_fn(ratelimit::rate_limit_middleware))
		.layer(Extension(state.rate_limiter.clone()))
		.layer(Extension(state))
		.layer(Extension(pool.clone()))
		.layer(Extension(cookie_key.clone()))
		.layer(CookieManagerLayer::new())
		.layer(TraceLayer::new_for_http())
		.layer(tower_http::timeout::TimeoutLayer::new(Duration::from_secs(
			generation_deadline().as_secs() + 5,
		)))
		.layer(cors);

	/*
	/ Bind the router to a specific port
	/ We use the SocketAddr struct to bind the router to the port
	*/
	let addr = SocketAddr::from_str(&bind_address).expect("Invalid BIND_ADDRESS format");
	println!("Server starting on {}", api_base_url);

	/*
	/ Serve the router ie: Start the server. `into_make_service_with_connect_info`
	/ is required so `rate_limit_middleware` can extract the caller's
	/ `ConnectInfo<SocketAddr>`.
	*/
	let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
	axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

	Ok(())
}
