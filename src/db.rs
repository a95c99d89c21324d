/*
 * src/db.rs
 *
 * Purpose:
 *   Owns the Postgres connection pool backing the location store and
 *   account tables. A single pool is created at startup and shared via
 *   `axum::Extension`.
 */

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Creates the shared connection pool.
///
/// # Panics
/// Panics if `DATABASE_URL` is not set, or if the pool cannot be established.
/// A misconfigured environment should never result in a server silently
/// degrading.
pub async fn create_pool() -> PgPool {
	let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

	PgPoolOptions::new()
		.max_connections(20)
		.acquire_timeout(Duration::from_secs(10))
		.connect(&database_url)
		.await
		.expect("could not connect to DATABASE_URL")
}
