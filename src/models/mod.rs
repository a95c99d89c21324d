/*
 * src/models/mod.rs
 *
 * Domain types the planner actually operates on, distinct from both the
 * sqlx row shapes in `sql_models` and the wire DTOs in `http_models`.
 */

pub mod account;
pub mod itinerary;
pub mod location;
pub mod trip;
pub mod validation;
