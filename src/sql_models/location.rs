/*
 * src/sql_models/location.rs
 *
 * Row model for the `locations` table. `LocationRow` is the only shape
 * sqlx ever produces; the domain-level `models::location::Location` the
 * planner actually works with is built from it in `store::postgres`.
 */

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

use crate::sql_models::{BudgetBucket, Category, Period, Region};

/// Operating hours blob stored as a single JSON column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperatingHours {
	pub timezone: String,
	pub periods: Vec<Period>,
}

#[derive(Debug, FromRow)]
pub struct LocationRow {
	pub id: String,
	pub name: String,
	pub category: Category,
	pub city: String,
	pub prefecture: Option<String>,
	pub region: Region,
	pub lat: Option<f64>,
	pub lng: Option<f64>,
	pub rating: Option<f64>,
	pub review_count: Option<i32>,
	pub price_level: Option<i16>,
	pub operating_hours: Option<Json<OperatingHours>>,
	pub tags: Vec<String>,
	pub recommended_visit_minutes: Option<i32>,
	pub place_id: Option<String>,
}

/// Budget preference row carried on `accounts`, distinct from a per-trip
/// `TripRequest.budget` override.
#[derive(Debug, FromRow)]
pub struct AccountPreferenceRow {
	pub account_id: i32,
	pub budget_preference: Option<BudgetBucket>,
}
