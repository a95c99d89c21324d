/*
 * src/store/mod.rs
 *
 * Location Store Adapter (L). The only component that talks to the
 * underlying catalog; the planner borrows locations by id and never mutates
 * what it gets back.
 */

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::location::Location;
use crate::sql_models::{Category, Region};

#[derive(Debug, Clone, Default)]
pub struct LocationFilter {
	pub region: Option<Region>,
	pub city: Option<String>,
	pub category: Option<Category>,
	pub open_now: Option<(u8, u8, u8)>, // (weekday, hour, minute)
	pub radius_km_from: Option<(f64, f64)>,
	pub limit: u32,
	pub offset: u32,
}

impl LocationFilter {
	pub fn with_limit(limit: u32) -> Self {
		LocationFilter { limit, ..Default::default() }
	}
}

/// Read-only snapshot access to the location catalog. Implementations may
/// cache pages briefly but must never mutate a returned `Location`.
#[async_trait]
pub trait LocationStore: Send + Sync {
	async fn list_by_filter(&self, filter: &LocationFilter) -> Result<Vec<Location>, AppError>;

	/// Missing ids are omitted, never an error.
	async fn bulk_by_ids(&self, ids: &[String]) -> Result<Vec<Location>, AppError>;

	async fn nearby(
		&self,
		lat: f64,
		lng: f64,
		radius_km: f64,
		filter: &LocationFilter,
	) -> Result<Vec<Location>, AppError>;
}

/// Orders a page the way every `LocationStore` implementation must:
/// `rating desc NULLS LAST, reviewCount desc NULLS LAST, id asc`.
pub fn sort_page(locations: &mut [Location]) {
	locations.sort_by(|a, b| {
		rating_key(b.rating)
			.cmp(&rating_key(a.rating))
			.then_with(|| review_key(b.review_count).cmp(&review_key(a.review_count)))
			.then_with(|| a.id.cmp(&b.id))
	});
}

// NULLS LAST under a descending sort means "sorts after every real value";
// representing as Option<OrderedFloat> would need an extra dependency, so we
// bucket into (has_value, bits) and compare tuples instead.
fn rating_key(rating: Option<f64>) -> (u8, u64) {
	match rating {
		Some(r) => (1, r.to_bits()),
		None => (0, 0),
	}
}

fn review_key(count: Option<u32>) -> (u8, u32) {
	match count {
		Some(c) => (1, c),
		None => (0, 0),
	}
}
