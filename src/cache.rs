/*
 * src/cache.rs
 *
 * Result Cache & Single-Flight (C). Keyed by a fingerprint of the
 * normalized request; `moka`'s `try_get_with` natively provides the
 * per-key single-flight, LRU, and TTL contract this module needs, so there is
 * no hand-rolled lock map here.
 */

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

use crate::models::itinerary::{DayIntro, Itinerary};
use crate::models::trip::{Pace, TripRequest};
use crate::sql_models::{BudgetBucket, Category};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedPlan {
	pub trip_id: String,
	pub itinerary: Itinerary,
	pub day_intros: Vec<DayIntro>,
}

/// Stable hash over the canonicalized request: sorted cities, sorted
/// interests, duration, pace, budget bucket. `savedIds` never participates:
/// requests that carry them bypass the cache entirely (see
/// `TripRequest::bypasses_cache`).
pub fn fingerprint(request: &TripRequest) -> u64 {
	let mut cities = request.cities.clone();
	cities.sort();
	cities.dedup();

	let mut interests: Vec<Category> = request.interests.clone();
	interests.sort_by_key(category_rank);
	interests.dedup();

	let mut hasher = std::collections::hash_map::DefaultHasher::new();
	request.duration.hash(&mut hasher);
	cities.hash(&mut hasher);
	interests.iter().for_each(|i| category_rank(i).hash(&mut hasher));
	pace_rank(request.pace).hash(&mut hasher);
	request.budget.map(budget_rank).hash(&mut hasher);
	hasher.finish()
}

fn category_rank(category: &Category) -> u8 {
	match category {
		Category::Culture => 0,
		Category::Nature => 1,
		Category::Food => 2,
		Category::Shopping => 3,
		Category::Attraction => 4,
		Category::Hotel => 5,
	}
}

fn pace_rank(pace: Pace) -> u8 {
	match pace {
		Pace::Relaxed => 0,
		Pace::Balanced => 1,
		Pace::Fast => 2,
	}
}

fn budget_rank(budget: BudgetBucket) -> u8 {
	match budget {
		BudgetBucket::VeryLow => 0,
		BudgetBucket::Low => 1,
		BudgetBucket::Medium => 2,
		BudgetBucket::High => 3,
		BudgetBucket::Luxury => 4,
	}
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct BuildFailed(pub String);

pub struct PlanCache {
	inner: Cache<u64, Arc<CachedPlan>>,
}

impl PlanCache {
	pub fn new(capacity: u64, ttl: Duration) -> Self {
		let inner = Cache::builder().max_capacity(capacity).time_to_live(ttl).build();
		Self { inner }
	}

	/// Returns `(plan, was_hit)`. On a miss, `init` runs under moka's
	/// per-key coalescing lock: concurrent callers for the same fingerprint
	/// share one in-flight build and all observe its result.
	pub async fn get_or_build<F, Fut>(
		&self,
		key: u64,
		init: F,
	) -> Result<(Arc<CachedPlan>, bool), BuildFailed>
	where
		F: FnOnce() -> Fut,
		Fut: std::future::Future<Output = Result<CachedPlan, BuildFailed>>,
	{
		if let Some(hit) = self.inner.get(&key).await {
			return Ok((hit, true));
		}

		let built = self
			.inner
			.try_get_with(key, async move { init().await.map(Arc::new) })
			.await
			.map_err(|arc_err| BuildFailed(arc_err.0.clone()))?;

		Ok((built, false))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	fn sample_request() -> TripRequest {
		TripRequest {
			duration: 3,
			start_date: None,
			cities: vec!["Kyoto".to_string()],
			interests: vec![Category::Food, Category::Culture],
			pace: Pace::Balanced,
			budget: None,
			party: None,
			saved_ids: vec![],
			trip_id: None,
		}
	}

	#[test]
	fn fingerprint_is_stable_under_reordering() {
		let mut a = sample_request();
		let mut b = sample_request();
		b.interests.reverse();
		a.cities.push("Osaka".to_string());
		b.cities = vec!["Osaka".to_string(), "Kyoto".to_string()];

		assert_eq!(fingerprint(&a), fingerprint(&b));
	}

	#[test]
	fn fingerprint_differs_on_pace() {
		let mut a = sample_request();
		let mut b = sample_request();
		b.pace = Pace::Fast;
		a.pace = Pace::Relaxed;
		assert_ne!(fingerprint(&a), fingerprint(&b));
	}

	#[tokio::test]
	async fn concurrent_builds_for_same_key_run_once() {
		let cache = PlanCache::new(64, Duration::from_secs(60));
		let calls = Arc::new(AtomicUsize::new(0));

		let mut handles = Vec::new();
		for _ in 0..15 {
			let cache = &cache;
			let calls = calls.clone();
			handles.push(async move {
				cache
					.get_or_build(42, || async move {
						calls.fetch_add(1, Ordering::SeqCst);
						tokio::time::sleep(Duration::from_millis(10)).await;
						Ok(CachedPlan {
							trip_id: "t1".to_string(),
							itinerary: Itinerary { days: vec![] },
							day_intros: vec![],
						})
					})
					.await
			});
		}

		let results = futures::future::join_all(handles).await;
		assert!(results.iter().all(|r| r.is_ok()));
		assert_eq!(calls.load(Ordering::SeqCst), 1);
	}
}
