/*
 * src/store/memory.rs
 *
 * In-memory `LocationStore` seeded from fixture data. Used by unit and
 * integration tests so the planner's own test suite never needs a live
 * database.
 */

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::AppError;
use crate::geo::distance::haversine_km;
use crate::models::location::Location;
use crate::store::{LocationFilter, LocationStore, sort_page};

pub struct InMemoryLocationStore {
	locations: HashMap<String, Location>,
}

impl InMemoryLocationStore {
	pub fn new(locations: Vec<Location>) -> Self {
		let locations = locations.into_iter().map(|loc| (loc.id.clone(), loc)).collect();
		Self { locations }
	}

	pub fn empty() -> Self {
		Self { locations: HashMap::new() }
	}
}

#[async_trait]
impl LocationStore for InMemoryLocationStore {
	async fn list_by_filter(&self, filter: &LocationFilter) -> Result<Vec<Location>, AppError> {
		let mut matches: Vec<Location> = self
			.locations
			.values()
			.filter(|loc| matches_filter(loc, filter))
			.cloned()
			.collect();

		sort_page(&mut matches);

		let start = (filter.offset as usize).min(matches.len());
		let end = (start + filter.limit as usize).min(matches.len());
		Ok(matches[start..end].to_vec())
	}

	async fn bulk_by_ids(&self, ids: &[String]) -> Result<Vec<Location>, AppError> {
		Ok(ids.iter().filter_map(|id| self.locations.get(id)).cloned().collect())
	}

	async fn nearby(
		&self,
		lat: f64,
		lng: f64,
		radius_km: f64,
		filter: &LocationFilter,
	) -> Result<Vec<Location>, AppError> {
		let origin = crate::geo::Coordinates::new(lat, lng);
		let mut matches: Vec<Location> = self
			.locations
			.values()
			.filter(|loc| matches_filter(loc, filter))
			.filter(|loc| loc.coordinates.is_some_and(|c| haversine_km(origin, c) <= radius_km))
			.cloned()
			.collect();

		sort_page(&mut matches);
		Ok(matches)
	}
}

fn matches_filter(loc: &Location, filter: &LocationFilter) -> bool {
	if let Some(region) = filter.region {
		if loc.region != region {
			return false;
		}
	}
	if let Some(city) = &filter.city {
		if &loc.city != city {
			return false;
		}
	}
	if let Some(category) = filter.category {
		if loc.category != category {
			return false;
		}
	}
	if filter.radius_km_from.is_some() && loc.coordinates.is_none() {
		return false;
	}
	if let Some((weekday, hour, minute)) = filter.open_now {
		if !loc.is_open_at(weekday, hour, minute) {
			return false;
		}
	}
	true
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Coordinates;
	use crate::sql_models::{Category, Region};

	fn location(id: &str, rating: Option<f64>, review_count: Option<u32>) -> Location {
		Location {
			id: id.to_string(),
			name: id.to_string(),
			category: Category::Culture,
			city: "Kyoto".to_string(),
			prefecture: Some("Kyoto".to_string()),
			region: Region::Kansai,
			coordinates: Some(Coordinates::new(35.0116, 135.7681)),
			rating,
			review_count,
			operating_hours: None,
			price_level: None,
			tags: vec![],
			recommended_visit_minutes: Some(60),
			place_id: None,
		}
	}

	#[tokio::test]
	async fn orders_by_rating_desc_nulls_last_then_id() {
		let store = InMemoryLocationStore::new(vec![
			location("c", None, None),
			location("a", Some(4.5), Some(10)),
			location("b", Some(4.5), Some(20)),
		]);

		let results = store.list_by_filter(&LocationFilter::with_limit(10)).await.unwrap();
		let ids: Vec<&str> = results.iter().map(|l| l.id.as_str()).collect();
		assert_eq!(ids, vec!["b", "a", "c"]);
	}

	#[tokio::test]
	async fn bulk_by_ids_omits_missing() {
		let store = InMemoryLocationStore::new(vec![location("a", None, None)]);
		let results = store.bulk_by_ids(&["a".to_string(), "missing".to_string()]).await.unwrap();
		assert_eq!(results.len(), 1);
	}
}
