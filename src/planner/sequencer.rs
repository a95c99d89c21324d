/*
 * src/planner/sequencer.rs
 *
 * Route Sequencer (R). Orders selected cities across the trip's days:
 * cities are grouped by region (minimizing region transitions), days are
 * allocated proportionally per city, and within a region the visiting
 * order is a deterministic nearest-neighbor walk over city centers. This
 * only orders *cities*: it never reorders a day's already-packed
 * activities.
 */

use std::collections::HashMap;

use crate::geo::Coordinates;
use crate::geo::distance::haversine_km;
use crate::geo::tables::{CITY_CENTERS, CITY_REGION};
use crate::sql_models::Region;

#[derive(Debug, Clone)]
pub struct DayAssignment {
	pub city: String,
	pub city_transition: bool,
}

fn city_region(city: &str) -> Option<Region> {
	CITY_REGION.get(city.to_lowercase().as_str()).copied()
}

fn city_coordinates(city: &str) -> Option<Coordinates> {
	CITY_CENTERS.get(city.to_lowercase().as_str()).map(|&(lat, lng)| Coordinates::new(lat, lng))
}

/// Orders `cities` region-by-region: within each region a nearest-neighbor
/// walk starting from the city closest to the previous region's last stop
/// (or a fixed start for the first region). Cities with no known region
/// are treated as their own singleton region, keeping them from silently
/// disappearing from the sequence.
pub fn order_cities(cities: &[String]) -> Vec<String> {
	let mut by_region: HashMap<Option<Region>, Vec<String>> = HashMap::new();
	for city in cities {
		by_region.entry(city_region(city)).or_default().push(city.clone());
	}

	// Deterministic region visiting order: by the lowest-indexed city in
	// each group as it first appeared in the input.
	let mut region_keys: Vec<Option<Region>> = by_region.keys().copied().collect();
	region_keys.sort_by_key(|region| cities.iter().position(|c| city_region(c) == *region).unwrap_or(usize::MAX));

	let mut ordered = Vec::with_capacity(cities.len());
	let mut previous_last: Option<Coordinates> = None;

	for region in region_keys {
		let mut group = by_region.remove(&region).unwrap();
		let walked = nearest_neighbor_walk(&mut group, previous_last);
		if let Some(last_city) = walked.last() {
			previous_last = city_coordinates(last_city);
		}
		ordered.extend(walked);
	}

	ordered
}

/// Deterministic nearest-neighbor path construction over city centers.
/// Cities with no known center keep their relative input order and are
/// visited last, since a path to an unknown point can't be ordered by
/// distance.
fn nearest_neighbor_walk(cities: &mut Vec<String>, start_near: Option<Coordinates>) -> Vec<String> {
	let mut known: Vec<String> = Vec::new();
	let mut unknown: Vec<String> = Vec::new();
	for city in cities.drain(..) {
		if city_coordinates(&city).is_some() {
			known.push(city);
		} else {
			unknown.push(city);
		}
	}

	let mut ordered = Vec::with_capacity(known.len());
	let mut current = start_near;

	while !known.is_empty() {
		let next_idx = match current {
			Some(from) => known
				.iter()
				.enumerate()
				.min_by(|(_, a), (_, b)| {
					let da = haversine_km(from, city_coordinates(a).unwrap());
					let db = haversine_km(from, city_coordinates(b).unwrap());
					da.partial_cmp(&db).unwrap()
				})
				.map(|(i, _)| i)
				.unwrap(),
			None => 0,
		};
		let next_city = known.remove(next_idx);
		current = city_coordinates(&next_city);
		ordered.push(next_city);
	}

	ordered.extend(unknown);
	ordered
}

/// Allocates `duration` days across `cities` (already ordered), proportional
/// to the count of cities with the remainder going to the earlier cities,
/// clamped so every city gets at least one day when `duration >= cities.len()`.
pub fn assign_days(cities: &[String], duration: u32) -> Vec<DayAssignment> {
	if cities.is_empty() || duration == 0 {
		return Vec::new();
	}

	let n = cities.len() as u32;
	let base = duration / n;
	let mut remainder = duration % n;

	let mut per_city_days: Vec<u32> = Vec::with_capacity(cities.len());
	for _ in cities {
		let mut days = base;
		if remainder > 0 {
			days += 1;
			remainder -= 1;
		}
		if days == 0 && duration >= n {
			days = 1;
		}
		per_city_days.push(days);
	}

	let mut assignments = Vec::with_capacity(duration as usize);
	let mut previous_city: Option<&str> = None;
	for (city, days) in cities.iter().zip(per_city_days) {
		for day_in_city in 0..days {
			let transition = day_in_city == 0 && previous_city.is_some_and(|p| p != city.as_str());
			assignments.push(DayAssignment { city: city.clone(), city_transition: transition });
		}
		previous_city = Some(city);
	}

	assignments
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_city_has_no_transitions() {
		let cities = order_cities(&["Kyoto".to_string()]);
		let assignments = assign_days(&cities, 5);
		assert!(assignments.iter().all(|a| !a.city_transition));
		assert!(assignments.iter().all(|a| a.city == "Kyoto"));
	}

	#[test]
	fn kansai_cities_grouped_before_kanto() {
		let ordered = order_cities(&["Tokyo".to_string(), "Kyoto".to_string(), "Osaka".to_string()]);
		let kansai_positions: Vec<usize> =
			ordered.iter().enumerate().filter(|(_, c)| city_region(c) == Some(Region::Kansai)).map(|(i, _)| i).collect();
		let kanto_positions: Vec<usize> =
			ordered.iter().enumerate().filter(|(_, c)| city_region(c) == Some(Region::Kanto)).map(|(i, _)| i).collect();

		assert_eq!(kansai_positions.len(), 2);
		assert_eq!(kanto_positions.len(), 1);
		assert!(kansai_positions.iter().max().unwrap() < kanto_positions.iter().min().unwrap());
	}

	#[test]
	fn at_most_one_transition_between_two_cities() {
		let cities = order_cities(&["Kyoto".to_string(), "Tokyo".to_string()]);
		let assignments = assign_days(&cities, 10);
		let transitions = assignments.iter().filter(|a| a.city_transition).count();
		assert_eq!(transitions, 1);
	}

	#[test]
	fn every_city_gets_at_least_one_day_when_duration_allows() {
		let cities = vec!["Kyoto".to_string(), "Osaka".to_string(), "Tokyo".to_string()];
		let assignments = assign_days(&cities, 3);
		let unique: std::collections::HashSet<&str> = assignments.iter().map(|a| a.city.as_str()).collect();
		assert_eq!(unique.len(), 3);
	}
}
