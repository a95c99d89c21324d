/*
 * src/planner/validator.rs
 *
 * Validator (V). Runs after packing and sequencing; emits issues but never
 * fails the request. Errors are surfaced to the client alongside the
 * itinerary so it can show corrective UI. The region-consistency rule
 * shares its check with ingest-time validation (`geo::validate_city_against_region`)
 * so the two call sites cannot drift apart.
 */

use std::collections::{HashMap, HashSet};

use crate::geo::region_of;
use crate::models::itinerary::{Activity, Itinerary};
use crate::models::location::Location;
use crate::models::validation::{Issue, IssueCategory, Severity, Validation};

pub fn validate(itinerary: &Itinerary, locations_by_id: &HashMap<String, Location>) -> Validation {
	let mut issues = Vec::new();

	check_duplicate_ids(itinerary, &mut issues);
	check_minimum_density(itinerary, &mut issues);
	check_category_diversity(itinerary, locations_by_id, &mut issues);
	check_neighborhood_clustering(itinerary, locations_by_id, &mut issues);
	check_region_consistency(itinerary, locations_by_id, &mut issues);

	Validation::from_issues(issues)
}

fn check_duplicate_ids(itinerary: &Itinerary, issues: &mut Vec<Issue>) {
	let mut seen = HashSet::new();
	for day in &itinerary.days {
		for activity in &day.activities {
			if let Some(id) = activity.place_id() {
				if !seen.insert(id.to_string()) {
					issues.push(Issue {
						severity: Severity::Error,
						category: IssueCategory::DuplicateLocation,
						message: format!("location {id} appears more than once in the itinerary"),
						day_index: None,
					});
				}
			}
		}
	}
}

fn check_minimum_density(itinerary: &Itinerary, issues: &mut Vec<Issue>) {
	for (index, day) in itinerary.days.iter().enumerate() {
		if day.place_count() < 2 {
			issues.push(Issue {
				severity: Severity::Warning,
				category: IssueCategory::MinimumDensity,
				message: format!("day {} has fewer than 2 place activities", index + 1),
				day_index: Some(index as u32),
			});
		}
	}
}

fn check_category_diversity(
	itinerary: &Itinerary,
	locations_by_id: &HashMap<String, Location>,
	issues: &mut Vec<Issue>,
) {
	for (index, day) in itinerary.days.iter().enumerate() {
		let place_ids: Vec<&str> = day.activities.iter().filter_map(|a| a.place_id()).collect();
		if place_ids.is_empty() {
			continue;
		}

		let mut counts: HashMap<_, u32> = HashMap::new();
		for id in &place_ids {
			if let Some(location) = locations_by_id.get(*id) {
				*counts.entry(location.category).or_insert(0) += 1;
			}
		}

		if let Some(&max) = counts.values().max() {
			if (max as f64) > 0.5 * (place_ids.len() as f64) {
				issues.push(Issue {
					severity: Severity::Warning,
					category: IssueCategory::CategoryDiversity,
					message: format!("day {} is dominated by a single category", index + 1),
					day_index: Some(index as u32),
				});
			}
		}
	}
}

fn check_neighborhood_clustering(
	itinerary: &Itinerary,
	locations_by_id: &HashMap<String, Location>,
	issues: &mut Vec<Issue>,
) {
	for (index, day) in itinerary.days.iter().enumerate() {
		let neighborhoods: Vec<&str> = day
			.activities
			.iter()
			.filter_map(|a| a.place_id())
			.filter_map(|id| locations_by_id.get(id))
			.map(|loc| loc.neighborhood())
			.collect();

		let mut run_len = 1usize;
		for window in neighborhoods.windows(2) {
			if window[0] == window[1] {
				run_len += 1;
				if run_len >= 4 {
					issues.push(Issue {
						severity: Severity::Warning,
						category: IssueCategory::NeighborhoodClustering,
						message: format!("day {} clusters four or more stops in one neighborhood", index + 1),
						day_index: Some(index as u32),
					});
					break;
				}
			} else {
				run_len = 1;
			}
		}
	}
}

fn check_region_consistency(
	itinerary: &Itinerary,
	locations_by_id: &HashMap<String, Location>,
	issues: &mut Vec<Issue>,
) {
	for (index, day) in itinerary.days.iter().enumerate() {
		for activity in &day.activities {
			let Activity::Place(place) = activity else { continue };
			let Some(location) = locations_by_id.get(&place.id) else { continue };
			let Some(prefecture) = &location.prefecture else { continue };
			if region_of(prefecture).is_some_and(|expected| expected != location.region) {
				issues.push(Issue {
					severity: Severity::Error,
					category: IssueCategory::RegionConsistency,
					message: format!("{} is tagged {:?} but its prefecture implies a different region", place.id, location.region),
					day_index: Some(index as u32),
				});
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Coordinates;
	use crate::models::itinerary::{Day, PlaceActivity};
	use crate::sql_models::{Category, Region, TimeOfDay};

	fn place(id: &str, time_of_day: TimeOfDay) -> Activity {
		Activity::Place(PlaceActivity {
			id: id.to_string(),
			time_of_day,
			start_time: None,
			end_time: None,
			tags: vec![],
			travel_from_previous: None,
		})
	}

	fn location(id: &str, region: Region, prefecture: &str) -> Location {
		Location {
			id: id.to_string(),
			name: id.to_string(),
			category: Category::Culture,
			city: "Kyoto".to_string(),
			prefecture: Some(prefecture.to_string()),
			region,
			coordinates: Some(Coordinates::new(35.0, 135.0)),
			rating: None,
			review_count: None,
			operating_hours: None,
			price_level: None,
			tags: vec![],
			recommended_visit_minutes: None,
			place_id: None,
		}
	}

	#[test]
	fn flags_duplicate_ids_across_days() {
		let itinerary = Itinerary {
			days: vec![
				Day { city_id: "Kyoto".into(), date: None, activities: vec![place("a", TimeOfDay::Morning)], city_transition: false, weather: None },
				Day { city_id: "Kyoto".into(), date: None, activities: vec![place("a", TimeOfDay::Morning)], city_transition: false, weather: None },
			],
		};
		let result = validate(&itinerary, &HashMap::new());
		assert!(!result.valid);
		assert_eq!(result.summary.errors, 1);
	}

	#[test]
	fn flags_region_mismatch() {
		let itinerary = Itinerary {
			days: vec![Day {
				city_id: "Kyoto".into(),
				date: None,
				activities: vec![place("a", TimeOfDay::Morning)],
				city_transition: false,
				weather: None,
			}],
		};
		let mut locations = HashMap::new();
		locations.insert("a".to_string(), location("a", Region::Kanto, "Kyoto"));

		let result = validate(&itinerary, &locations);
		assert!(result.issues.iter().any(|i| i.category == IssueCategory::RegionConsistency));
	}

	#[test]
	fn passes_clean_itinerary() {
		let itinerary = Itinerary {
			days: vec![Day {
				city_id: "Kyoto".into(),
				date: None,
				activities: vec![place("a", TimeOfDay::Morning), place("b", TimeOfDay::Afternoon)],
				city_transition: false,
				weather: None,
			}],
		};
		let mut locations = HashMap::new();
		locations.insert("a".to_string(), location("a", Region::Kansai, "Kyoto"));
		locations.insert("b".to_string(), location("b", Region::Kansai, "Kyoto"));

		let result = validate(&itinerary, &locations);
		assert_eq!(result.summary.errors, 0);
	}
}
