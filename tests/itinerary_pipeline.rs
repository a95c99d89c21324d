/*
 * tests/itinerary_pipeline.rs
 *
 * End-to-end exercise of the generation pipeline (G -> L -> S -> P -> R -> T
 * -> V) against an in-memory catalog and fake oracles, with no network or
 * database involved. Covers the concrete end-to-end scenarios and testable
 * properties the planner is expected to satisfy.
 */

use std::collections::HashSet;

use journey_planner::cache;
use journey_planner::geo::Coordinates;
use journey_planner::models::itinerary::Activity;
use journey_planner::models::location::Location;
use journey_planner::models::trip::{Pace, TripRequest};
use journey_planner::oracles::fakes::{fake_routing_oracle, FixedWeatherOracle};
use journey_planner::planner::pipeline::{generate, GeneratorDeps};
use journey_planner::sql_models::{Category, Region};
use journey_planner::store::memory::InMemoryLocationStore;

fn location(id: &str, city: &str, region: Region, category: Category, rating: f64, coords: (f64, f64)) -> Location {
	Location {
		id: id.to_string(),
		name: id.to_string(),
		category,
		city: city.to_string(),
		prefecture: Some(match region {
			Region::Kansai => "Kyoto".to_string(),
			Region::Kanto => "Tokyo".to_string(),
			_ => city.to_string(),
		}),
		region,
		coordinates: Some(Coordinates::new(coords.0, coords.1)),
		rating: Some(rating),
		review_count: Some(500),
		operating_hours: None,
		price_level: Some(1),
		tags: vec![],
		recommended_visit_minutes: Some(90),
		place_id: None,
	}
}

/// A generous Kyoto catalog: enough locations per category that the packer
/// never has to fall back to a `note` placeholder.
fn kyoto_catalog() -> Vec<Location> {
	let base = (35.0116, 135.7681);
	let mut locations = Vec::new();
	for (prefix, category) in [
		("culture", Category::Culture),
		("food", Category::Food),
		("nature", Category::Nature),
		("shopping", Category::Shopping),
		("attraction", Category::Attraction),
	] {
		for i in 0..6 {
			let id = format!("kyoto-{prefix}-{i}");
			let jitter = i as f64 * 0.01;
			locations.push(location(&id, "Kyoto", Region::Kansai, category, 4.0 + (i as f64 * 0.05), (base.0 + jitter, base.1 + jitter)));
		}
	}
	locations
}

fn tokyo_catalog() -> Vec<Location> {
	let base = (35.6762, 139.6503);
	let mut locations = Vec::new();
	for (prefix, category) in [("culture", Category::Culture), ("food", Category::Food)] {
		for i in 0..6 {
			let id = format!("tokyo-{prefix}-{i}");
			let jitter = i as f64 * 0.01;
			locations.push(location(&id, "Tokyo", Region::Kanto, category, 4.0 + (i as f64 * 0.05), (base.0 + jitter, base.1 + jitter)));
		}
	}
	locations
}

fn deps<'a>(store: &'a InMemoryLocationStore, routing: &'a dyn journey_planner::oracles::RoutingOracle, weather: &'a FixedWeatherOracle) -> GeneratorDeps<'a> {
	GeneratorDeps { store, routing, weather }
}

fn sample_request(duration: u32, cities: Vec<&str>, interests: Vec<Category>, pace: Pace) -> TripRequest {
	TripRequest {
		duration,
		start_date: None,
		cities: cities.into_iter().map(String::from).collect(),
		interests,
		pace,
		budget: None,
		party: None,
		saved_ids: vec![],
		trip_id: None,
	}
}

#[tokio::test]
async fn scenario_three_day_kyoto_trip_has_no_duplicates_and_correct_region() {
	let store = InMemoryLocationStore::new(kyoto_catalog());
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(3, vec!["Kyoto"], vec![Category::Culture, Category::Food, Category::Nature], Pace::Balanced);

	let output = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let itinerary = &output.trip.itinerary;

	assert_eq!(itinerary.days.len(), 3);

	let mut seen = HashSet::new();
	for day in &itinerary.days {
		assert_eq!(day.city_id, "Kyoto");
		for activity in &day.activities {
			if let Some(id) = activity.place_id() {
				assert!(seen.insert(id.to_string()), "duplicate place id {id} across the itinerary");
			}
		}
	}
}

#[tokio::test]
async fn scenario_single_day_kyoto_fills_all_three_slots() {
	let store = InMemoryLocationStore::new(kyoto_catalog());
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(1, vec!["Kyoto"], vec![Category::Food, Category::Culture], Pace::Balanced);

	let output = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let day = &output.trip.itinerary.days[0];

	use journey_planner::sql_models::TimeOfDay;
	let slots: HashSet<TimeOfDay> = day.activities.iter().map(|a| a.time_of_day()).collect();
	assert!(slots.contains(&TimeOfDay::Morning));
	assert!(slots.contains(&TimeOfDay::Afternoon));
	assert!(slots.contains(&TimeOfDay::Evening));
}

#[tokio::test]
async fn scenario_multi_region_trip_visits_kansai_before_kanto() {
	let mut all = kyoto_catalog();
	all.extend(tokyo_catalog());
	let store = InMemoryLocationStore::new(all);
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(6, vec!["Kyoto", "Tokyo"], vec![Category::Culture, Category::Food], Pace::Balanced);

	let output = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let cities: Vec<&str> = output.trip.itinerary.days.iter().map(|d| d.city_id.as_str()).collect();

	let last_kyoto = cities.iter().rposition(|&c| c == "Kyoto");
	let first_tokyo = cities.iter().position(|&c| c == "Tokyo");
	if let (Some(last_kyoto), Some(first_tokyo)) = (last_kyoto, first_tokyo) {
		assert!(last_kyoto < first_tokyo, "expected all Kyoto days before any Tokyo day");
	}

	let transitions = output.trip.itinerary.days.iter().filter(|d| d.city_transition).count();
	assert_eq!(transitions, 1, "two regions selected should produce exactly one transition");
}

#[tokio::test]
async fn fast_pace_packs_at_least_as_densely_as_relaxed_pace() {
	let store = InMemoryLocationStore::new(kyoto_catalog());
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let interests = vec![Category::Culture, Category::Food, Category::Nature, Category::Shopping];

	let fast_request = sample_request(3, vec!["Kyoto"], interests.clone(), Pace::Fast);
	let relaxed_request = sample_request(3, vec!["Kyoto"], interests, Pace::Relaxed);

	let fast = generate(&fast_request, &deps(&store, &routing, &weather)).await.unwrap();
	let relaxed = generate(&relaxed_request, &deps(&store, &routing, &weather)).await.unwrap();

	let mean_places = |days: &[journey_planner::models::itinerary::Day]| -> f64 {
		let total: usize = days.iter().map(|d| d.place_count()).sum();
		total as f64 / days.len() as f64
	};

	assert!(mean_places(&fast.trip.itinerary.days) >= mean_places(&relaxed.trip.itinerary.days));
}

#[tokio::test]
async fn thin_pool_falls_back_to_note_placeholders_not_errors() {
	// Only two locations total: nowhere near the pace minimum for any slot
	// count beyond the first couple of picks.
	let store = InMemoryLocationStore::new(vec![
		location("only-1", "Kyoto", Region::Kansai, Category::Culture, 4.5, (35.0116, 135.7681)),
		location("only-2", "Kyoto", Region::Kansai, Category::Food, 4.2, (35.02, 135.77)),
	]);
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(1, vec!["Kyoto"], vec![Category::Culture], Pace::Fast);

	let output = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let day = &output.trip.itinerary.days[0];

	assert!(day.activities.iter().any(|a| matches!(a, Activity::Note(_))));
	assert_eq!(day.activities.len(), 3, "every slot is filled, by a place or a note");
}

#[tokio::test]
async fn equal_fingerprints_are_stable_across_independent_generations() {
	let store = InMemoryLocationStore::new(kyoto_catalog());
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(2, vec!["Kyoto"], vec![Category::Culture, Category::Food], Pace::Balanced);

	// Same fixed store snapshot and request: the packer is deterministic, so
	// two independent generations must choose the exact same activities.
	let first = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let second = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();

	let ids = |trip: &journey_planner::models::itinerary::Itinerary| -> Vec<&str> {
		trip.days.iter().flat_map(|d| &d.activities).filter_map(|a| a.place_id()).collect()
	};
	assert_eq!(ids(&first.trip.itinerary), ids(&second.trip.itinerary));

	assert_eq!(cache::fingerprint(&request), cache::fingerprint(&request));
}

#[tokio::test]
async fn empty_interests_falls_back_without_nan_scores() {
	let store = InMemoryLocationStore::new(kyoto_catalog());
	let routing = fake_routing_oracle();
	let weather = FixedWeatherOracle;
	let request = sample_request(1, vec!["Kyoto"], vec![], Pace::Balanced);

	let output = generate(&request, &deps(&store, &routing, &weather)).await.unwrap();
	let day = &output.trip.itinerary.days[0];
	assert!(day.place_count() >= 3, "rating-weighted fallback should still fill slots with no interests selected");
}
