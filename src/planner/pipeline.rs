/*
 * src/planner/pipeline.rs
 *
 * Orchestrates G -> L -> S -> P -> R -> T -> V into a single generation
 * call: pack every day, sequence cities, attach travel legs via the
 * routing oracle, enrich with weather, then validate. No caching or
 * rate-limiting here, that's the HTTP entrypoint's job (`controllers`).
 */

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::error::AppError;
use crate::models::itinerary::{Activity, Day, DayIntro, Itinerary, Trip, TravelLeg, TravelMode};
use crate::models::location::Location;
use crate::models::trip::TripRequest;
use crate::models::validation::Validation;
use crate::oracles::{RoutingOracle, WeatherOracle};
use crate::planner::enrichment;
use crate::planner::packer::{PackContext, pack_day};
use crate::planner::sequencer::{assign_days, order_cities};
use crate::planner::validator::validate;
use crate::store::LocationStore;

pub struct GeneratorDeps<'a> {
	pub store: &'a dyn LocationStore,
	pub routing: &'a dyn RoutingOracle,
	pub weather: &'a dyn WeatherOracle,
}

pub struct GenerationOutput {
	pub trip: Trip,
	pub day_intros: Vec<DayIntro>,
}

pub async fn generate(request: &TripRequest, deps: &GeneratorDeps<'_>) -> Result<GenerationOutput, AppError> {
	let ordered_cities = order_cities(&request.cities);
	let assignments = assign_days(&ordered_cities, request.duration);

	let saved_ids: HashSet<String> = request.saved_ids.iter().cloned().collect();
	let pack_ctx = PackContext {
		interests: &request.interests,
		pace: request.pace,
		budget: request.budget,
		party: request.party.as_ref(),
		saved_ids: &saved_ids,
	};

	let mut already_placed: HashSet<String> = HashSet::new();
	let mut days: Vec<Day> = Vec::with_capacity(assignments.len());

	for (day_index, assignment) in assignments.iter().enumerate() {
		let activities = pack_day(day_index as u32, &assignment.city, deps.store, &pack_ctx, &mut already_placed).await?;
		days.push(Day {
			city_id: assignment.city.clone(),
			date: None,
			activities,
			city_transition: assignment.city_transition,
			weather: None,
		});
	}

	let all_ids: Vec<String> = already_placed.into_iter().collect();
	let locations = deps.store.bulk_by_ids(&all_ids).await?;
	let locations_by_id: HashMap<String, Location> = locations.into_iter().map(|l| (l.id.clone(), l)).collect();

	attach_travel_legs(&mut days, &locations_by_id, deps.routing).await;

	let day_intros = enrichment::enrich_days(&mut days, request.start_date, deps.weather).await;

	let itinerary = Itinerary { days };
	let validation: Validation = validate(&itinerary, &locations_by_id);

	let trip_id = request.trip_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
	let trip = Trip { id: trip_id, itinerary, validation };

	Ok(GenerationOutput { trip, day_intros })
}

/// Walks every day's activities and fills in `travelFromPrevious` for
/// place-to-place pairs, including the inter-city leg carried by the first
/// activity of a city-transition day.
async fn attach_travel_legs(
	days: &mut [Day],
	locations_by_id: &HashMap<String, Location>,
	routing: &dyn RoutingOracle,
) {
	let mut previous_location: Option<&Location> = None;

	for day in days.iter_mut() {
		let is_transition_day = day.city_transition;
		if !is_transition_day {
			previous_location = None;
		}
		let mut first_in_day = true;

		for activity in day.activities.iter_mut() {
			let Activity::Place(place) = activity else { continue };
			let Some(current) = locations_by_id.get(&place.id) else {
				previous_location = None;
				first_in_day = false;
				continue;
			};

			if let Some(prev) = previous_location {
				if let (Some(origin), Some(destination)) = (prev.coordinates, current.coordinates) {
					let mode = if first_in_day && is_transition_day { TravelMode::Driving } else { TravelMode::Walking };
					if let Ok(estimate) = routing.estimate(origin, destination, mode).await {
						place.travel_from_previous = Some(TravelLeg {
							mode,
							duration_minutes: (estimate.duration_seconds + 59) / 60,
							distance_meters: estimate.distance_meters,
							departure_time: place.start_time.clone(),
						});
					}
				}
			}

			previous_location = Some(current);
			first_in_day = false;
		}
	}
}
