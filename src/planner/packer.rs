/*
 * src/planner/packer.rs
 *
 * Day Packer (P). Fills one day's morning/afternoon/evening slots from a
 * city-scoped candidate pool, round-robining the target category across
 * slots by day offset, capping category mix, and falling back to `note`
 * placeholders rather than ever leaving a slot empty.
 */

use std::collections::{HashMap, HashSet};

use chrono::NaiveTime;

use crate::error::AppError;
use crate::geo::Coordinates;
use crate::models::itinerary::{Activity, NoteActivity, PlaceActivity};
use crate::models::location::Location;
use crate::models::trip::{Pace, PartyProfile};
use crate::planner::scoring::{ScoringContext, score};
use crate::sql_models::{BudgetBucket, Category, TimeOfDay};
use crate::store::{LocationFilter, LocationStore};

pub struct PackContext<'a> {
	pub interests: &'a [Category],
	pub pace: Pace,
	pub budget: Option<BudgetBucket>,
	pub party: Option<&'a PartyProfile>,
	pub saved_ids: &'a HashSet<String>,
}

/// Default (start, length-minutes) window per slot.
fn slot_window(time_of_day: TimeOfDay) -> (NaiveTime, u32) {
	match time_of_day {
		TimeOfDay::Morning => (NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 150),
		TimeOfDay::Afternoon => (NaiveTime::from_hms_opt(12, 30, 0).unwrap(), 210),
		TimeOfDay::Evening => (NaiveTime::from_hms_opt(18, 0, 0).unwrap(), 150),
	}
}

pub async fn pack_day(
	day_index: u32,
	city: &str,
	store: &dyn LocationStore,
	ctx: &PackContext<'_>,
	already_placed: &mut HashSet<String>,
) -> Result<Vec<Activity>, AppError> {
	let mut pool = fetch_pool(city, store).await?;

	let (_min_per_slot, target_count) = ctx.pace.targets();
	let cap = ((target_count as f64) * 0.5).ceil() as u32;

	let mut slots: [Vec<Activity>; 3] = [Vec::new(), Vec::new(), Vec::new()];
	let mut category_counts: HashMap<Category, u32> = HashMap::new();
	let mut anchor: Option<Coordinates> = None;

	for (slot_pos, time_of_day) in [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening].into_iter().enumerate() {
		let target_category = if ctx.interests.is_empty() {
			None
		} else {
			Some(ctx.interests[(day_index as usize + slot_pos) % ctx.interests.len()])
		};

		if let Some((activity, coordinates)) = pick_best(
			&mut pool,
			ctx,
			already_placed,
			&mut category_counts,
			cap,
			anchor,
			target_category,
			time_of_day,
		) {
			if anchor.is_none() {
				anchor = coordinates;
			}
			slots[slot_pos].push(activity);
		} else {
			slots[slot_pos].push(placeholder_note(time_of_day));
		}
	}

	// Keep filling the slot with the fewest activities until the pace
	// target is reached or the pool runs dry. Ties favor morning, then
	// afternoon, then evening.
	loop {
		let total: usize = slots.iter().map(|s| s.iter().filter(|a| matches!(a, Activity::Place(_))).count()).sum();
		if total >= target_count as usize || pool.is_empty() {
			break;
		}

		let (smallest_idx, _) = slots
			.iter()
			.enumerate()
			.map(|(i, s)| (i, s.iter().filter(|a| matches!(a, Activity::Place(_))).count()))
			.min_by_key(|&(i, count)| (count, i))
			.unwrap();

		let time_of_day = [TimeOfDay::Morning, TimeOfDay::Afternoon, TimeOfDay::Evening][smallest_idx];

		match pick_best(&mut pool, ctx, already_placed, &mut category_counts, cap, anchor, None, time_of_day) {
			Some((activity, coordinates)) => {
				if anchor.is_none() {
					anchor = coordinates;
				}
				slots[smallest_idx].push(activity);
			}
			None => break,
		}
	}

	Ok(slots.into_iter().flatten().collect())
}

#[allow(clippy::too_many_arguments)]
fn pick_best(
	pool: &mut Vec<Location>,
	ctx: &PackContext<'_>,
	already_placed: &mut HashSet<String>,
	category_counts: &mut HashMap<Category, u32>,
	cap: u32,
	anchor: Option<Coordinates>,
	target_category: Option<Category>,
	time_of_day: TimeOfDay,
) -> Option<(Activity, Option<Coordinates>)> {
	let scoring_ctx = ScoringContext {
		interests: ctx.interests,
		pace: ctx.pace,
		budget: ctx.budget,
		party: ctx.party,
		saved_ids: ctx.saved_ids,
		anchor,
		already_placed: &*already_placed,
	};

	let mut best: Option<(usize, f64, u32, String)> = None; // (pool index, score, review_count, id)
	for (idx, location) in pool.iter().enumerate() {
		if location.category == Category::Hotel {
			continue;
		}
		let count = category_counts.get(&location.category).copied().unwrap_or(0);
		if count >= cap {
			continue;
		}
		let Some(result) = score(location, &scoring_ctx) else { continue };

		let is_target = target_category == Some(location.category);
		let review_count = location.review_count.unwrap_or(0);

		let candidate = (idx, result.value, review_count, location.id.clone());
		best = Some(match &best {
			None => candidate,
			Some(current) => {
				let current_is_target = target_category == Some(pool[current.0].category);
				if is_target != current_is_target {
					if is_target { candidate } else { current.clone() }
				} else if candidate.1 > current.1
					|| (candidate.1 == current.1 && candidate.2 > current.2)
					|| (candidate.1 == current.1 && candidate.2 == current.2 && candidate.3 < current.3)
				{
					candidate
				} else {
					current.clone()
				}
			}
		});
	}

	let (idx, _, _, _) = best?;
	let location = pool.remove(idx);
	already_placed.insert(location.id.clone());
	*category_counts.entry(location.category).or_insert(0) += 1;
	let coordinates = location.coordinates;

	Some((location_to_activity(&location, time_of_day), coordinates))
}

fn location_to_activity(location: &Location, time_of_day: TimeOfDay) -> Activity {
	let (start, default_len) = slot_window(time_of_day);
	let length = location.recommended_visit_minutes.unwrap_or(default_len).min(default_len);
	let end = start + chrono::Duration::minutes(length as i64);

	Activity::Place(PlaceActivity {
		id: location.id.clone(),
		time_of_day,
		start_time: Some(start.format("%H:%M").to_string()),
		end_time: Some(end.format("%H:%M").to_string()),
		tags: location.tags.clone(),
		travel_from_previous: None,
	})
}

fn placeholder_note(time_of_day: TimeOfDay) -> Activity {
	Activity::Note(NoteActivity {
		text: "No suitable location found for this slot".to_string(),
		time_of_day,
	})
}

async fn fetch_pool(city: &str, store: &dyn LocationStore) -> Result<Vec<Location>, AppError> {
	let primary = store
		.list_by_filter(&LocationFilter { city: Some(city.to_string()), limit: 200, ..LocationFilter::default() })
		.await?;

	if primary.len() >= 12 {
		return Ok(primary);
	}

	// Thin pool: widen with a secondary ring around the city's known
	// center, if one is on file.
	if let Some((lat, lng)) = crate::geo::tables::CITY_CENTERS.get(city.to_lowercase().as_str()).copied() {
		let ring = store.nearby(lat, lng, 50.0, &LocationFilter { limit: 200, ..LocationFilter::default() }).await?;
		let mut seen: HashSet<String> = primary.iter().map(|l| l.id.clone()).collect();
		let mut combined = primary;
		for location in ring {
			if seen.insert(location.id.clone()) {
				combined.push(location);
			}
		}
		return Ok(combined);
	}

	Ok(primary)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::geo::Coordinates;
	use crate::sql_models::Region;
	use crate::store::memory::InMemoryLocationStore;

	fn location(id: &str, category: Category, rating: f64) -> Location {
		Location {
			id: id.to_string(),
			name: id.to_string(),
			category,
			city: "Kyoto".to_string(),
			prefecture: Some("Kyoto".to_string()),
			region: Region::Kansai,
			coordinates: Some(Coordinates::new(35.0116, 135.7681)),
			rating: Some(rating),
			review_count: Some(100),
			operating_hours: None,
			price_level: Some(1),
			tags: vec![],
			recommended_visit_minutes: Some(90),
			place_id: None,
		}
	}

	fn rich_pool() -> Vec<Location> {
		vec![
			location("food-1", Category::Food, 4.8),
			location("food-2", Category::Food, 4.5),
			location("culture-1", Category::Culture, 4.6),
			location("culture-2", Category::Culture, 4.2),
			location("nature-1", Category::Nature, 4.0),
			location("shopping-1", Category::Shopping, 3.9),
			location("attraction-1", Category::Attraction, 4.7),
			location("hotel-1", Category::Hotel, 4.1),
		]
	}

	#[tokio::test]
	async fn fills_all_three_slots_even_with_thin_pool() {
		let store = InMemoryLocationStore::new(rich_pool());
		let interests = vec![Category::Food, Category::Culture];
		let saved_ids = HashSet::new();
		let ctx = PackContext {
			interests: &interests,
			pace: Pace::Balanced,
			budget: None,
			party: None,
			saved_ids: &saved_ids,
		};
		let mut already_placed = HashSet::new();

		let activities = pack_day(0, "Kyoto", &store, &ctx, &mut already_placed).await.unwrap();
		let slots: Vec<TimeOfDay> = activities.iter().map(|a| a.time_of_day()).collect();
		assert!(slots.contains(&TimeOfDay::Morning));
		assert!(slots.contains(&TimeOfDay::Afternoon));
		assert!(slots.contains(&TimeOfDay::Evening));
	}

	#[tokio::test]
	async fn never_places_hotel_category_in_a_slot() {
		let store = InMemoryLocationStore::new(rich_pool());
		let interests = vec![Category::Hotel];
		let saved_ids = HashSet::new();
		let ctx = PackContext { interests: &interests, pace: Pace::Fast, budget: None, party: None, saved_ids: &saved_ids };
		let mut already_placed = HashSet::new();

		let activities = pack_day(0, "Kyoto", &store, &ctx, &mut already_placed).await.unwrap();
		for activity in &activities {
			if let Activity::Place(p) = activity {
				assert_ne!(p.id, "hotel-1");
			}
		}
	}

	#[tokio::test]
	async fn never_duplicates_a_location_across_days() {
		let store = InMemoryLocationStore::new(rich_pool());
		let interests = vec![Category::Food, Category::Culture, Category::Nature];
		let saved_ids = HashSet::new();
		let ctx = PackContext { interests: &interests, pace: Pace::Relaxed, budget: None, party: None, saved_ids: &saved_ids };
		let mut already_placed = HashSet::new();

		let day1 = pack_day(0, "Kyoto", &store, &ctx, &mut already_placed).await.unwrap();
		let day2 = pack_day(1, "Kyoto", &store, &ctx, &mut already_placed).await.unwrap();

		let mut ids: Vec<&str> = day1.iter().chain(day2.iter()).filter_map(|a| a.place_id()).collect();
		let before = ids.len();
		ids.sort();
		ids.dedup();
		assert_eq!(ids.len(), before);
	}
}
