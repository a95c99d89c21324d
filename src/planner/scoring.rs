/*
 * src/planner/scoring.rs
 *
 * Scoring Engine (S). A pure function of (location, context): nine
 * additive factors, each clamped to its own range, summed without
 * normalization. The reasons list is not a human nicety: it is the
 * thing the test suite asserts on to keep scoring auditable.
 */

use std::collections::HashSet;

use crate::geo::Coordinates;
use crate::geo::distance::haversine_km;
use crate::models::location::Location;
use crate::models::trip::{Pace, PartyKind, PartyProfile};
use crate::sql_models::{BudgetBucket, Category};

pub struct ScoringContext<'a> {
	pub interests: &'a [Category],
	pub pace: Pace,
	pub budget: Option<BudgetBucket>,
	pub party: Option<&'a PartyProfile>,
	pub saved_ids: &'a HashSet<String>,
	pub anchor: Option<Coordinates>,
	pub already_placed: &'a HashSet<String>,
}

#[derive(Debug, Clone)]
pub struct Score {
	pub value: f64,
	pub reasons: Vec<String>,
}

/// `None` signals outright disqualification (the location is already
/// placed elsewhere in the trip); every other case returns a finite score.
pub fn score(location: &Location, ctx: &ScoringContext) -> Option<Score> {
	if ctx.already_placed.contains(&location.id) {
		return None;
	}

	let mut total = 0.0;
	let mut reasons = Vec::new();

	if ctx.interests.contains(&location.category) {
		total += 3.0;
		reasons.push("matches a selected interest".to_string());
	}

	if let Some(rating) = location.rating {
		let factor = ((rating - 3.0) * 1.0).clamp(0.0, 2.0);
		if factor > 0.0 {
			total += factor;
			reasons.push(format!("rating {rating:.1}"));
		}
	}

	if let Some(count) = location.review_count {
		let factor = (((1 + count) as f64).log10() / 4.0).clamp(0.0, 1.0);
		if factor > 0.0 {
			total += factor;
			reasons.push("well-reviewed".to_string());
		}
	}

	if let Some(minutes) = location.recommended_visit_minutes {
		let pace_factor = pace_fit(ctx.pace, minutes);
		if pace_factor != 0.0 {
			total += pace_factor;
			reasons.push(if pace_factor > 0.0 { "fits the pace" } else { "runs long for the pace" }.to_string());
		}
	}

	if let Some(budget) = ctx.budget {
		let budget_factor = budget_fit(budget, location.price_level);
		if budget_factor != 0.0 {
			total += budget_factor;
			reasons.push(if budget_factor > 0.0 { "within budget" } else { "over budget" }.to_string());
		}
	}

	if let Some(party) = ctx.party {
		let party_factor = party_fit(party, location);
		if party_factor != 0.0 {
			total += party_factor;
			reasons.push(if party_factor > 0.0 { "good fit for the party" } else { "poor fit for the party" }.to_string());
		}
	}

	match (ctx.anchor, location.coordinates) {
		(Some(anchor), Some(coords)) => {
			let distance_km = haversine_km(anchor, coords);
			let penalty = (distance_km / 10.0).min(2.0);
			if penalty > 0.0 {
				total -= penalty;
				reasons.push("distance from anchor".to_string());
			}
		}
		_ => {}
	}

	if ctx.saved_ids.contains(&location.id) {
		total += 5.0;
		reasons.push("saved by the traveler".to_string());
	}

	Some(Score { value: total, reasons })
}

fn pace_fit(pace: Pace, recommended_visit_minutes: u32) -> f64 {
	let minutes = recommended_visit_minutes as f64;
	match pace {
		Pace::Fast => {
			if minutes <= 60.0 {
				1.0
			} else if minutes >= 150.0 {
				-1.0
			} else {
				0.0
			}
		}
		Pace::Relaxed => {
			if minutes >= 120.0 {
				1.0
			} else if minutes <= 45.0 {
				-1.0
			} else {
				0.0
			}
		}
		Pace::Balanced => 0.0,
	}
}

fn budget_fit(budget: BudgetBucket, price_level: Option<u8>) -> f64 {
	let Some(price_level) = price_level else { return 0.0 };
	let budget_level = match budget {
		BudgetBucket::VeryLow => 0,
		BudgetBucket::Low => 1,
		BudgetBucket::Medium => 2,
		BudgetBucket::High => 3,
		BudgetBucket::Luxury => 4,
	};
	let over = price_level as i32 - budget_level;
	match over {
		i32::MIN..=0 => 1.0,
		1 => -1.0,
		_ => -2.0,
	}
}

fn party_fit(party: &PartyProfile, location: &Location) -> f64 {
	let is_nightlife = location.tags.iter().any(|t| t == "bar" || t == "nightlife");
	let is_cafe = location.tags.iter().any(|t| t == "cafe");

	match party.kind {
		PartyKind::Family if is_nightlife => -1.0,
		PartyKind::Solo if is_cafe => 1.0,
		_ => 0.0,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sql_models::Region;

	fn base_location() -> Location {
		Location {
			id: "loc-1".to_string(),
			name: "Fushimi Inari".to_string(),
			category: Category::Culture,
			city: "Kyoto".to_string(),
			prefecture: Some("Kyoto".to_string()),
			region: Region::Kansai,
			coordinates: Some(Coordinates::new(34.9671, 135.7727)),
			rating: Some(4.7),
			review_count: Some(50_000),
			operating_hours: None,
			price_level: Some(0),
			tags: vec![],
			recommended_visit_minutes: Some(90),
			place_id: None,
		}
	}

	fn empty_context() -> ScoringContext<'static> {
		ScoringContext {
			interests: &[],
			pace: Pace::Balanced,
			budget: None,
			party: None,
			saved_ids: Box::leak(Box::new(HashSet::new())),
			anchor: None,
			already_placed: Box::leak(Box::new(HashSet::new())),
		}
	}

	#[test]
	fn duplicate_location_is_disqualified() {
		let location = base_location();
		let mut placed = HashSet::new();
		placed.insert(location.id.clone());
		let ctx = ScoringContext { already_placed: Box::leak(Box::new(placed)), ..empty_context() };
		assert!(score(&location, &ctx).is_none());
	}

	#[test]
	fn scoring_is_pure_and_deterministic() {
		let location = base_location();
		let ctx = empty_context();
		let first = score(&location, &ctx).unwrap();
		let second = score(&location, &ctx).unwrap();
		assert_eq!(first.value, second.value);
		assert_eq!(first.reasons, second.reasons);
	}

	#[test]
	fn category_match_contributes_three() {
		let location = base_location();
		let ctx = ScoringContext { interests: &[Category::Culture], ..empty_context() };
		let result = score(&location, &ctx).unwrap();
		assert!(result.reasons.iter().any(|r| r.contains("selected interest")));
	}

	#[test]
	fn saved_id_boosts_score_by_five() {
		let location = base_location();
		let mut saved = HashSet::new();
		saved.insert(location.id.clone());
		let ctx = ScoringContext { saved_ids: Box::leak(Box::new(saved)), ..empty_context() };
		let with_saved = score(&location, &ctx).unwrap();

		let ctx_without = empty_context();
		let without_saved = score(&location, &ctx_without).unwrap();

		assert!((with_saved.value - without_saved.value - 5.0).abs() < 1e-9);
	}
}
