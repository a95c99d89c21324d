/*
 * src/models/itinerary.rs
 *
 * The generated plan. `Activity` is a tagged variant (place | note) per the
 * no-inheritance design: callers must match exhaustively rather than probe
 * optional fields.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::sql_models::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
	Driving,
	Walking,
	Transit,
	Cycling,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TravelLeg {
	pub mode: TravelMode,
	pub duration_minutes: u32,
	pub distance_meters: u32,
	pub departure_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PlaceActivity {
	pub id: String,
	pub time_of_day: TimeOfDay,
	pub start_time: Option<String>,
	pub end_time: Option<String>,
	#[serde(default)]
	pub tags: Vec<String>,
	pub travel_from_previous: Option<TravelLeg>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoteActivity {
	pub text: String,
	pub time_of_day: TimeOfDay,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Activity {
	Place(PlaceActivity),
	Note(NoteActivity),
}

impl Activity {
	pub fn time_of_day(&self) -> TimeOfDay {
		match self {
			Activity::Place(p) => p.time_of_day,
			Activity::Note(n) => n.time_of_day,
		}
	}

	pub fn place_id(&self) -> Option<&str> {
		match self {
			Activity::Place(p) => Some(&p.id),
			Activity::Note(_) => None,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherSummary {
	pub condition: String,
	pub precipitation_probability: f64,
	pub high_celsius: f64,
	pub low_celsius: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Day {
	pub city_id: String,
	pub date: Option<NaiveDate>,
	pub activities: Vec<Activity>,
	#[serde(default)]
	pub city_transition: bool,
	pub weather: Option<WeatherSummary>,
}

impl Day {
	pub fn place_count(&self) -> usize {
		self.activities.iter().filter(|a| matches!(a, Activity::Place(_))).count()
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Itinerary {
	pub days: Vec<Day>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayIntro {
	pub day_index: u32,
	pub headline: String,
	pub tip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Trip {
	pub id: String,
	pub itinerary: Itinerary,
	pub validation: crate::models::validation::Validation,
}
