/*
 * src/planner/enrichment.rs
 *
 * Enrichment (T). Attaches a per-day weather forecast (best-effort; a
 * failing oracle just means no weather on that day, never a failed
 * request) and produces the day-intro copy shown alongside the itinerary.
 */

use chrono::{Duration as ChronoDuration, NaiveDate};
use futures::future::join_all;

use crate::models::itinerary::{Day, DayIntro};
use crate::oracles::WeatherOracle;

pub async fn enrich_days(days: &mut [Day], start_date: Option<NaiveDate>, weather: &dyn WeatherOracle) -> Vec<DayIntro> {
	for (index, day) in days.iter_mut().enumerate() {
		day.date = start_date.map(|d| d + ChronoDuration::days(index as i64));
	}

	let forecasts = join_all(days.iter().map(|day| weather.forecast(&day.city_id, day.date))).await;

	for (day, forecast) in days.iter_mut().zip(forecasts) {
		day.weather = forecast.ok();
	}

	days.iter()
		.enumerate()
		.map(|(index, day)| DayIntro {
			day_index: index as u32,
			headline: headline_for(day),
			tip: tip_for(day),
		})
		.collect()
}

fn headline_for(day: &Day) -> String {
	if day.city_transition {
		format!("Arriving in {} today", day.city_id)
	} else {
		format!("A day exploring {}", day.city_id)
	}
}

fn tip_for(day: &Day) -> Option<String> {
	let weather = day.weather.as_ref()?;
	if weather.precipitation_probability >= 0.4 {
		Some("Pack an umbrella, rain is likely.".to_string())
	} else if weather.high_celsius >= 30.0 {
		Some("It'll be hot, stay hydrated.".to_string())
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::itinerary::Day;
	use crate::oracles::fakes::{FailingWeatherOracle, FixedWeatherOracle};

	fn sample_day(city: &str, transition: bool) -> Day {
		Day { city_id: city.to_string(), date: None, activities: vec![], city_transition: transition, weather: None }
	}

	#[tokio::test]
	async fn failing_weather_oracle_omits_weather_without_error() {
		let mut days = vec![sample_day("Kyoto", false)];
		let intros = enrich_days(&mut days, None, &FailingWeatherOracle).await;
		assert!(days[0].weather.is_none());
		assert_eq!(intros.len(), 1);
	}

	#[tokio::test]
	async fn succeeding_oracle_populates_weather() {
		let mut days = vec![sample_day("Kyoto", false)];
		enrich_days(&mut days, None, &FixedWeatherOracle).await;
		assert!(days[0].weather.is_some());
	}

	#[tokio::test]
	async fn transition_day_gets_an_arrival_headline() {
		let mut days = vec![sample_day("Kyoto", false), sample_day("Tokyo", true)];
		let intros = enrich_days(&mut days, None, &FixedWeatherOracle).await;
		assert!(intros[1].headline.contains("Arriving"));
	}

	#[tokio::test]
	async fn dates_advance_from_start_date() {
		let mut days = vec![sample_day("Kyoto", false), sample_day("Kyoto", false)];
		let start = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
		enrich_days(&mut days, Some(start), &FixedWeatherOracle).await;
		assert_eq!(days[0].date, Some(start));
		assert_eq!(days[1].date, Some(start + ChronoDuration::days(1)));
	}
}
