/*
 * src/store/postgres.rs
 *
 * Production `LocationStore`, backed by the shared `sqlx::PgPool` created
 * once in `db::create_pool` and threaded through as an `axum::Extension`.
 */

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::QueryBuilder;

use crate::error::{AppError, PrivateError};
use crate::geo::Coordinates;
use crate::geo::distance::haversine_km;
use crate::models::location::{Location, OperatingHours, OperatingPeriod};
use crate::sql_models::location::LocationRow;
use crate::store::{LocationFilter, LocationStore, sort_page};

pub struct PostgresLocationStore {
	pool: PgPool,
}

impl PostgresLocationStore {
	pub fn new(pool: PgPool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl LocationStore for PostgresLocationStore {
	async fn list_by_filter(&self, filter: &LocationFilter) -> Result<Vec<Location>, AppError> {
		let mut qb: QueryBuilder<sqlx::Postgres> = QueryBuilder::new(
			"SELECT id, name, category, city, prefecture, region, lat, lng, rating, review_count, \
			 price_level, operating_hours, tags, recommended_visit_minutes, place_id FROM locations WHERE 1=1",
		);

		if let Some(region) = filter.region {
			qb.push(" AND region = ").push_bind(region);
		}
		if let Some(city) = &filter.city {
			qb.push(" AND city = ").push_bind(city.clone());
		}
		if let Some(category) = filter.category {
			qb.push(" AND category = ").push_bind(category);
		}
		if filter.radius_km_from.is_some() {
			qb.push(" AND lat IS NOT NULL AND lng IS NOT NULL");
		}

		qb.push(" ORDER BY rating DESC NULLS LAST, review_count DESC NULLS LAST, id ASC");
		qb.push(" LIMIT ").push_bind(filter.limit as i64);
		qb.push(" OFFSET ").push_bind(filter.offset as i64);

		let rows: Vec<LocationRow> = qb
			.build_query_as()
			.fetch_all(&self.pool)
			.await
			.map_err(|e| AppError::from(PrivateError::Db(e)))?;

		let mut locations: Vec<Location> = rows.into_iter().map(row_to_location).collect();

		if filter.radius_km_from.is_some() {
			locations.retain(|loc| loc.coordinates.is_some());
		}

		if let Some((weekday, hour, minute)) = filter.open_now {
			locations.retain(|loc| loc.is_open_at(weekday, hour, minute));
		}

		sort_page(&mut locations);
		Ok(locations)
	}

	async fn bulk_by_ids(&self, ids: &[String]) -> Result<Vec<Location>, AppError> {
		if ids.is_empty() {
			return Ok(Vec::new());
		}

		let rows: Vec<LocationRow> = sqlx::query_as(
			"SELECT id, name, category, city, prefecture, region, lat, lng, rating, review_count, \
			 price_level, operating_hours, tags, recommended_visit_minutes, place_id \
			 FROM locations WHERE id = ANY($1)",
		)
		.bind(ids)
		.fetch_all(&self.pool)
		.await
		.map_err(|e| AppError::from(PrivateError::Db(e)))?;

		Ok(rows.into_iter().map(row_to_location).collect())
	}

	async fn nearby(
		&self,
		lat: f64,
		lng: f64,
		radius_km: f64,
		filter: &LocationFilter,
	) -> Result<Vec<Location>, AppError> {
		let mut scoped = filter.clone();
		scoped.radius_km_from = Some((lat, lng));

		let candidates = self.list_by_filter(&scoped).await?;
		let origin = Coordinates::new(lat, lng);

		Ok(candidates
			.into_iter()
			.filter(|loc| loc.coordinates.is_some_and(|c| haversine_km(origin, c) <= radius_km))
			.collect())
	}
}

fn row_to_location(row: LocationRow) -> Location {
	Location {
		id: row.id,
		name: row.name,
		category: row.category,
		city: row.city,
		prefecture: row.prefecture,
		region: row.region,
		coordinates: match (row.lat, row.lng) {
			(Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
			_ => None,
		},
		rating: row.rating,
		review_count: row.review_count.map(|c| c.max(0) as u32),
		operating_hours: row.operating_hours.map(|json| OperatingHours {
			timezone: json.0.timezone,
			periods: json
				.0
				.periods
				.into_iter()
				.map(|p| OperatingPeriod {
					weekday: p.weekday.max(0) as u8,
					open_hour: p.open_hour.max(0) as u8,
					open_minute: p.open_minute.max(0) as u8,
					close_hour: p.close_hour.max(0) as u8,
					close_minute: p.close_minute.max(0) as u8,
					overnight: p.overnight,
				})
				.collect(),
		}),
		price_level: row.price_level.map(|p| p.max(0) as u8),
		tags: row.tags,
		recommended_visit_minutes: row.recommended_visit_minutes.map(|m| m.max(0) as u32),
		place_id: row.place_id,
	}
}
