/*
 * src/ratelimit.rs
 *
 * Token-bucket rate limiting at the HTTP entrypoint, keyed by client IP.
 * Two backends share one trait: an in-memory `governor` bucket per IP
 * (development fallback) and a shared-counter-service client (production,
 * when `RATE_LIMIT_BACKEND_URL` is configured) that is authoritative
 * across replicas.
 */

use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use governor::{Quota, RateLimiter as GovernorLimiter};
use governor::clock::{Clock, DefaultClock};
use governor::state::{InMemoryState, NotKeyed};

pub struct Decision {
	pub allowed: bool,
	pub limit: u32,
	pub remaining: u32,
	pub retry_after_secs: u64,
	/// Seconds until the window resets, for the `X-RateLimit-Reset` header.
	pub reset_secs: u64,
}

#[async_trait]
pub trait RateLimiter: Send + Sync {
	async fn check(&self, key: IpAddr) -> Decision;
}

type Bucket = GovernorLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Process-local token bucket per IP. Buckets are created lazily and kept
/// for the process lifetime; acceptable for the single-instance default.
pub struct InMemoryRateLimiter {
	per_minute: u32,
	buckets: DashMap<IpAddr, Arc<Bucket>>,
}

impl InMemoryRateLimiter {
	pub fn new(per_minute: u32) -> Self {
		Self { per_minute, buckets: DashMap::new() }
	}

	fn bucket_for(&self, key: IpAddr) -> Arc<Bucket> {
		self.buckets
			.entry(key)
			.or_insert_with(|| {
				let quota = Quota::per_minute(NonZeroU32::new(self.per_minute.max(1)).unwrap());
				Arc::new(GovernorLimiter::direct(quota))
			})
			.clone()
	}
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
	async fn check(&self, key: IpAddr) -> Decision {
		let bucket = self.bucket_for(key);
		match bucket.check() {
			Ok(_) => {
				Decision { allowed: true, limit: self.per_minute, remaining: self.per_minute, retry_after_secs: 0, reset_secs: 60 }
			}
			Err(not_until) => {
				let wait = not_until.wait_time_from(DefaultClock::default().now()).as_secs().max(1);
				Decision { allowed: false, limit: self.per_minute, remaining: 0, retry_after_secs: wait, reset_secs: wait }
			}
		}
	}
}

/// Shared-counter-service backend: an HTTP service exposing atomic
/// increment-with-TTL, authoritative across replicas when configured.
pub struct RemoteRateLimiter {
	client: reqwest::Client,
	base_url: String,
	token: String,
	per_minute: u32,
}

impl RemoteRateLimiter {
	pub fn new(base_url: String, token: String, per_minute: u32, timeout: Duration) -> Self {
		let client = reqwest::Client::builder()
			.timeout(timeout)
			.build()
			.expect("failed to build rate-limit backend HTTP client");
		Self { client, base_url, token, per_minute }
	}
}

#[derive(serde::Deserialize)]
struct RemoteDecision {
	allowed: bool,
	remaining: u32,
	retry_after_secs: u64,
	#[serde(default)]
	reset_secs: u64,
}

#[async_trait]
impl RateLimiter for RemoteRateLimiter {
	async fn check(&self, key: IpAddr) -> Decision {
		let result = self
			.client
			.post(format!("{}/increment", self.base_url))
			.bearer_auth(&self.token)
			.query(&[("key", key.to_string()), ("limit", self.per_minute.to_string())])
			.send()
			.await;

		match result {
			Ok(resp) => match resp.json::<RemoteDecision>().await {
				Ok(decision) => Decision {
					allowed: decision.allowed,
					limit: self.per_minute,
					remaining: decision.remaining,
					retry_after_secs: decision.retry_after_secs,
					reset_secs: decision.reset_secs.max(decision.retry_after_secs),
				},
				// A malformed backend response fails open; the in-memory
				// fallback is not consulted here, matching the "service is
				// authoritative when configured" contract.
				Err(_) => {
					Decision { allowed: true, limit: self.per_minute, remaining: self.per_minute, retry_after_secs: 0, reset_secs: 60 }
				}
			},
			Err(_) => Decision { allowed: true, limit: self.per_minute, remaining: self.per_minute, retry_after_secs: 0, reset_secs: 60 },
		}
	}
}

/// Axum middleware wiring `RateLimiter` into the HTTP entrypoint: denies with
/// `429` and the standard `X-RateLimit-*`/`Retry-After` headers, otherwise
/// stamps the allowed response with the same headers and lets it through.
pub async fn rate_limit_middleware(
	axum::extract::Extension(limiter): axum::extract::Extension<std::sync::Arc<dyn RateLimiter>>,
	axum::extract::ConnectInfo(addr): axum::extract::ConnectInfo<std::net::SocketAddr>,
	req: axum::extract::Request,
	next: axum::middleware::Next,
) -> axum::response::Response {
	use axum::response::IntoResponse;

	let decision = limiter.check(addr.ip()).await;
	if !decision.allowed {
		return crate::error::AppError::from(crate::error::PublicError::RateLimited { retry_after_secs: decision.retry_after_secs })
			.into_response();
	}

	let mut response = next.run(req).await;
	let headers = response.headers_mut();
	if let Ok(v) = decision.limit.to_string().parse() {
		headers.insert("x-ratelimit-limit", v);
	}
	if let Ok(v) = decision.remaining.to_string().parse() {
		headers.insert("x-ratelimit-remaining", v);
	}
	if let Ok(v) = decision.reset_secs.to_string().parse() {
		headers.insert("x-ratelimit-reset", v);
	}
	response
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::net::{IpAddr, Ipv4Addr};

	#[tokio::test]
	async fn denies_after_quota_exhausted() {
		let limiter = InMemoryRateLimiter::new(2);
		let ip = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

		assert!(limiter.check(ip).await.allowed);
		assert!(limiter.check(ip).await.allowed);
		let third = limiter.check(ip).await;
		assert!(!third.allowed);
		assert!(third.retry_after_secs > 0);
	}

	#[tokio::test]
	async fn distinct_ips_have_independent_buckets() {
		let limiter = InMemoryRateLimiter::new(1);
		let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
		let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

		assert!(limiter.check(a).await.allowed);
		assert!(limiter.check(b).await.allowed);
	}
}
