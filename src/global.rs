use std::time::Duration;

pub const LOG_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/logs");
pub const CRASH_LOG: &str = "crash.log";
pub const LATEST_LOG: &str = "latest.log";
pub const TEST_COOKIE_EXP_SECONDS: i64 = 60;

/// Maximum accepted request body size for `POST /itinerary/plan` (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Hard wall-clock deadline for a single generation request.
pub const DEFAULT_GENERATION_DEADLINE_SECS: u64 = 25;

/// Per-call timeout applied to routing/weather oracle requests.
pub const DEFAULT_ORACLE_TIMEOUT_SECS: u64 = 30;

/// Target entry count for the plan result cache.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// TTL applied to plan cache entries, refreshed on read.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60 * 60 * 24;

/// Default requests-per-minute allowed per client IP.
pub const DEFAULT_RATE_LIMIT_PER_MINUTE: u32 = 100;

pub fn generation_deadline() -> Duration {
	Duration::from_secs(env_u64("GENERATION_DEADLINE_SECS", DEFAULT_GENERATION_DEADLINE_SECS))
}

pub fn oracle_timeout() -> Duration {
	Duration::from_secs(env_u64("ORACLE_TIMEOUT_SECS", DEFAULT_ORACLE_TIMEOUT_SECS))
}

pub fn cache_capacity() -> u64 {
	env_u64("CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY)
}

pub fn cache_ttl() -> Duration {
	Duration::from_secs(env_u64("CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS))
}

pub fn rate_limit_per_minute() -> u32 {
	env_u64("RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE as u64) as u32
}

fn env_u64(name: &str, default: u64) -> u64 {
	std::env::var(name)
		.ok()
		.and_then(|v| v.parse().ok())
		.unwrap_or(default)
}
