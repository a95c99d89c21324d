/*
 * src/error.rs
 *
 * Error taxonomy for the service.
 *
 * Purpose:
 *   Split errors into what is safe to hand back to a client (`PublicError`)
 *   and what is only ever logged (`PrivateError`), unified behind `AppError`
 *   so every handler can return a single `ApiResult<T>`.
 */

use axum::{
	Json,
	http::{HeaderValue, StatusCode, header},
	response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

pub type ApiResult<T> = std::result::Result<T, AppError>;

/// Messages safe to show verbatim to a client.
#[derive(Debug, Error)]
pub enum PublicError {
	#[error("{0}")]
	BadRequest(String),
	#[error("unauthorized")]
	Unauthorized,
	#[error("rate limit exceeded")]
	RateLimited { retry_after_secs: u64 },
	#[error("generation deadline exceeded")]
	Timeout,
	#[error("{0}")]
	Validation(String),
	#[error("not found")]
	NotFound,
	#[error("request body too large")]
	PayloadTooLarge,
	#[error("{0}")]
	Conflict(String),
}

/// Diagnostic detail. Logged with the request id, never echoed to the client.
#[derive(Debug, Error)]
pub enum PrivateError {
	#[error("database error: {0}")]
	Db(#[from] sqlx::Error),
	#[error("location store unavailable: {0}")]
	Store(String),
	#[error("password hashing error: {0}")]
	PasswordHash(argon2::password_hash::Error),
	#[error("internal error: {0}")]
	Internal(String),
}

#[derive(Debug, Error)]
pub enum AppError {
	#[error(transparent)]
	Public(#[from] PublicError),
	#[error(transparent)]
	Private(#[from] PrivateError),
}

impl From<sqlx::Error> for AppError {
	fn from(e: sqlx::Error) -> Self {
		AppError::Private(PrivateError::Db(e))
	}
}

#[derive(Serialize)]
struct ErrorBody {
	error: String,
	code: &'static str,
	#[serde(rename = "requestId")]
	request_id: String,
	#[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
	retry_after: Option<u64>,
}

fn code_for(public: &PublicError) -> (StatusCode, &'static str) {
	match public {
		PublicError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
		PublicError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
		PublicError::RateLimited { .. } => (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED"),
		PublicError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "GATEWAY_TIMEOUT"),
		PublicError::Validation(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
		PublicError::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
		PublicError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
		PublicError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
	}
}

impl IntoResponse for AppError {
	fn into_response(self) -> Response {
		let request_id = Uuid::new_v4().to_string();

		let (status, code, message, retry_after) = match &self {
			AppError::Public(public) => {
				let (status, code) = code_for(public);
				let retry_after = match public {
					PublicError::RateLimited { retry_after_secs } => Some(*retry_after_secs),
					_ => None,
				};
				(status, code, public.to_string(), retry_after)
			}
			AppError::Private(private) => {
				// Diagnostic detail is logged, never surfaced.
				error!(request_id = %request_id, error = %private, "internal error");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					"INTERNAL_ERROR",
					"internal server error".to_string(),
					None,
				)
			}
		};

		let body = ErrorBody {
			error: message,
			code,
			request_id: request_id.clone(),
			retry_after,
		};

		let mut response = (status, Json(json!(body))).into_response();
		if let Ok(value) = HeaderValue::from_str(&request_id) {
			response.headers_mut().insert("x-request-id", value);
		}
		if let Some(secs) = retry_after {
			if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
				response.headers_mut().insert(header::RETRY_AFTER, value);
			}
		}
		response
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn public_errors_map_to_their_documented_status_codes() {
		let cases = [
			(PublicError::BadRequest("bad".into()), StatusCode::BAD_REQUEST),
			(PublicError::Unauthorized, StatusCode::UNAUTHORIZED),
			(PublicError::RateLimited { retry_after_secs: 30 }, StatusCode::TOO_MANY_REQUESTS),
			(PublicError::Timeout, StatusCode::GATEWAY_TIMEOUT),
			(PublicError::NotFound, StatusCode::NOT_FOUND),
			(PublicError::PayloadTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
			(PublicError::Conflict("dup".into()), StatusCode::CONFLICT),
		];
		for (public, expected) in cases {
			let response = AppError::from(public).into_response();
			assert_eq!(response.status(), expected);
			assert!(response.headers().contains_key("x-request-id"));
		}
	}

	#[test]
	fn rate_limited_response_carries_retry_after_header() {
		let response = AppError::from(PublicError::RateLimited { retry_after_secs: 42 }).into_response();
		let retry_after = response.headers().get(header::RETRY_AFTER).unwrap().to_str().unwrap();
		assert_eq!(retry_after, "42");
	}

	#[test]
	fn non_rate_limited_responses_have_no_retry_after_header() {
		let response = AppError::from(PublicError::Timeout).into_response();
		assert!(response.headers().get(header::RETRY_AFTER).is_none());
	}

	#[test]
	fn private_errors_never_leak_diagnostic_detail() {
		let response = AppError::from(PrivateError::Internal("pool connection string leaked".into())).into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert!(response.headers().contains_key("x-request-id"));
	}
}
