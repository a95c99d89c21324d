/*
 * src/middleware.rs
 *
 * Cookie-based session auth, consulted by the account routes (hard
 * requirement) and by the planning endpoint (auth-optional: a side-effect
 * hook the planner never depends on to produce a result).
 */

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};
use chrono::Utc;
use http::{HeaderValue, header};
use sqlx::PgPool;
use tower_cookies::cookie::{Cookie, CookieJar, Key};
use uuid::Uuid;

use crate::error::{AppError, PublicError};

/// Inserted into request extensions on authenticated requests.
#[derive(Clone, Copy, Debug)]
pub struct AuthUser {
	pub id: i32,
}

/// Parses the `auth-token` private cookie out of the raw `Cookie` header,
/// validating its `user-<id>.<exp>.sign` shape and expiration. Does not
/// check the account still exists; callers that need that guarantee
/// (`auth_middleware`) do it themselves with the pool.
fn decode_auth_cookie(req: &Request, key: &Key) -> Option<AuthUser> {
	let cookie_str = req.headers().get(header::COOKIE)?.to_str().ok()?;

	let mut jar = CookieJar::new();
	for pair in cookie_str.split(';') {
		let s = pair.trim();
		if s.is_empty() {
			continue;
		}
		if let Ok(parsed) = Cookie::parse(s.to_string()) {
			jar.add(parsed);
		}
	}

	let decrypted = jar.private(key).get("auth-token")?;
	let token = decrypted.value().to_string();

	let parts: Vec<&str> = token.split('.').collect();
	if parts.len() != 3 || parts[2] != "sign" || !parts[0].starts_with("user-") {
		return None;
	}

	let user_id: i32 = parts[0][5..].parse().ok()?;
	let exp: i64 = parts[1].parse().ok()?;
	if Utc::now().timestamp() > exp {
		return None;
	}

	Some(AuthUser { id: user_id })
}

/// Auth middleware for account routes.
/// - Decrypts `auth-token` private cookie using the `Key` in extensions.
/// - Validates embedded expiration and that the user still exists in the db.
/// - Inserts `AuthUser` into request extensions on success; otherwise 401.
pub async fn auth_middleware(mut req: Request, next: Next) -> Response {
	let Some(key) = req.extensions().get::<Key>().cloned() else {
		return AppError::from(PublicError::Unauthorized).into_response();
	};
	let Some(pool) = req.extensions().get::<PgPool>().cloned() else {
		return AppError::from(PublicError::Unauthorized).into_response();
	};

	let Some(user) = decode_auth_cookie(&req, &key) else {
		return AppError::from(PublicError::Unauthorized).into_response();
	};

	let exists_row = sqlx::query_as::<_, (bool,)>("SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)")
		.bind(user.id)
		.fetch_one(&pool)
		.await
		.unwrap_or((false,));

	if !exists_row.0 {
		return AppError::from(PublicError::Unauthorized).into_response();
	}

	req.extensions_mut().insert(user);
	next.run(req).await
}

/// Best-effort auth for the planning endpoint: attaches `AuthUser` when the
/// cookie is present and valid, otherwise lets the request through
/// unauthenticated. Deliberately skips the db existence check done by
/// `auth_middleware`: the planner only ever treats the user id as an
/// opaque side-effect hook, never a requirement.
pub async fn auth_optional(mut req: Request, next: Next) -> Response {
	if let Some(key) = req.extensions().get::<Key>().cloned() {
		if let Some(user) = decode_auth_cookie(&req, &key) {
			req.extensions_mut().insert(user);
		}
	}
	next.run(req).await
}

/// Stamps every response with `X-Request-Id` when a handler hasn't already
/// set one itself (the error path in `AppError::into_response` mints its own
/// so log lines and the client-visible id match); success responses have no
/// other place to acquire one.
pub async fn request_id(req: Request, next: Next) -> Response {
	let mut response = next.run(req).await;
	if !response.headers().contains_key("x-request-id") {
		if let Ok(value) = HeaderValue::from_str(&Uuid::new_v4().to_string()) {
			response.headers_mut().insert("x-request-id", value);
		}
	}
	response
}

/// Stamps every response with baseline security headers: HSTS, a
/// restrictive CSP, frame and content-type sniffing protections.
pub async fn security_headers(req: Request, next: Next) -> Response {
	let mut response = next.run(req).await;
	let headers = response.headers_mut();
	headers.insert(header::STRICT_TRANSPORT_SECURITY, "max-age=63072000; includeSubDomains".parse().unwrap());
	headers.insert(header::X_FRAME_OPTIONS, "SAMEORIGIN".parse().unwrap());
	headers.insert(header::X_CONTENT_TYPE_OPTIONS, "nosniff".parse().unwrap());
	headers.insert(
		header::CONTENT_SECURITY_POLICY,
		"default-src 'none'; frame-ancestors 'self'".parse().unwrap(),
	);
	response
}
