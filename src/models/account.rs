/*
 * src/models/account.rs
 *
 * Domain account model. Auth is a side-effect hook the planning endpoint
 * consults but never requires (see `middleware::auth_optional`); account
 * preferences stay deliberately thin. The per-trip `TripRequest.budget` is
 * what the planner actually reads, not anything stored on the account.
 */

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize)]
pub struct Account {
	pub id: i32,
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginPayload {
	pub email: String,
	pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupPayload {
	pub email: String,
	pub password: String,
}

impl SignupPayload {
	/// Validate email format using regex
	pub fn validate_email(email: &str) -> bool {
		let email_regex = Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
		email_regex.is_match(email)
	}

	/// Validate password strength
	/// - Minimum 8 characters
	/// - Maximum 128 characters
	/// - At least one uppercase letter
	/// - At least one lowercase letter
	/// - At least one number
	/// - Only ASCII characters allowed (for security and compatibility)
	pub fn validate_password(password: &str) -> Result<(), String> {
		if password.len() < 8 {
			return Err("Password must be at least 8 characters long".to_string());
		}

		if password.len() > 128 {
			return Err("Password must be 128 characters or less".to_string());
		}

		if !password.is_ascii() {
			return Err("Password must contain only ASCII characters".to_string());
		}

		if !password.chars().any(|c| c.is_uppercase()) {
			return Err("Password must contain at least one uppercase letter".to_string());
		}

		if !password.chars().any(|c| c.is_lowercase()) {
			return Err("Password must contain at least one lowercase letter".to_string());
		}

		if !password.chars().any(|c| c.is_numeric()) {
			return Err("Password must contain at least one number".to_string());
		}

		Ok(())
	}

	/// Validate the entire signup payload
	pub fn validate(&self) -> Result<(), String> {
		let email_trimmed = self.email.trim();
		if email_trimmed.is_empty() {
			return Err("Email is required".to_string());
		}

		if !Self::validate_email(email_trimmed) {
			return Err("Invalid email format".to_string());
		}

		Self::validate_password(&self.password)?;

		Ok(())
	}
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
	pub id: i32,
	pub token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
	pub id: i32,
	pub email: String,
}

/// Response for `POST /api/account/validate`: the authenticated user's id.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
	pub id: i32,
}
