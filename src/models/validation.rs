/*
 * src/models/validation.rs
 *
 * Post-generation invariant report produced by the validator (V).
 */

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
	Error,
	Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum IssueCategory {
	DuplicateLocation,
	MinimumDensity,
	CategoryDiversity,
	NeighborhoodClustering,
	RegionConsistency,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Issue {
	pub severity: Severity,
	pub category: IssueCategory,
	pub message: String,
	/// Day index the issue pertains to, if any (0-based).
	pub day_index: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Summary {
	pub errors: u32,
	pub warnings: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Validation {
	pub valid: bool,
	pub issues: Vec<Issue>,
	pub summary: Summary,
}

impl Validation {
	pub fn from_issues(issues: Vec<Issue>) -> Self {
		let mut summary = Summary::default();
		for issue in &issues {
			match issue.severity {
				Severity::Error => summary.errors += 1,
				Severity::Warning => summary.warnings += 1,
			}
		}
		Validation { valid: summary.errors == 0, issues, summary }
	}
}
