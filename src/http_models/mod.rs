/*
 * src/http_models/mod.rs
 *
 * Wire-level DTOs: the camelCase JSON shapes clients actually send and
 * receive. Kept separate from `models`, which is the validated domain the
 * planner operates on (account auth has no wire/domain split since its
 * payloads are already the minimal shape the db expects; see
 * `models::account`).
 */

pub mod itinerary;
pub mod location;
