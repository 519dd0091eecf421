//! API endpoint handlers.

pub mod analyze;
pub mod detect;
pub mod health;
pub mod reports;
pub mod research_updates;
