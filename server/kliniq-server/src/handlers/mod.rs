pub mod assistant;
pub mod health;
pub mod metrics;
pub mod transcripts;
pub mod translation;
pub mod triage;
