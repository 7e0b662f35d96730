//! Acquisition scouting for businesses listed for sale: listing intake, SBA financing
//! models, rule-based scoring, candidate storage, and reporting.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
