//! University directory: catalog CRUD over SQLite plus an LLM-backed admissions advisor.

pub mod ai;
pub mod catalog;
pub mod config;
pub mod error;
mod extract;
pub mod seed;
pub mod telemetry;
