pub mod ai;
pub mod companion;
pub mod config;
pub mod triage;
pub mod types;
