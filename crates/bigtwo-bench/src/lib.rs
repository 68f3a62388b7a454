//! Seeded all-bot simulation harness for the Big Two engine.

pub mod analytics;
pub mod config;
pub mod logging;
pub mod runner;
