//! Declarative suites
//!
//! Reads YAML files describing a suite's base URL, credentials and
//! request/expectation steps, and registers them as ordinary suites.

mod config;
mod runner;

pub use config::*;
pub use runner::{declare, load_scenario, run_scenario_file};
