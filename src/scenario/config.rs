//! Scenario file types
//!
//! Defines the data structures for deserializing YAML suite declarations.

use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::common::config::PasswordGrant;

/// A complete suite declared in a YAML file
#[derive(Deserialize, Debug)]
pub struct Scenario {
    /// Name the suite is registered under
    pub name: String,
    /// Optional description printed before the run
    pub description: Option<String>,
    /// Absolute base URL of the API under test
    pub base_url: Option<String>,
    /// Named target from the runner config (alternative to `base_url`)
    pub target: Option<String>,
    /// Password grant bootstrapped after the base URL is set
    pub oauth: Option<PasswordGrant>,
    /// Steps in execution order
    pub steps: Vec<ScenarioStep>,
}

/// A single request/expectation pair
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioStep {
    /// Step name shown in progress output
    pub name: String,
    /// Request to issue
    pub request: RequestSpec,
    /// Checks applied to the response
    #[serde(default)]
    pub expect: Expectation,
}

/// Request issued by a step
#[derive(Deserialize, Debug, Clone)]
pub struct RequestSpec {
    /// HTTP method (default: GET)
    #[serde(default = "default_method")]
    pub method: String,
    /// Path relative to the suite base URL
    pub path: String,
    /// Extra request headers
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// JSON request body
    pub json: Option<Value>,
    /// Raw request body, used when `json` is absent
    pub body: Option<String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Expectations for a response
#[derive(Deserialize, Debug, Clone)]
pub struct Expectation {
    /// Expected status code (default: 200)
    #[serde(default = "default_status")]
    pub status: u16,
    /// Substring that must appear in the body
    pub body_contains: Option<String>,
    /// JSON pointer (e.g. `/items/0/id`) to expected value
    #[serde(default)]
    pub json: BTreeMap<String, Value>,
}

impl Default for Expectation {
    fn default() -> Self {
        Self {
            status: default_status(),
            body_contains: None,
            json: BTreeMap::new(),
        }
    }
}

fn default_status() -> u16 {
    200
}
