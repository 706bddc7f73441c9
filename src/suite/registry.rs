//! Suite registry
//!
//! The registry is an ordinary value owned by the driver: created at
//! startup, filled while suites are declared, then read when they run.
//! Declaration and runs are single-threaded; `&mut self` on both
//! enforces that at compile time.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::warn;

use super::{ConsoleReporter, Reporter, Suite, SuiteReport};
use crate::common::config::Config;
use crate::common::Result;

/// Mapping from suite name to suite
#[derive(Debug, Default)]
pub struct Registry {
    suites: BTreeMap<String, Suite>,
    client: reqwest::Client,
    console: ConsoleReporter,
}

impl Registry {
    /// Create a registry whose suites use a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose suites share `client`
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            suites: BTreeMap::new(),
            client,
            console: ConsoleReporter::default(),
        }
    }

    /// Create a registry from runner configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut registry = Self::with_client(config.http_client()?);
        registry.console = ConsoleReporter::new(config.output.color);
        Ok(registry)
    }

    /// HTTP client handed to every suite this registry creates
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Create a suite sharing this registry's client without storing it
    ///
    /// Configure it, then hand it over with [`Registry::insert`]. A setup
    /// step that fails before the insert leaves the registry untouched.
    pub fn new_suite(&self, name: impl Into<String>) -> Suite {
        Suite::new(name, self.client.clone())
    }

    /// Create a suite and store it under `name`
    ///
    /// A suite already registered under the same name is replaced.
    pub fn register(&mut self, name: impl Into<String>) -> &mut Suite {
        let suite = self.new_suite(name);
        self.insert(suite)
    }

    /// Store an already configured suite under its own name
    ///
    /// A suite already registered under the same name is replaced.
    pub fn insert(&mut self, suite: Suite) -> &mut Suite {
        match self.suites.entry(suite.name().to_string()) {
            Entry::Occupied(mut entry) => {
                warn!(suite = %entry.key(), "Replacing previously registered suite");
                entry.insert(suite);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(suite),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Suite> {
        self.suites.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Suite> {
        self.suites.get_mut(name)
    }

    /// Registered suite names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.suites.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.suites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suites.is_empty()
    }

    /// Run one suite by name, printing progress to stdout
    pub async fn run(&mut self, name: &str) -> Option<SuiteReport> {
        let suite = self.suites.get_mut(name)?;
        Some(suite.run_with(&mut self.console).await)
    }

    /// Run every suite in name order, printing progress to stdout
    pub async fn run_all(&mut self) -> Vec<SuiteReport> {
        let mut console = self.console;
        self.run_all_with(&mut console).await
    }

    /// Run every suite in name order
    ///
    /// A failing suite does not stop the ones after it.
    pub async fn run_all_with(&mut self, reporter: &mut dyn Reporter) -> Vec<SuiteReport> {
        let mut reports = Vec::with_capacity(self.suites.len());
        for suite in self.suites.values_mut() {
            reports.push(suite.run_with(reporter).await);
        }
        reports
    }
}
