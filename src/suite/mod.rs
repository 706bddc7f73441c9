//! Test suites
//!
//! A [`Suite`] is an ordered list of named steps bound to a base URL and an
//! optional bearer token. Suites are declared through a [`Registry`] with
//! chained configuration calls and executed with [`Suite::run`]:
//!
//! ```no_run
//! # async fn demo() -> ricochet::Result<()> {
//! use ricochet::suite::{expect_status, Registry};
//!
//! let mut registry = Registry::new();
//! registry
//!     .register("users")
//!     .set_base_url("http://localhost:8080/api")?
//!     .add_test("list users", |ctx| async move {
//!         let response = ctx.get("/users")?.send().await?;
//!         expect_status(response, reqwest::StatusCode::OK).await?;
//!         Ok::<(), ricochet::Error>(())
//!     });
//!
//! let reports = registry.run_all().await;
//! assert!(reports.iter().all(|r| r.passed));
//! # Ok(())
//! # }
//! ```

mod context;
mod oauth;
mod registry;
mod reporter;
mod runner;

use std::future::Future;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use reqwest::Url;
use tracing::debug;

use crate::common::config::TargetConfig;
use crate::common::{Error, Result};

pub use context::{expect_json, expect_status, RequestContext};
pub use registry::Registry;
pub use reporter::{ConsoleReporter, Reporter};
pub use runner::{RunState, SuiteReport};

/// Future returned by a step body
pub type StepFuture = BoxFuture<'static, Result<()>>;

type StepFn = Box<dyn Fn(RequestContext) -> StepFuture + Send + Sync>;

/// A single named unit of test logic
pub struct Step {
    name: String,
    body: StepFn,
}

impl Step {
    /// Name the step was registered under
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Step").field("name", &self.name).finish()
    }
}

/// A named, ordered collection of steps plus shared configuration
#[derive(Debug)]
pub struct Suite {
    name: String,
    steps: Vec<Step>,
    base_url: Option<Url>,
    token: String,
    failed: bool,
    failure: Option<String>,
    state: RunState,
    client: reqwest::Client,
}

impl Suite {
    /// Create an empty suite that issues requests through `client`
    ///
    /// Suites are normally created with [`Registry::register`].
    pub fn new(name: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            steps: Vec::new(),
            base_url: None,
            token: String::new(),
            failed: false,
            failure: None,
            state: RunState::NotRun,
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Steps in execution order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Bearer token; empty when the suite is unauthenticated
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Whether any run of this suite has aborted. Never resets.
    pub fn failed(&self) -> bool {
        self.failed
    }

    /// Message of the abort that failed the most recent run
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Set the base URL used by bootstrap and every later request context
    ///
    /// `raw` must be an absolute, hierarchical URL. A malformed value is a
    /// fatal configuration error; the previous base URL is left untouched.
    pub fn set_base_url(&mut self, raw: &str) -> Result<&mut Self> {
        let url = Url::parse(raw).map_err(|e| Error::invalid_base_url(raw, e))?;
        if url.cannot_be_a_base() {
            return Err(Error::invalid_base_url(raw, "not a hierarchical URL"));
        }

        if let Some(previous) = &self.base_url {
            debug!(suite = %self.name, %previous, new = %url, "Replacing base URL");
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Append a step; steps run in the order they were added
    pub fn add_test<F, Fut>(&mut self, name: impl Into<String>, body: F) -> &mut Self
    where
        F: Fn(RequestContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.steps.push(Step {
            name: name.into(),
            body: Box::new(move |ctx| body(ctx).boxed()),
        });
        self
    }

    /// Bind the suite to a configured target
    ///
    /// Sets the target's base URL, then bootstraps credentials if the
    /// target carries a password grant.
    pub async fn apply_target(&mut self, target: &TargetConfig) -> Result<&mut Self> {
        self.set_base_url(&target.base_url)?;
        if let Some(grant) = &target.oauth {
            self.authenticate(grant).await?;
        }
        Ok(self)
    }
}
