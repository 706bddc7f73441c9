//! Scenario declaration and execution
//!
//! Turns a parsed [`Scenario`] into a registered [`Suite`] whose steps issue
//! the described requests through their [`RequestContext`]. Everything that
//! can be checked without a server (methods, status codes, JSON pointers) is
//! validated while declaring, so a typo fails setup instead of a step.

use std::path::Path;
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, info};

use crate::common::config::Config;
use crate::common::{excerpt, Error, Result};
use crate::suite::{expect_status, Registry, RequestContext, Suite, SuiteReport};

use super::config::{Scenario, ScenarioStep};

/// A step whose method and status were validated at declaration time
#[derive(Debug)]
struct PreparedStep {
    method: Method,
    status: StatusCode,
    spec: ScenarioStep,
}

/// Load a scenario from a YAML file
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read scenario '{}': {}",
            path.display(),
            e
        ))
    })?;

    serde_yaml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse scenario '{}': {}",
            path.display(),
            e
        ))
    })
}

/// Register `scenario` as a suite and configure it
///
/// Applies `target` or `base_url`, bootstraps OAuth when present and appends
/// one step per scenario entry. `config` resolves named targets. The suite is
/// only stored once all of that succeeded; on error the registry, including
/// any earlier suite of the same name, is left as it was.
pub async fn declare<'r>(
    registry: &'r mut Registry,
    scenario: Scenario,
    config: &Config,
) -> Result<&'r mut Suite> {
    let steps = scenario
        .steps
        .into_iter()
        .map(prepare_step)
        .collect::<Result<Vec<_>>>()?;

    if scenario.target.is_some() && scenario.base_url.is_some() {
        return Err(Error::Config(format!(
            "Scenario '{}' sets both 'target' and 'base_url'",
            scenario.name
        )));
    }

    let mut suite = registry.new_suite(scenario.name.as_str());
    if let Some(target) = &scenario.target {
        suite.apply_target(config.target(target)?).await?;
    }
    if let Some(base_url) = &scenario.base_url {
        suite.set_base_url(base_url)?;
    }

    if let Some(grant) = &scenario.oauth {
        suite.authenticate(grant).await?;
    }

    for step in steps {
        let name = step.spec.name.clone();
        let step = Arc::new(step);
        suite.add_test(name, move |ctx| {
            let step = Arc::clone(&step);
            async move { execute_step(&ctx, &step).await }
        });
    }

    debug!(suite = %scenario.name, steps = suite.steps().len(), "Declared scenario");
    Ok(registry.insert(suite))
}

/// Load, declare and run a scenario file
pub async fn run_scenario_file(
    registry: &mut Registry,
    config: &Config,
    path: &Path,
) -> Result<SuiteReport> {
    let scenario = load_scenario(path)?;
    if let Some(description) = &scenario.description {
        info!(suite = %scenario.name, %description, "Loaded scenario");
    }

    let suite = declare(registry, scenario, config).await?;
    Ok(suite.run().await)
}

fn prepare_step(spec: ScenarioStep) -> Result<PreparedStep> {
    let method = Method::from_bytes(spec.request.method.to_uppercase().as_bytes()).map_err(|_| {
        Error::Config(format!(
            "Step '{}': invalid HTTP method '{}'",
            spec.name, spec.request.method
        ))
    })?;

    let status = StatusCode::from_u16(spec.expect.status).map_err(|_| {
        Error::Config(format!(
            "Step '{}': invalid status code {}",
            spec.name, spec.expect.status
        ))
    })?;

    if let Some(pointer) = spec.expect.json.keys().find(|p| !p.starts_with('/')) {
        return Err(Error::Config(format!(
            "Step '{}': JSON pointer '{}' must start with '/'",
            spec.name, pointer
        )));
    }

    Ok(PreparedStep {
        method,
        status,
        spec,
    })
}

/// Issue the step's request and check its expectations
async fn execute_step(ctx: &RequestContext, step: &PreparedStep) -> Result<()> {
    let request = &step.spec.request;
    let expect = &step.spec.expect;

    let mut builder = ctx.request(step.method.clone(), &request.path)?;
    for (name, value) in &request.headers {
        builder = builder.header(name, value);
    }
    if let Some(json) = &request.json {
        builder = builder.json(json);
    } else if let Some(body) = &request.body {
        builder = builder.body(body.clone());
    }

    let response = expect_status(builder.send().await?, step.status).await?;
    let body = response.text().await?;

    if let Some(expected_substr) = &expect.body_contains {
        if !body.contains(expected_substr) {
            return Err(Error::TestAssertion(format!(
                "Body does not contain '{}'. Got: '{}'",
                expected_substr,
                excerpt(&body)
            )));
        }
    }

    if !expect.json.is_empty() {
        let document: Value = serde_json::from_str(&body).map_err(|e| {
            Error::TestAssertion(format!(
                "Body is not JSON ({}). Got: '{}'",
                e,
                excerpt(&body)
            ))
        })?;

        for (pointer, expected) in &expect.json {
            match document.pointer(pointer) {
                Some(actual) if actual == expected => {}
                Some(actual) => {
                    return Err(Error::TestAssertion(format!(
                        "'{}': expected {}, got {}",
                        pointer, expected, actual
                    )));
                }
                None => {
                    return Err(Error::TestAssertion(format!(
                        "'{}' not found in response body",
                        pointer
                    )));
                }
            }
        }
    }

    Ok(())
}
