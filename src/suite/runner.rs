//! Suite executor
//!
//! Runs steps one at a time in registration order. The first step that
//! returns an error or panics stops the run; later steps never execute.

use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::{debug, info, warn};

use super::{ConsoleReporter, RequestContext, Reporter, Step, Suite};
use crate::common::{Error, Result};

/// Lifecycle of the most recent run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    NotRun,
    Running,
    Passed,
    Failed,
}

/// Result of a suite run
#[derive(Debug, Clone)]
pub struct SuiteReport {
    pub name: String,
    pub passed: bool,
    pub steps_run: usize,
    pub steps_total: usize,
    /// Step whose abort failed the run
    pub failed_step: Option<String>,
    pub error: Option<String>,
}

impl Step {
    /// Invoke the body, turning a panic into a step failure
    async fn invoke(&self, ctx: RequestContext) -> Result<()> {
        AssertUnwindSafe(async move { (self.body)(ctx).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(Error::StepPanicked(panic_message(&*panic))))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Suite {
    /// Run every step, printing progress to stdout
    pub async fn run(&mut self) -> SuiteReport {
        self.run_with(&mut ConsoleReporter::default()).await
    }

    /// Run every step, sending progress to `reporter`
    ///
    /// A failing step is a test outcome, not an error: it is recorded on the
    /// suite and in the returned report, and the run stops there.
    pub async fn run_with(&mut self, reporter: &mut dyn Reporter) -> SuiteReport {
        let steps_total = self.steps.len();
        reporter.suite_started(&self.name);
        info!(suite = %self.name, steps = steps_total, "Running suite");
        self.state = RunState::Running;

        let mut steps_run = 0;
        let mut abort = None;
        for step in &self.steps {
            steps_run += 1;
            reporter.step_started(&step.name);
            debug!(suite = %self.name, step = %step.name, "Running step");

            let ctx = RequestContext::new(
                self.client.clone(),
                self.base_url.clone(),
                self.token.clone(),
            );
            if let Err(e) = step.invoke(ctx).await {
                reporter.step_failed(&step.name, &e);
                abort = Some((step.name.clone(), e));
                break;
            }
        }

        let report = match abort {
            Some((step, error)) => {
                warn!(suite = %self.name, %step, %error, "Suite failed");
                let message = error.to_string();
                self.failed = true;
                self.failure = Some(message.clone());
                self.state = RunState::Failed;
                SuiteReport {
                    name: self.name.clone(),
                    passed: false,
                    steps_run,
                    steps_total,
                    failed_step: Some(step),
                    error: Some(message),
                }
            }
            None => {
                info!(suite = %self.name, "Suite passed");
                self.failure = None;
                self.state = RunState::Passed;
                SuiteReport {
                    name: self.name.clone(),
                    passed: true,
                    steps_run,
                    steps_total,
                    failed_step: None,
                    error: None,
                }
            }
        };

        reporter.suite_finished(&report);
        report
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Reporter that records every notification as a line
    #[derive(Default)]
    pub(crate) struct RecordingReporter {
        pub events: Vec<String>,
    }

    impl Reporter for RecordingReporter {
        fn suite_started(&mut self, suite: &str) {
            self.events.push(format!("suite {suite}"));
        }

        fn step_started(&mut self, step: &str) {
            self.events.push(format!("step {step}"));
        }

        fn step_failed(&mut self, step: &str, error: &Error) {
            self.events.push(format!("failed {step}: {error}"));
        }

        fn suite_finished(&mut self, report: &SuiteReport) {
            self.events.push(format!("finished passed={}", report.passed));
        }
    }

    type Calls = Arc<Mutex<Vec<String>>>;

    fn recording_step(suite: &mut Suite, name: &'static str, calls: &Calls, fail: bool) {
        let calls = Arc::clone(calls);
        suite.add_test(name, move |_ctx| {
            let calls = Arc::clone(&calls);
            async move {
                calls.lock().unwrap().push(name.to_string());
                if fail {
                    Err(Error::TestAssertion(format!("{name} broke")))
                } else {
                    Ok(())
                }
            }
        });
    }

    fn suite() -> Suite {
        Suite::new("orders", reqwest::Client::new())
    }

    #[tokio::test]
    async fn test_all_steps_run_in_order() {
        let calls = Calls::default();
        let mut s = suite();
        for name in ["a", "b", "c", "d"] {
            recording_step(&mut s, name, &calls, false);
        }

        let mut reporter = RecordingReporter::default();
        let report = s.run_with(&mut reporter).await;

        assert!(report.passed);
        assert_eq!(report.steps_run, 4);
        assert_eq!(*calls.lock().unwrap(), ["a", "b", "c", "d"]);
        assert!(!s.failed());
        assert_eq!(s.state(), RunState::Passed);
        assert_eq!(
            reporter.events,
            [
                "suite orders",
                "step a",
                "step b",
                "step c",
                "step d",
                "finished passed=true"
            ]
        );
    }

    #[tokio::test]
    async fn test_first_failure_stops_the_run() {
        let calls = Calls::default();
        let mut s = suite();
        recording_step(&mut s, "a", &calls, false);
        recording_step(&mut s, "b", &calls, true);
        recording_step(&mut s, "c", &calls, false);
        recording_step(&mut s, "d", &calls, true);

        let mut reporter = RecordingReporter::default();
        let report = s.run_with(&mut reporter).await;

        assert!(!report.passed);
        assert_eq!(report.steps_run, 2);
        assert_eq!(report.steps_total, 4);
        assert_eq!(report.failed_step.as_deref(), Some("b"));
        assert_eq!(*calls.lock().unwrap(), ["a", "b"]);
        assert!(s.failed());
        assert_eq!(s.state(), RunState::Failed);
        assert_eq!(s.failure(), Some("Test assertion failed: b broke"));
        assert_eq!(
            reporter.events,
            [
                "suite orders",
                "step a",
                "step b",
                "failed b: Test assertion failed: b broke",
                "finished passed=false"
            ]
        );
    }

    #[tokio::test]
    async fn test_panicking_step_is_contained() {
        let calls = Calls::default();
        let mut s = suite();
        s.add_test("explodes", |_ctx| async {
            let status: u16 = 500;
            if status != 200 {
                panic!("status was {status}");
            }
            Ok(())
        });
        recording_step(&mut s, "after", &calls, false);

        let report = s.run_with(&mut RecordingReporter::default()).await;

        assert!(!report.passed);
        assert_eq!(report.error.as_deref(), Some("Step panicked: status was 500"));
        assert!(calls.lock().unwrap().is_empty());
        assert!(s.failed());
    }

    #[tokio::test]
    async fn test_failed_flag_is_sticky_across_runs() {
        let attempts = Arc::new(Mutex::new(0));
        let mut s = suite();
        let counter = Arc::clone(&attempts);
        s.add_test("flaky", move |_ctx| {
            let counter = Arc::clone(&counter);
            async move {
                let mut n = counter.lock().unwrap();
                *n += 1;
                if *n == 1 {
                    Err(Error::TestAssertion("first attempt".to_string()))
                } else {
                    Ok(())
                }
            }
        });

        assert!(!s.run_with(&mut RecordingReporter::default()).await.passed);
        let report = s.run_with(&mut RecordingReporter::default()).await;

        assert!(report.passed);
        assert_eq!(s.state(), RunState::Passed);
        assert!(s.failed());
        assert_eq!(s.failure(), None);
        assert_eq!(*attempts.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_context_reflects_latest_configuration() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut s = suite();
        s.set_base_url("http://first.example.com").unwrap();
        s.set_base_url("http://second.example.com/api").unwrap();
        s.token = "tok123".to_string();

        let sink = Arc::clone(&seen);
        s.add_test("capture", move |ctx| {
            let sink = Arc::clone(&sink);
            async move {
                let url = ctx.base_url()?.to_string();
                sink.lock().unwrap().push((url, ctx.token().to_string()));
                Ok::<(), Error>(())
            }
        });

        assert!(s.run_with(&mut RecordingReporter::default()).await.passed);
        assert_eq!(
            *seen.lock().unwrap(),
            [("http://second.example.com/api".to_string(), "tok123".to_string())]
        );
    }

    #[tokio::test]
    async fn test_empty_suite_passes() {
        let mut s = suite();
        let report = s.run_with(&mut RecordingReporter::default()).await;
        assert!(report.passed);
        assert_eq!(report.steps_total, 0);
    }
}
