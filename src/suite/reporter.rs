//! Progress notifications emitted while a suite runs

use colored::{ColoredString, Colorize};

use super::SuiteReport;
use crate::common::Error;

/// Receives progress notifications from the executor
///
/// Calls arrive in a fixed order: `suite_started`, then `step_started` for
/// each step before its body runs, then at most one `step_failed`, then
/// `suite_finished`.
pub trait Reporter: Send {
    fn suite_started(&mut self, suite: &str);

    fn step_started(&mut self, step: &str);

    fn step_failed(&mut self, step: &str, error: &Error);

    fn suite_finished(&mut self, _report: &SuiteReport) {}
}

/// Prints progress lines to stdout
///
/// Color is a property of the reporter, so two registries in one process can
/// print with different settings.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleReporter {
    color: bool,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    pub fn color(&self) -> bool {
        self.color
    }

    fn paint(&self, text: &str, style: fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn suite_started_line(&self, suite: &str) -> String {
        format!(
            "\n{} {}",
            self.paint("Running", |s| s.blue().bold()),
            self.paint(suite, |s| s.white().bold())
        )
    }

    fn step_started_line(&self, step: &str) -> String {
        format!("  {} {}", self.paint("...", |s| s.dimmed()), step)
    }

    fn step_failed_line(&self, step: &str, error: &Error) -> String {
        format!(
            "  {} {}: {}",
            self.paint("✗", |s| s.red()),
            step,
            self.paint(&error.to_string(), |s| s.red())
        )
    }

    fn suite_finished_line(&self, report: &SuiteReport) -> String {
        if report.passed {
            format!(
                "{} {} ({} steps)",
                self.paint("✓", |s| s.green().bold()),
                self.paint("Suite Passed", |s| s.green().bold()),
                report.steps_total
            )
        } else {
            format!(
                "{} {} ({} of {} steps run)",
                self.paint("✗", |s| s.red().bold()),
                self.paint("Suite Failed", |s| s.red().bold()),
                report.steps_run,
                report.steps_total
            )
        }
    }
}

impl Reporter for ConsoleReporter {
    fn suite_started(&mut self, suite: &str) {
        println!("{}", self.suite_started_line(suite));
    }

    fn step_started(&mut self, step: &str) {
        println!("{}", self.step_started_line(step));
    }

    fn step_failed(&mut self, step: &str, error: &Error) {
        println!("{}", self.step_failed_line(step, error));
    }

    fn suite_finished(&mut self, report: &SuiteReport) {
        println!("{}", self.suite_finished_line(report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_reporter_emits_no_escapes() {
        let reporter = ConsoleReporter::new(false);
        let report = SuiteReport {
            name: "users".to_string(),
            passed: false,
            steps_run: 1,
            steps_total: 3,
            failed_step: Some("create".to_string()),
            error: Some("boom".to_string()),
        };
        let error = Error::TestAssertion("boom".to_string());

        let lines = [
            reporter.suite_started_line("users"),
            reporter.step_started_line("create"),
            reporter.step_failed_line("create", &error),
            reporter.suite_finished_line(&report),
        ];
        for line in &lines {
            assert!(!line.contains('\x1b'), "{line:?}");
        }
        assert_eq!(lines[0], "\nRunning users");
        assert_eq!(lines[3], "✗ Suite Failed (1 of 3 steps run)");
    }

    #[test]
    fn test_default_reporter_is_colored() {
        assert!(ConsoleReporter::default().color());
        assert!(!ConsoleReporter::new(false).color());
    }
}
