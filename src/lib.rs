//! Ricochet - declarative test suites for remote HTTP APIs
//!
//! Suites are ordered lists of named steps bound to a base URL and an
//! optional OAuth2 bearer token. Steps run one at a time and the first
//! failing step stops its suite.

pub mod common;
pub mod scenario;
pub mod suite;

// Re-export commonly used types for tests
pub use common::config::{Config, PasswordGrant, TargetConfig};
pub use common::{Error, Result};
pub use suite::{Registry, RequestContext, Suite, SuiteReport};
