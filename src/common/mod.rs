//! Common utilities shared by suites and scenarios

pub mod config;
pub mod error;
pub mod join;
pub mod logging;
pub mod paths;

pub use error::{Error, Result};
pub use join::join_url;

/// Maximum number of characters of a response body quoted in messages
const EXCERPT_CHARS: usize = 200;

/// Shorten a response body for inclusion in an error message
pub fn excerpt(body: &str) -> String {
    match body.char_indices().nth(EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short"), "short");

        let long = "é".repeat(250);
        let cut = excerpt(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), EXCERPT_CHARS + 3);
    }
}
