//! Configuration file location
//!
//! `$RICOCHET_CONFIG` wins when set; otherwise the platform config dir is
//! used (`~/.config/ricochet/config.toml` on Linux).

use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable that overrides the config file path
pub const CONFIG_ENV: &str = "RICOCHET_CONFIG";

/// Get the configuration directory
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "ricochet").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the configuration file path
pub fn config_path() -> Option<PathBuf> {
    config_path_from(std::env::var_os(CONFIG_ENV))
}

/// Resolve the config file path given the value of `$RICOCHET_CONFIG`
///
/// An empty override counts as unset.
pub fn config_path_from(override_path: Option<OsString>) -> Option<PathBuf> {
    match override_path {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => config_dir().map(|d| d.join("config.toml")),
    }
}
