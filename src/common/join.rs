//! URL joining
//!
//! Endpoints are appended to the base path rather than resolved RFC 3986
//! style, so `http://host/api` + `/users` gives `http://host/api/users`.

use reqwest::Url;

use super::{Error, Result};

/// Combine a base URL with an endpoint path
///
/// An endpoint that is already an absolute URL is returned unchanged.
/// A query string on the endpoint replaces any query on the base.
pub fn join_url(base: &Url, endpoint: &str) -> Result<Url> {
    if let Ok(absolute) = Url::parse(endpoint) {
        return Ok(absolute);
    }

    if base.cannot_be_a_base() {
        return Err(Error::invalid_endpoint(
            endpoint,
            format!("'{}' cannot be a base URL", base),
        ));
    }

    let (path, query) = match endpoint.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (endpoint, None),
    };

    let mut joined = base.clone();
    let prefix = base.path().trim_end_matches('/');
    let suffix = path.trim_start_matches('/');
    if suffix.is_empty() {
        joined.set_path(if prefix.is_empty() { "/" } else { base.path() });
    } else {
        joined.set_path(&format!("{}/{}", prefix, suffix));
    }
    if query.is_some() {
        joined.set_query(query);
    }
    joined.set_fragment(None);

    Ok(joined)
}
