//! OAuth2 password-grant bootstrap
//!
//! Exchanges resource-owner credentials for an access token before any step
//! runs. Failures split into two channels: [`Error::Transport`] when no
//! response was obtained, and fatal errors (`AuthRejected`, `TokenDecode`,
//! `MissingBaseUrl`) when the setup itself is wrong.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::Suite;
use crate::common::config::PasswordGrant;
use crate::common::{excerpt, join_url, Error, Result};

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

impl Suite {
    /// Obtain a bearer token with the password grant and store it on the suite
    ///
    /// The token endpoint is joined onto the base URL, so a base URL must
    /// already be set. On success the previous token is replaced.
    pub async fn authenticate(&mut self, grant: &PasswordGrant) -> Result<&mut Self> {
        let base = self.base_url.as_ref().ok_or(Error::MissingBaseUrl)?;
        let endpoint = join_url(base, &grant.endpoint)?;

        let params = [
            ("grant_type", "password"),
            ("client_id", grant.client_id.as_str()),
            ("client_secret", grant.client_secret.as_str()),
            ("username", grant.username.as_str()),
            ("password", grant.password.as_str()),
        ];

        debug!(
            suite = %self.name,
            %endpoint,
            client_id = %grant.client_id,
            username = %grant.username,
            "Requesting password grant"
        );

        let response = match self.client.post(endpoint).form(&params).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(suite = %self.name, error = %e, "OAuth request failed");
                return Err(Error::Transport(e));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::AuthRejected {
                status,
                body: excerpt(body.trim()),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::TokenDecode(e.to_string()))?;
        let token: TokenResponse =
            serde_json::from_slice(&body).map_err(|e| Error::TokenDecode(e.to_string()))?;

        self.token = token.access_token;
        info!(suite = %self.name, "Obtained OAuth access token");

        Ok(self)
    }
}
