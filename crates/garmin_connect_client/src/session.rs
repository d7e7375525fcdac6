//! Authenticated HTTP session for Garmin Connect.
//!
//! The upstream authenticates through a sign-in form and tracks the session
//! in cookies, so the [`Session`] owns a cookie-jar [`reqwest::Client`] and
//! the credentials needed to re-enter when the session lapses.

use crate::{Config, GarminError};
use secrecy::{ExposeSecret, SecretString};

/// Marker string present in the sign-in response body when credentials were
/// rejected. The form endpoint answers 200 either way.
const AUTH_ERROR_MARKER: &str = "errorMessage";

/// Total attempts per request: the original try, plus one retry after
/// re-authenticating.
const MAX_ATTEMPTS: u32 = 2;

pub struct Session {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: SecretString,
}

impl Session {
    /// Build the cookie-backed client and authenticate once.
    ///
    /// Fails with [`GarminError::Auth`] when the service rejects the
    /// credentials.
    pub async fn sign_in(config: &Config) -> Result<Self, GarminError> {
        let headers = default_headers(&config.user_agent)?;
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(GarminError::Http)?;

        let session = Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        };
        session.login().await?;
        Ok(session)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit the sign-in form. Populates the cookie store as a side effect.
    async fn login(&self) -> Result<(), GarminError> {
        let url = format!("{}/signin", self.base_url);
        let form = [
            ("login:loginUsernameField", self.username.as_str()),
            ("login:password", self.password.expose_secret()),
        ];
        let resp = self.client.post(&url).form(&form).send().await?;
        let body = resp.text().await?;
        if body.contains(AUTH_ERROR_MARKER) {
            return Err(GarminError::Auth(
                "sign-in response contained an error message".into(),
            ));
        }
        tracing::debug!(username = %self.username, "signed in");
        Ok(())
    }

    /// GET through the authenticated session, returning the raw body.
    ///
    /// A non-200 status is taken as a lapsed session: sign in again and
    /// retry once. Both attempts failing surfaces as [`GarminError::Api`].
    pub async fn request(&self, url: &str) -> Result<Vec<u8>, GarminError> {
        let mut last_status = None;
        for attempt in 1..=MAX_ATTEMPTS {
            let resp = self.client.get(url).send().await?;
            let status = resp.status();
            if status == reqwest::StatusCode::OK {
                return Ok(resp.bytes().await?.to_vec());
            }
            last_status = Some(status);
            tracing::debug!(%status, attempt, url, "request rejected, re-authenticating");
            if attempt < MAX_ATTEMPTS {
                self.login().await?;
            }
        }
        Err(GarminError::Api(format!(
            "request to {url} failed after {MAX_ATTEMPTS} attempts (last status: {})",
            last_status.map_or_else(|| "none".into(), |s| s.to_string()),
        )))
    }
}

fn default_headers(user_agent: &str) -> Result<reqwest::header::HeaderMap, GarminError> {
    let mut headers = reqwest::header::HeaderMap::new();
    let value = reqwest::header::HeaderValue::from_str(user_agent)
        .map_err(|e| GarminError::Config(format!("invalid user agent: {e}")))?;
    headers.insert(reqwest::header::USER_AGENT, value);
    Ok(headers)
}
