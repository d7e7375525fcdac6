use crate::GarminError;
use secrecy::SecretString;

/// User-Agent sent with every request. The upstream service serves a
/// different sign-in flow to clients it does not recognize, so we present
/// ourselves as a desktop Firefox.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:22.0) Gecko/20100101 Firefox/22.0";

pub const DEFAULT_BASE_URL: &str = "https://connect.garmin.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub username: String,
    pub password: SecretString,
    pub base_url: String,
    pub user_agent: String,
}

impl Config {
    /// Build a config for the production service from raw credentials.
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }

    pub fn from_env() -> Result<Self, GarminError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function. This avoids mutating global environment in tests and keeps
    /// `from_env()` small and safe.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, GarminError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let username = get("GARMIN_CONNECT_USERNAME")
            .ok_or_else(|| GarminError::Config("GARMIN_CONNECT_USERNAME missing".into()))?;
        let password = get("GARMIN_CONNECT_PASSWORD")
            .ok_or_else(|| GarminError::Config("GARMIN_CONNECT_PASSWORD missing".into()))?;
        let base_url = get("GARMIN_CONNECT_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let user_agent =
            get("GARMIN_CONNECT_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.into());
        Ok(Self {
            username,
            password: SecretString::new(password.into()),
            base_url: base_url.trim_end_matches('/').to_string(),
            user_agent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_missing_password() {
        let get = |k: &str| match k {
            "GARMIN_CONNECT_USERNAME" => Some("alice".into()),
            _ => None,
        };
        let res = Config::from_env_with(get);
        assert!(res.is_err());
    }

    #[test]
    fn from_env_reads_values_and_trims_base_url() {
        let get = |k: &str| match k {
            "GARMIN_CONNECT_USERNAME" => Some("alice".into()),
            "GARMIN_CONNECT_PASSWORD" => Some("sekrit".into()),
            "GARMIN_CONNECT_BASE_URL" => Some("http://localhost/".into()),
            _ => None,
        };
        let cfg = Config::from_env_with(get).expect("cfg");
        assert_eq!(cfg.username, "alice");
        assert_eq!(cfg.base_url, "http://localhost");
        assert_eq!(cfg.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn new_uses_production_defaults() {
        let cfg = Config::new("alice", SecretString::new("pw".into()));
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert!(cfg.user_agent.contains("Firefox"));
    }
}
