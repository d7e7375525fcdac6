//! Client for the Garmin Connect activity feed.
//!
//! Signs in against the session-cookie login form, walks the paginated
//! activity-search endpoint and exposes each record as an [`Activity`]
//! with typed accessors for the derived fields.

use async_trait::async_trait;
use thiserror::Error;

pub mod activity;
pub mod config;
pub mod http_client;
pub mod session;

pub use activity::{Activity, Unit};
pub use config::Config;
pub use http_client::GarminConnectClient;
pub use session::Session;

#[derive(Debug, Error)]
pub enum GarminError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("api error: {0}")]
    Api(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("unknown unit of measure: {0}")]
    UnknownUnit(String),
    #[error("cannot compute pace: distance is zero")]
    ZeroDistance,
    #[error("no activities found")]
    EmptyResult,
    #[error("configuration error: {0}")]
    Config(String),
}

/// The activity feed operations exposed to callers.
///
/// Implemented by [`GarminConnectClient`]; the trait exists so consumers can
/// substitute a fake source in tests.
#[async_trait]
pub trait ActivitySource: Send + Sync + 'static {
    /// The most recent activity on the feed.
    async fn get_latest(&self) -> Result<Activity, GarminError>;
    /// Every activity, in the order the upstream emits them.
    async fn get_all(&self) -> Result<Vec<Activity>, GarminError>;
    /// Activities whose start date falls in the given ISO week, or in the
    /// current ISO week when `week` is `None`.
    async fn get_week(&self, week: Option<u32>) -> Result<Vec<Activity>, GarminError>;
}
