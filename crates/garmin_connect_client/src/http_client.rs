//! Pagination fetcher for the activity-search endpoint.
//!
//! [`GarminConnectClient`] drives paged requests through the [`Session`]
//! and materializes raw records into [`Activity`] values.
//!
//! Canonical page schema (the single-`results` shape; see DESIGN.md):
//!
//! ```json
//! {"results": {"search": {"totalFound": 42}, "activities": [{"activity": {}}]}}
//! ```

use crate::{Activity, ActivitySource, Config, GarminError, Session};
use async_trait::async_trait;
use chrono::Datelike;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ActivityPage {
    results: PageResults,
}

/// One page of the listing. Missing keys are sentinels, not errors, so both
/// fields stay optional and the fetch loop decides what each absence means.
#[derive(Debug, Deserialize)]
struct PageResults {
    search: Option<SearchSummary>,
    activities: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchSummary {
    #[serde(rename = "totalFound")]
    total_found: u64,
}

fn parse_page(body: &[u8]) -> Result<PageResults, GarminError> {
    let page: ActivityPage = serde_json::from_slice(body)
        .map_err(|e| GarminError::MalformedResponse(format!("decoding activity page: {e}")))?;
    Ok(page.results)
}

/// Client for the Garmin Connect activity feed.
pub struct GarminConnectClient {
    session: Session,
}

impl GarminConnectClient {
    /// Authenticate and return a ready client.
    pub async fn sign_in(config: &Config) -> Result<Self, GarminError> {
        Ok(Self {
            session: Session::sign_in(config).await?,
        })
    }

    /// Wrap an already-authenticated session.
    pub fn from_session(session: Session) -> Self {
        Self { session }
    }

    fn page_url(&self, offset: u64) -> String {
        format!(
            "{}/proxy/activity-search-service-1.0/json/activities?start={}",
            self.session.base_url(),
            offset
        )
    }

    async fn fetch_page(&self, offset: u64) -> Result<PageResults, GarminError> {
        let body = self.session.request(&self.page_url(offset)).await?;
        parse_page(&body)
    }
}

#[async_trait]
impl ActivitySource for GarminConnectClient {
    async fn get_latest(&self) -> Result<Activity, GarminError> {
        let page = self.fetch_page(0).await?;
        let records = page.activities.ok_or_else(|| {
            GarminError::MalformedResponse("first activity page has no activities key".into())
        })?;
        records
            .into_iter()
            .next()
            .map(Activity::new)
            .ok_or(GarminError::EmptyResult)
    }

    async fn get_all(&self) -> Result<Vec<Activity>, GarminError> {
        let mut collected = Vec::new();
        let mut offset: u64 = 0;
        loop {
            let page = self.fetch_page(offset).await?;
            let total = match page.search {
                Some(search) => search.total_found,
                // Bad data from the API on the very first page degrades to
                // an empty result rather than an error.
                None if offset == 0 => {
                    tracing::warn!("first activity page is missing totalFound, returning nothing");
                    return Ok(Vec::new());
                }
                None => {
                    return Err(GarminError::MalformedResponse(
                        "activity page is missing results.search.totalFound".into(),
                    ));
                }
            };

            // A missing activities key is the upstream's end-of-data signal.
            let Some(records) = page.activities else {
                break;
            };
            if records.is_empty() {
                break;
            }

            // Advance by the count actually returned; the upstream chooses
            // the page size and this loop must follow it.
            offset += records.len() as u64;
            collected.extend(records.into_iter().map(Activity::new));

            if offset >= total {
                break;
            }
        }
        Ok(collected)
    }

    async fn get_week(&self, week: Option<u32>) -> Result<Vec<Activity>, GarminError> {
        let current = chrono::Local::now().date_naive().iso_week();
        let mut matched = Vec::new();
        for activity in self.get_all().await? {
            let start_week = activity.start_time()?.date().iso_week();
            let keep = match week {
                Some(number) => start_week.week() == number,
                None => start_week == current,
            };
            if keep {
                matched.push(activity);
            }
        }
        Ok(matched)
    }
}
