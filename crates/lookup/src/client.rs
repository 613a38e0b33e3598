use async_trait::async_trait;
use serde::Deserialize;
use sitelens_core_types::{ProfileRecord, ProfileSummary};
use tracing::trace;

use crate::errors::LookupError;
use crate::policy::EndpointPolicy;

/// The two-step lookup API: search by domain, then fetch a full profile by
/// the candidate's slug.
#[async_trait]
pub trait ProfileApi: Send + Sync {
    async fn search(&self, domain: &str) -> Result<Vec<ProfileSummary>, LookupError>;

    async fn fetch_profile(&self, slug: &str) -> Result<Option<ProfileRecord>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Option<Vec<ProfileSummary>>,
}

#[derive(Debug, Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    data: Option<ProfileRecord>,
}

/// HTTP implementation over the configured endpoints. A missing `data` field
/// reads as an empty result rather than an error.
pub struct HttpProfileApi {
    http: reqwest::Client,
    endpoints: EndpointPolicy,
}

impl HttpProfileApi {
    pub fn new(endpoints: EndpointPolicy) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
        }
    }
}

#[async_trait]
impl ProfileApi for HttpProfileApi {
    async fn search(&self, domain: &str) -> Result<Vec<ProfileSummary>, LookupError> {
        trace!(%domain, "search request");
        let response = self
            .http
            .get(&self.endpoints.search_url)
            .query(&[("domain", domain), ("region", self.endpoints.region.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|err| LookupError::MalformedResponse(err.to_string()))?;
        Ok(body.data.unwrap_or_default())
    }

    async fn fetch_profile(&self, slug: &str) -> Result<Option<ProfileRecord>, LookupError> {
        trace!(%slug, "profile request");
        let url = format!(
            "{}/{}",
            self.endpoints.profile_url.trim_end_matches('/'),
            slug
        );
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(LookupError::Status(response.status().as_u16()));
        }
        let body: ProfileResponse = response
            .json()
            .await
            .map_err(|err| LookupError::MalformedResponse(err.to_string()))?;
        Ok(body.data)
    }
}
