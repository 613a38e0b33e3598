use std::sync::Arc;

use sitelens_core_types::{LookupStatus, StoredProfile, TabId};
use sitelens_state_store::{StoreError, TabStateStore};
use tracing::{debug, warn};

use crate::client::ProfileApi;
use crate::domain;

/// What a single lookup invocation amounted to. `Stale` means the tab
/// navigated away mid-flight and the invocation wrote nothing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LookupOutcome {
    Stale,
    NoData,
    MultipleResults,
    DataReturned,
}

/// Orchestrates the search → validate → profile-fetch pipeline per tab.
///
/// Concurrency model: invocations for the same tab may overlap under rapid
/// navigation; there is no locking and no transport-level cancellation. Each
/// invocation captures the domain it was started for and re-checks it against
/// the stored domain before every write. A request that hangs leaves the tab
/// at `searching` — a known limitation, deliberately not papered over with
/// timeouts.
pub struct LookupEngine {
    tabs: Arc<TabStateStore>,
    api: Arc<dyn ProfileApi>,
}

impl LookupEngine {
    pub fn new(tabs: Arc<TabStateStore>, api: Arc<dyn ProfileApi>) -> Arc<Self> {
        Arc::new(Self { tabs, api })
    }

    /// The staleness guard: the captured domain must still be the tab's
    /// stored domain for this invocation's writes to remain valid.
    async fn still_current(&self, tab: TabId, epoch: &str) -> Result<bool, StoreError> {
        Ok(self.tabs.domain(tab).await?.as_deref() == Some(epoch))
    }

    async fn settle_no_data(&self, tab: TabId) -> Result<LookupOutcome, StoreError> {
        self.tabs
            .set_status_and_profile(tab, LookupStatus::NoData, StoredProfile::None)
            .await?;
        Ok(LookupOutcome::NoData)
    }

    /// Runs the full lookup chain for `domain` against `tab`.
    pub async fn run_lookup(&self, tab: TabId, domain: &str) -> Result<LookupOutcome, StoreError> {
        if !self.still_current(tab, domain).await? {
            debug!(%tab, %domain, "lookup superseded before start");
            return Ok(LookupOutcome::Stale);
        }
        self.tabs
            .set_status_and_profile(tab, LookupStatus::Searching, StoredProfile::None)
            .await?;

        let candidates = match self.api.search(domain).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(%tab, %domain, error = %err, "search request failed");
                if !self.still_current(tab, domain).await? {
                    return Ok(LookupOutcome::Stale);
                }
                return self.settle_no_data(tab).await;
            }
        };
        if !self.still_current(tab, domain).await? {
            debug!(%tab, %domain, "lookup superseded after search");
            return Ok(LookupOutcome::Stale);
        }

        if candidates.is_empty() {
            return self.settle_no_data(tab).await;
        }
        if candidates.len() > 1 {
            self.tabs
                .set_status_and_profile(
                    tab,
                    LookupStatus::MultipleResults,
                    StoredProfile::Candidates(candidates),
                )
                .await?;
            return Ok(LookupOutcome::MultipleResults);
        }

        let Some(candidate) = candidates.into_iter().next() else {
            return self.settle_no_data(tab).await;
        };
        let belongs = domain::candidate_host(&candidate.url)
            .map(|host| domain::host_matches(&host, domain))
            .unwrap_or(false);
        if !belongs {
            debug!(%tab, %domain, candidate = %candidate.url, "candidate host rejected");
            return self.settle_no_data(tab).await;
        }

        // Transient: a validated candidate exists, profile not yet fetched.
        self.tabs
            .set_status_and_profile(tab, LookupStatus::Success, StoredProfile::None)
            .await?;

        let fetched = match self.api.fetch_profile(&candidate.slug).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(%tab, slug = %candidate.slug, error = %err, "profile fetch failed");
                if !self.still_current(tab, domain).await? {
                    return Ok(LookupOutcome::Stale);
                }
                return self.settle_no_data(tab).await;
            }
        };
        if !self.still_current(tab, domain).await? {
            debug!(%tab, %domain, "lookup superseded after profile fetch");
            return Ok(LookupOutcome::Stale);
        }

        let profile = fetched
            .map(StoredProfile::single)
            .unwrap_or(StoredProfile::None);
        self.tabs
            .set_status_and_profile(tab, LookupStatus::DataReturned, profile)
            .await?;
        Ok(LookupOutcome::DataReturned)
    }

    /// User picked one candidate out of a disambiguation list. Fetches its
    /// profile and preserves the list so the presentation layer can go back.
    /// Any mismatch with the stored state is treated as a stale interaction.
    pub async fn select_candidate(
        &self,
        tab: TabId,
        slug: &str,
    ) -> Result<LookupOutcome, StoreError> {
        let Some(epoch) = self.tabs.domain(tab).await? else {
            return Ok(LookupOutcome::Stale);
        };
        let (status, profile) = self.tabs.status_and_profile(tab).await?;
        if status != Some(LookupStatus::MultipleResults) {
            debug!(%tab, %slug, ?status, "selection outside disambiguation");
            return Ok(LookupOutcome::Stale);
        }
        let Some(candidates) = profile.candidates().map(<[_]>::to_vec) else {
            return Ok(LookupOutcome::Stale);
        };
        if !candidates.iter().any(|candidate| candidate.slug == slug) {
            debug!(%tab, %slug, "selected slug not among stored candidates");
            return Ok(LookupOutcome::Stale);
        }

        let fetched = match self.api.fetch_profile(slug).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(%tab, %slug, error = %err, "profile fetch failed");
                if !self.still_current(tab, &epoch).await? {
                    return Ok(LookupOutcome::Stale);
                }
                return self.settle_no_data(tab).await;
            }
        };
        if !self.still_current(tab, &epoch).await? {
            return Ok(LookupOutcome::Stale);
        }

        self.tabs.set_last_results(tab, candidates).await?;
        let profile = fetched
            .map(StoredProfile::single)
            .unwrap_or(StoredProfile::None);
        self.tabs
            .set_status_and_profile(tab, LookupStatus::DataReturned, profile)
            .await?;
        Ok(LookupOutcome::DataReturned)
    }

    /// Returns from a selected profile back to the preserved candidate list.
    pub async fn restore_last_results(&self, tab: TabId) -> Result<LookupOutcome, StoreError> {
        let Some(epoch) = self.tabs.domain(tab).await? else {
            return Ok(LookupOutcome::Stale);
        };
        let Some(results) = self.tabs.last_results(tab).await? else {
            return Ok(LookupOutcome::Stale);
        };
        if results.is_empty() {
            return Ok(LookupOutcome::Stale);
        }
        if !self.still_current(tab, &epoch).await? {
            debug!(%tab, "restore superseded by navigation");
            return Ok(LookupOutcome::Stale);
        }
        self.tabs.clear_last_results(tab).await?;
        self.tabs
            .set_status_and_profile(
                tab,
                LookupStatus::MultipleResults,
                StoredProfile::Candidates(results),
            )
            .await?;
        Ok(LookupOutcome::MultipleResults)
    }
}
