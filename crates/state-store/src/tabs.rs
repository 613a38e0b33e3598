use std::sync::Arc;

use serde_json::Value;
use sitelens_core_types::{indicator_for, LookupStatus, ProfileSummary, StoredProfile, TabId};
use sitelens_event_bus::InMemoryBus;
use tokio::sync::broadcast;
use tracing::trace;

use crate::api::{KeyValueStore, WriteBatch};
use crate::errors::StoreError;
use crate::indicator::IndicatorPort;

/// Published whenever a tab's status/profile pair changes.
#[derive(Clone, Debug)]
pub struct TabStateEvent {
    pub tab: TabId,
    pub status: LookupStatus,
    pub profile: StoredProfile,
}

fn domain_key(tab: TabId) -> String {
    format!("domain_{}", tab.0)
}

fn status_key(tab: TabId) -> String {
    format!("status_{}", tab.0)
}

fn profile_key(tab: TabId) -> String {
    format!("profile_{}", tab.0)
}

fn last_results_key(tab: TabId) -> String {
    format!("last_results_{}", tab.0)
}

/// Typed repository over the key-value seam, scoping every field by tab id.
///
/// The status/profile pair is always written as one batch, the indicator is
/// driven synchronously with every status write, and each pair write is
/// republished on the event bus for presentation subscribers.
pub struct TabStateStore {
    kv: Arc<dyn KeyValueStore>,
    indicator: Arc<dyn IndicatorPort>,
    bus: Arc<InMemoryBus<TabStateEvent>>,
}

impl TabStateStore {
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        indicator: Arc<dyn IndicatorPort>,
        bus: Arc<InMemoryBus<TabStateEvent>>,
    ) -> Arc<Self> {
        Arc::new(Self { kv, indicator, bus })
    }

    pub fn indicator(&self) -> &Arc<dyn IndicatorPort> {
        &self.indicator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TabStateEvent> {
        self.bus.subscribe()
    }

    pub async fn domain(&self, tab: TabId) -> Result<Option<String>, StoreError> {
        let value = self.kv.get(&domain_key(tab)).await?;
        Ok(value.as_ref().and_then(Value::as_str).map(str::to_owned))
    }

    pub async fn set_domain(&self, tab: TabId, domain: &str) -> Result<(), StoreError> {
        trace!(%tab, %domain, "domain recorded");
        self.kv
            .apply(WriteBatch::new().put(domain_key(tab), Value::String(domain.to_owned())))
            .await
    }

    pub async fn status(&self, tab: TabId) -> Result<Option<LookupStatus>, StoreError> {
        match self.kv.get(&status_key(tab)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn status_and_profile(
        &self,
        tab: TabId,
    ) -> Result<(Option<LookupStatus>, StoredProfile), StoreError> {
        let status = self.status(tab).await?;
        let profile = match self.kv.get(&profile_key(tab)).await? {
            Some(value) => serde_json::from_value(value)?,
            None => StoredProfile::None,
        };
        Ok((status, profile))
    }

    /// Writes the pair atomically, drives the indicator, and publishes the
    /// change. Readers can never see a status without its matching profile.
    pub async fn set_status_and_profile(
        &self,
        tab: TabId,
        status: LookupStatus,
        profile: StoredProfile,
    ) -> Result<(), StoreError> {
        let batch = WriteBatch::new()
            .put(status_key(tab), serde_json::to_value(status)?)
            .put(profile_key(tab), serde_json::to_value(&profile)?);
        self.kv.apply(batch).await?;
        self.indicator
            .set_indicator(tab, indicator_for(Some(status)));
        let _ = self.bus.publish(TabStateEvent {
            tab,
            status,
            profile,
        });
        Ok(())
    }

    pub async fn last_results(
        &self,
        tab: TabId,
    ) -> Result<Option<Vec<ProfileSummary>>, StoreError> {
        match self.kv.get(&last_results_key(tab)).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn set_last_results(
        &self,
        tab: TabId,
        results: Vec<ProfileSummary>,
    ) -> Result<(), StoreError> {
        self.kv
            .apply(WriteBatch::new().put(last_results_key(tab), serde_json::to_value(results)?))
            .await
    }

    pub async fn clear_last_results(&self, tab: TabId) -> Result<(), StoreError> {
        self.kv
            .apply(WriteBatch::new().delete(last_results_key(tab)))
            .await
    }

    /// Removes profile, status, and last-results keys; the domain key goes too
    /// unless `keep_domain` is set. Indicator handling is the caller's call:
    /// a navigation clear wants the idle icon, a closed tab wants nothing.
    pub async fn clear(&self, tab: TabId, keep_domain: bool) -> Result<(), StoreError> {
        let mut batch = WriteBatch::new()
            .delete(status_key(tab))
            .delete(profile_key(tab))
            .delete(last_results_key(tab));
        if !keep_domain {
            batch = batch.delete(domain_key(tab));
        }
        self.kv.apply(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::RecordingIndicator;
    use crate::memory::MemoryStore;
    use sitelens_core_types::IndicatorIcon;

    fn summaries() -> Vec<ProfileSummary> {
        vec![
            ProfileSummary {
                name: "Acme".into(),
                url: "https://acme.com".into(),
                slug: "acme".into(),
            },
            ProfileSummary {
                name: "Acme Shop".into(),
                url: "https://shop.acme.com".into(),
                slug: "acme-shop".into(),
            },
        ]
    }

    fn build() -> (Arc<MemoryStore>, Arc<RecordingIndicator>, Arc<TabStateStore>) {
        let store = MemoryStore::new(32);
        let indicator = Arc::new(RecordingIndicator::new());
        let tabs = TabStateStore::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            Arc::clone(&indicator) as Arc<dyn IndicatorPort>,
            InMemoryBus::new(32),
        );
        (store, indicator, tabs)
    }

    #[tokio::test]
    async fn keys_are_namespaced_per_tab() {
        let (store, _, tabs) = build();
        let tab = TabId(12);

        tabs.set_domain(tab, "acme.com").await.unwrap();
        tabs.set_status_and_profile(tab, LookupStatus::Searching, StoredProfile::None)
            .await
            .unwrap();
        tabs.set_last_results(tab, summaries()).await.unwrap();

        for key in ["domain_12", "status_12", "profile_12", "last_results_12"] {
            assert!(store.contains_key(key), "missing {key}");
        }
    }

    #[tokio::test]
    async fn status_write_drives_indicator_and_bus() {
        let (_, indicator, tabs) = build();
        let tab = TabId(3);
        let mut events = tabs.subscribe();

        tabs.set_status_and_profile(tab, LookupStatus::Searching, StoredProfile::None)
            .await
            .unwrap();
        assert_eq!(indicator.latest(tab), Some(IndicatorIcon::Searching));

        let event = events.recv().await.unwrap();
        assert_eq!(event.tab, tab);
        assert_eq!(event.status, LookupStatus::Searching);
        assert!(event.profile.is_none());
    }

    #[tokio::test]
    async fn pair_reads_back_consistently() {
        let (_, _, tabs) = build();
        let tab = TabId(5);

        tabs.set_status_and_profile(
            tab,
            LookupStatus::MultipleResults,
            StoredProfile::Candidates(summaries()),
        )
        .await
        .unwrap();

        let (status, profile) = tabs.status_and_profile(tab).await.unwrap();
        assert_eq!(status, Some(LookupStatus::MultipleResults));
        assert_eq!(profile.candidates().map(<[_]>::len), Some(2));
    }

    #[tokio::test]
    async fn clear_can_keep_the_domain() {
        let (store, _, tabs) = build();
        let tab = TabId(7);

        tabs.set_domain(tab, "acme.com").await.unwrap();
        tabs.set_status_and_profile(tab, LookupStatus::NoData, StoredProfile::None)
            .await
            .unwrap();
        tabs.set_last_results(tab, summaries()).await.unwrap();

        tabs.clear(tab, true).await.unwrap();
        assert_eq!(tabs.domain(tab).await.unwrap().as_deref(), Some("acme.com"));
        assert_eq!(tabs.status(tab).await.unwrap(), None);
        assert_eq!(tabs.last_results(tab).await.unwrap(), None);

        tabs.clear(tab, false).await.unwrap();
        assert_eq!(tabs.domain(tab).await.unwrap(), None);
        assert!(store.is_empty());
    }
}
