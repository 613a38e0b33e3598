use std::sync::Arc;

use sitelens_core_types::{
    BrowserEvent, IndicatorIcon, LookupStatus, NavigationEvent, StoredProfile, TabId,
};
use sitelens_state_store::{StoreError, TabStateStore};
use tracing::{debug, info, warn};

use crate::domain;
use crate::engine::LookupEngine;
use crate::policy::LookupPolicy;

/// Reacts to committed navigations and tab removals: clears state, applies
/// the denylist, and drives the lookup engine. A failed lookup is logged and
/// never takes the listener down.
pub struct NavigationCoordinator {
    tabs: Arc<TabStateStore>,
    engine: Arc<LookupEngine>,
    policy: LookupPolicy,
}

impl NavigationCoordinator {
    pub fn new(
        tabs: Arc<TabStateStore>,
        engine: Arc<LookupEngine>,
        policy: LookupPolicy,
    ) -> Arc<Self> {
        Arc::new(Self {
            tabs,
            engine,
            policy,
        })
    }

    /// Dispatches a raw browser event to the matching handler.
    pub async fn handle(&self, event: BrowserEvent) -> Result<(), StoreError> {
        match event {
            BrowserEvent::Committed {
                tab_id,
                url,
                frame_id,
            } => {
                self.on_committed(NavigationEvent {
                    tab_id,
                    url,
                    frame_id,
                })
                .await
            }
            BrowserEvent::TabRemoved { tab_id } => self.on_tab_removed(tab_id).await,
        }
    }

    pub async fn on_committed(&self, event: NavigationEvent) -> Result<(), StoreError> {
        if !event.is_top_frame() {
            return Ok(());
        }
        let tab = event.tab_id;

        let domain = match domain::resolve(&event.url) {
            Ok(domain) => domain,
            Err(err) => {
                debug!(%tab, url = %event.url, error = %err, "not a lookup target");
                self.tabs.clear(tab, false).await?;
                self.tabs.indicator().set_indicator(tab, IndicatorIcon::Idle);
                return Ok(());
            }
        };

        if self.policy.is_denylisted(&domain) {
            info!(%tab, %domain, "denylisted domain, skipping lookup");
            // The previous domain's state must not outlive the domain change.
            self.tabs.clear(tab, false).await?;
            self.tabs.set_domain(tab, &domain).await?;
            self.tabs
                .set_status_and_profile(tab, LookupStatus::NoData, StoredProfile::None)
                .await?;
            return Ok(());
        }

        let previous = self.tabs.domain(tab).await?;
        if previous.as_deref() != Some(domain.as_str()) {
            self.tabs.clear(tab, false).await?;
        }
        self.tabs.set_domain(tab, &domain).await?;

        match self.engine.run_lookup(tab, &domain).await {
            Ok(outcome) => debug!(%tab, %domain, ?outcome, "lookup finished"),
            Err(err) => warn!(%tab, %domain, error = %err, "lookup failed"),
        }
        Ok(())
    }

    /// The tab no longer exists: drop every key, touch no indicator.
    pub async fn on_tab_removed(&self, tab: TabId) -> Result<(), StoreError> {
        debug!(%tab, "tab removed, state dropped");
        self.tabs.clear(tab, false).await
    }
}
