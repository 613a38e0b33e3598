use dashmap::DashMap;
use sitelens_core_types::{IndicatorIcon, TabId};
use tracing::debug;

/// Fire-and-forget visual indicator seam. The host environment renders the
/// icon; nothing here observes a return value.
pub trait IndicatorPort: Send + Sync {
    fn set_indicator(&self, tab: TabId, icon: IndicatorIcon);
}

/// Default implementation: logs the transition and nothing else.
pub struct TracingIndicator;

impl IndicatorPort for TracingIndicator {
    fn set_indicator(&self, tab: TabId, icon: IndicatorIcon) {
        debug!(%tab, ?icon, "indicator updated");
    }
}

/// No-op indicator for benchmarks and wiring that has no visual surface.
pub struct NoopIndicator;

impl IndicatorPort for NoopIndicator {
    fn set_indicator(&self, _tab: TabId, _icon: IndicatorIcon) {}
}

/// Records the latest icon per tab; used by tests to assert the indicator
/// never lags behind an observable status.
#[derive(Default)]
pub struct RecordingIndicator {
    latest: DashMap<TabId, IndicatorIcon>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latest(&self, tab: TabId) -> Option<IndicatorIcon> {
        self.latest.get(&tab).map(|entry| *entry.value())
    }
}

impl IndicatorPort for RecordingIndicator {
    fn set_indicator(&self, tab: TabId, icon: IndicatorIcon) {
        self.latest.insert(tab, icon);
    }
}
