use std::sync::Arc;

use sitelens_event_bus::InMemoryBus;
use sitelens_lookup::{
    HttpProfileApi, LookupEngine, LookupPolicy, NavigationCoordinator, ProfileApi,
};
use sitelens_state_store::{
    IndicatorPort, KeyValueStore, MemoryStore, TabStateEvent, TabStateStore, TracingIndicator,
};
use tokio::sync::broadcast;

/// Wires the full lookup stack: store, indicator, event bus, API client,
/// engine, and coordinator.
pub struct AppContext {
    store: Arc<MemoryStore>,
    tabs: Arc<TabStateStore>,
    engine: Arc<LookupEngine>,
    coordinator: Arc<NavigationCoordinator>,
}

impl AppContext {
    /// Production wiring: HTTP client against the configured endpoints.
    pub fn new(policy: LookupPolicy) -> Self {
        let api: Arc<dyn ProfileApi> = Arc::new(HttpProfileApi::new(policy.endpoints.clone()));
        Self::with_api(policy, api)
    }

    /// Same wiring with a caller-supplied API, used by tests and simulation.
    pub fn with_api(policy: LookupPolicy, api: Arc<dyn ProfileApi>) -> Self {
        let store = MemoryStore::new(256);
        let indicator: Arc<dyn IndicatorPort> = Arc::new(TracingIndicator);
        let tabs = TabStateStore::new(
            Arc::clone(&store) as Arc<dyn KeyValueStore>,
            indicator,
            InMemoryBus::new(256),
        );
        let engine = LookupEngine::new(Arc::clone(&tabs), api);
        let coordinator = NavigationCoordinator::new(Arc::clone(&tabs), Arc::clone(&engine), policy);
        Self {
            store,
            tabs,
            engine,
            coordinator,
        }
    }

    pub fn store(&self) -> &Arc<MemoryStore> {
        &self.store
    }

    pub fn tabs(&self) -> &Arc<TabStateStore> {
        &self.tabs
    }

    pub fn engine(&self) -> &Arc<LookupEngine> {
        &self.engine
    }

    pub fn coordinator(&self) -> &Arc<NavigationCoordinator> {
        &self.coordinator
    }

    /// Presentation seam: state-change notifications for rendering.
    pub fn subscribe(&self) -> broadcast::Receiver<TabStateEvent> {
        self.tabs.subscribe()
    }
}
