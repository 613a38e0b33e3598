//! Scripted API double for tests and offline simulation.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sitelens_core_types::{ProfileRecord, ProfileSummary};
use tokio::sync::Notify;

use crate::client::ProfileApi;
use crate::errors::LookupError;

#[derive(Clone, Debug)]
pub enum ScriptedSearch {
    Results(Vec<ProfileSummary>),
    Fail(String),
}

/// Replays queued search responses and serves profiles by slug. An optional
/// gate lets a test hold a search open to interleave navigations against an
/// in-flight lookup.
#[derive(Default)]
pub struct ScriptedApi {
    searches: Mutex<VecDeque<ScriptedSearch>>,
    profiles: Mutex<HashMap<String, ProfileRecord>>,
    gate: Mutex<Option<Arc<Notify>>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn queue_search(&self, results: Vec<ProfileSummary>) {
        self.searches
            .lock()
            .push_back(ScriptedSearch::Results(results));
    }

    pub fn queue_search_failure(&self, message: impl Into<String>) {
        self.searches
            .lock()
            .push_back(ScriptedSearch::Fail(message.into()));
    }

    pub fn add_profile(&self, record: ProfileRecord) {
        self.profiles.lock().insert(record.slug.clone(), record);
    }

    /// Makes the next search wait until the returned handle is notified.
    pub fn gate_next_search(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProfileApi for ScriptedApi {
    async fn search(&self, _domain: &str) -> Result<Vec<ProfileSummary>, LookupError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        match self.searches.lock().pop_front() {
            Some(ScriptedSearch::Results(results)) => Ok(results),
            Some(ScriptedSearch::Fail(message)) => Err(LookupError::MalformedResponse(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_profile(&self, slug: &str) -> Result<Option<ProfileRecord>, LookupError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.profiles.lock().get(slug).cloned())
    }
}

/// Candidate summary helper used across tests.
pub fn summary(name: &str, url: &str, slug: &str) -> ProfileSummary {
    ProfileSummary {
        name: name.to_owned(),
        url: url.to_owned(),
        slug: slug.to_owned(),
    }
}

/// Full record helper used across tests.
pub fn record(name: &str, url: &str, slug: &str) -> ProfileRecord {
    ProfileRecord {
        name: name.to_owned(),
        logo: String::new(),
        description: format!("<p>{name}</p>"),
        rating: 4.2,
        total_reviews: 128,
        is_verified: true,
        categories: Vec::new(),
        slug: slug.to_owned(),
        url: url.to_owned(),
    }
}
