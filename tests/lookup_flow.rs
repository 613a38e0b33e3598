//! End-to-end flow: browser events through the coordinator, state observed
//! via the typed store and the presentation event bus.

use std::sync::Arc;

use anyhow::Result;
use sitelens_cli::app_context::AppContext;
use sitelens_core_types::{BrowserEvent, LookupStatus, NavigationEvent, TabId};
use sitelens_lookup::testing::{record, summary, ScriptedApi};
use sitelens_lookup::{LookupPolicy, ProfileApi};

fn context_with_mock() -> (AppContext, Arc<ScriptedApi>) {
    let api = ScriptedApi::new();
    let context = AppContext::with_api(
        LookupPolicy::default(),
        Arc::clone(&api) as Arc<dyn ProfileApi>,
    );
    (context, api)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn navigation_to_profile_end_to_end() -> Result<()> {
    let (context, api) = context_with_mock();
    let tab = TabId(42);
    let mut events = context.subscribe();

    api.queue_search(vec![summary("Acme", "https://acme.com", "acme")]);
    api.add_profile(record("Acme", "https://acme.com", "acme"));

    context
        .coordinator()
        .on_committed(NavigationEvent::top_frame(tab, "https://www.acme.com/"))
        .await?;

    // Presentation subscribers see searching first, then the resolved pair.
    let first = events.recv().await?;
    assert_eq!(first.status, LookupStatus::Searching);
    let mut last = events.recv().await?;
    while let Ok(next) = events.try_recv() {
        last = next;
    }
    assert_eq!(last.tab, tab);
    assert_eq!(last.status, LookupStatus::DataReturned);
    assert_eq!(last.profile.record().map(|r| r.slug.as_str()), Some("acme"));

    let (status, profile) = context.tabs().status_and_profile(tab).await?;
    assert_eq!(status, Some(LookupStatus::DataReturned));
    assert_eq!(profile.record().map(|r| r.name.as_str()), Some("Acme"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disambiguation_select_and_back() -> Result<()> {
    let (context, api) = context_with_mock();
    let tab = TabId(7);

    api.queue_search(vec![
        summary("Acme", "https://acme.com", "acme"),
        summary("Acme Shop", "https://shop.acme.com", "acme-shop"),
    ]);
    api.add_profile(record("Acme Shop", "https://shop.acme.com", "acme-shop"));

    context
        .coordinator()
        .on_committed(NavigationEvent::top_frame(tab, "https://acme.com/"))
        .await?;
    let (status, profile) = context.tabs().status_and_profile(tab).await?;
    assert_eq!(status, Some(LookupStatus::MultipleResults));
    assert_eq!(profile.candidates().map(<[_]>::len), Some(2));

    context.engine().select_candidate(tab, "acme-shop").await?;
    let (status, profile) = context.tabs().status_and_profile(tab).await?;
    assert_eq!(status, Some(LookupStatus::DataReturned));
    assert_eq!(
        profile.record().map(|r| r.slug.as_str()),
        Some("acme-shop")
    );

    context.engine().restore_last_results(tab).await?;
    let (status, profile) = context.tabs().status_and_profile(tab).await?;
    assert_eq!(status, Some(LookupStatus::MultipleResults));
    assert_eq!(profile.candidates().map(<[_]>::len), Some(2));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn tab_lifecycle_leaves_nothing_behind() -> Result<()> {
    let (context, api) = context_with_mock();
    let tab = TabId(3);

    api.queue_search(vec![summary("Acme", "https://acme.com", "acme")]);
    api.add_profile(record("Acme", "https://acme.com", "acme"));

    context
        .coordinator()
        .handle(BrowserEvent::Committed {
            tab_id: tab,
            url: "https://acme.com/".into(),
            frame_id: 0,
        })
        .await?;
    assert!(!context.store().is_empty());

    context
        .coordinator()
        .handle(BrowserEvent::TabRemoved { tab_id: tab })
        .await?;
    assert!(context.store().is_empty());

    // Internal page in a fresh tab with the same id stays idle.
    context
        .coordinator()
        .on_committed(NavigationEvent::top_frame(tab, "about:blank"))
        .await?;
    assert_eq!(context.tabs().status(tab).await?, None);
    Ok(())
}
