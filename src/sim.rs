//! Replays a JSONL stream of browser events through the coordinator and
//! reports the resulting per-tab states.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use sitelens_core_types::{BrowserEvent, LookupStatus, StoredProfile, TabId};

use crate::app_context::AppContext;

/// Final state of one tab after a replay.
#[derive(Debug, Serialize)]
pub struct TabReport {
    pub tab_id: i64,
    pub domain: Option<String>,
    pub status: Option<LookupStatus>,
    pub profile: StoredProfile,
}

/// Parses one browser event per line, skipping blanks.
pub fn read_events(path: &Path) -> Result<Vec<BrowserEvent>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read events file {}", path.display()))?;
    let mut events = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event: BrowserEvent = serde_json::from_str(line)
            .with_context(|| format!("invalid event on line {}", index + 1))?;
        events.push(event);
    }
    Ok(events)
}

/// Runs every event in order and returns a report for each tab seen.
pub async fn replay(context: &AppContext, events: Vec<BrowserEvent>) -> Result<Vec<TabReport>> {
    let mut seen: BTreeSet<i64> = BTreeSet::new();
    for event in events {
        match &event {
            BrowserEvent::Committed { tab_id, .. } | BrowserEvent::TabRemoved { tab_id } => {
                seen.insert(tab_id.0);
            }
        }
        context.coordinator().handle(event).await?;
    }

    let mut reports = Vec::with_capacity(seen.len());
    for id in seen {
        let tab = TabId(id);
        let domain = context.tabs().domain(tab).await?;
        let (status, profile) = context.tabs().status_and_profile(tab).await?;
        reports.push(TabReport {
            tab_id: id,
            domain,
            status,
            profile,
        });
    }
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_events_and_skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            r#"{{"kind": "committed", "tab_id": 1, "url": "https://acme.com/", "frame_id": 0}}"#
        )
        .unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"kind": "tab_removed", "tab_id": 1}}"#).unwrap();

        let events = read_events(file.path()).expect("parse events");
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], BrowserEvent::TabRemoved { .. }));
    }

    #[test]
    fn rejects_malformed_lines_with_position() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "not json").unwrap();
        let err = read_events(file.path()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }
}
