use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a browser tab, as reported by the host browser.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tab:{}", self.0)
    }
}

/// Frame identifier used by navigation events. Only the top frame drives lookups.
pub const TOP_FRAME: i64 = 0;

/// Lookup lifecycle of a single tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    Initializing,
    Idle,
    Searching,
    Success,
    MultipleResults,
    DataReturned,
    NoData,
}

impl LookupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initializing => "initializing",
            Self::Idle => "idle",
            Self::Searching => "searching",
            Self::Success => "success",
            Self::MultipleResults => "multiple_results",
            Self::DataReturned => "data_returned",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for LookupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal candidate info returned by the search step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub url: String,
    pub slug: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Full company profile fetched by slug. `description` may carry HTML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub total_reviews: u64,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
    pub slug: String,
    pub url: String,
}

/// Value stored under the per-tab profile key: a candidate array while
/// disambiguating, a single resolved record, or null.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredProfile {
    Candidates(Vec<ProfileSummary>),
    Single(Box<ProfileRecord>),
    #[default]
    None,
}

impl StoredProfile {
    pub fn single(record: ProfileRecord) -> Self {
        Self::Single(Box::new(record))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn candidates(&self) -> Option<&[ProfileSummary]> {
        match self {
            Self::Candidates(list) => Some(list),
            _ => None,
        }
    }

    pub fn record(&self) -> Option<&ProfileRecord> {
        match self {
            Self::Single(record) => Some(record),
            _ => None,
        }
    }
}

/// Committed top-level navigation as delivered by the host browser.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationEvent {
    pub tab_id: TabId,
    pub url: String,
    pub frame_id: i64,
}

impl NavigationEvent {
    pub fn top_frame(tab_id: TabId, url: impl Into<String>) -> Self {
        Self {
            tab_id,
            url: url.into(),
            frame_id: TOP_FRAME,
        }
    }

    pub fn is_top_frame(&self) -> bool {
        self.frame_id == TOP_FRAME
    }
}

/// Browser events consumed by the coordinator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BrowserEvent {
    Committed {
        tab_id: TabId,
        url: String,
        frame_id: i64,
    },
    TabRemoved {
        tab_id: TabId,
    },
}

/// Visual indicator shown next to a tab.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorIcon {
    Idle,
    Searching,
    Success,
    NoData,
}

/// Maps a stored status (or its absence) to the icon the host should show.
/// Anything unknown or unset falls back to the idle icon.
pub fn indicator_for(status: Option<LookupStatus>) -> IndicatorIcon {
    match status {
        Some(LookupStatus::Searching) => IndicatorIcon::Searching,
        Some(LookupStatus::Success)
        | Some(LookupStatus::MultipleResults)
        | Some(LookupStatus::DataReturned) => IndicatorIcon::Success,
        Some(LookupStatus::NoData) => IndicatorIcon::NoData,
        _ => IndicatorIcon::Idle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_as_snake_case() {
        let value = serde_json::to_value(LookupStatus::MultipleResults).unwrap();
        assert_eq!(value, json!("multiple_results"));
        let back: LookupStatus = serde_json::from_value(json!("data_returned")).unwrap();
        assert_eq!(back, LookupStatus::DataReturned);
    }

    #[test]
    fn stored_profile_shapes() {
        let empty = serde_json::to_value(StoredProfile::None).unwrap();
        assert!(empty.is_null());

        let candidates = StoredProfile::Candidates(vec![ProfileSummary {
            name: "Acme".into(),
            url: "https://acme.com".into(),
            slug: "acme".into(),
        }]);
        assert!(serde_json::to_value(&candidates).unwrap().is_array());

        let raw = json!({
            "name": "Acme",
            "slug": "acme",
            "url": "https://acme.com",
            "rating": 4.5,
            "total_reviews": 12,
            "is_verified": true
        });
        let parsed: StoredProfile = serde_json::from_value(raw).unwrap();
        let record = parsed.record().expect("single record");
        assert_eq!(record.rating, 4.5);
        assert!(record.categories.is_empty());
    }

    #[test]
    fn null_round_trips_to_none() {
        let parsed: StoredProfile = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn indicator_mapping() {
        assert_eq!(indicator_for(None), IndicatorIcon::Idle);
        assert_eq!(
            indicator_for(Some(LookupStatus::Initializing)),
            IndicatorIcon::Idle
        );
        assert_eq!(indicator_for(Some(LookupStatus::Idle)), IndicatorIcon::Idle);
        assert_eq!(
            indicator_for(Some(LookupStatus::Searching)),
            IndicatorIcon::Searching
        );
        assert_eq!(
            indicator_for(Some(LookupStatus::Success)),
            IndicatorIcon::Success
        );
        assert_eq!(
            indicator_for(Some(LookupStatus::MultipleResults)),
            IndicatorIcon::Success
        );
        assert_eq!(
            indicator_for(Some(LookupStatus::DataReturned)),
            IndicatorIcon::Success
        );
        assert_eq!(
            indicator_for(Some(LookupStatus::NoData)),
            IndicatorIcon::NoData
        );
    }

    #[test]
    fn browser_event_wire_shape() {
        let event: BrowserEvent = serde_json::from_value(json!({
            "kind": "committed",
            "tab_id": 7,
            "url": "https://example.com/",
            "frame_id": 0
        }))
        .unwrap();
        assert_eq!(
            event,
            BrowserEvent::Committed {
                tab_id: TabId(7),
                url: "https://example.com/".into(),
                frame_id: 0
            }
        );
    }
}
