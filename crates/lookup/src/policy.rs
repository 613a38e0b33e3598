use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::host_matches;

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse policy file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Lookup API endpoints and the fixed region qualifier sent with every
/// search request.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointPolicy {
    pub search_url: String,
    pub profile_url: String,
    pub region: String,
}

impl Default for EndpointPolicy {
    fn default() -> Self {
        Self {
            search_url: "https://api.sitelens.dev/v1/search".to_owned(),
            profile_url: "https://api.sitelens.dev/v1/profiles".to_owned(),
            region: "en-us".to_owned(),
        }
    }
}

/// Runtime policy for the lookup pipeline. The denylist names domain
/// suffixes that never get a network lookup; matches are equality or any
/// subdomain of a listed suffix.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupPolicy {
    pub endpoints: EndpointPolicy,
    pub denylist: Vec<String>,
}

impl Default for LookupPolicy {
    fn default() -> Self {
        Self {
            endpoints: EndpointPolicy::default(),
            // The provider's own pages never have a third-party profile.
            denylist: vec!["sitelens.dev".to_owned()],
        }
    }
}

impl LookupPolicy {
    pub fn is_denylisted(&self, domain: &str) -> bool {
        self.denylist
            .iter()
            .any(|suffix| host_matches(domain, suffix))
    }
}

/// Built-in policy used when no file is supplied.
pub fn default_policy() -> LookupPolicy {
    LookupPolicy::default()
}

/// Loads a policy from a YAML file. Missing fields fall back to defaults.
pub fn load_policy<P: AsRef<Path>>(path: P) -> Result<LookupPolicy, PolicyError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_usable() {
        let policy = default_policy();
        assert!(policy.endpoints.search_url.starts_with("https://"));
        assert!(!policy.denylist.is_empty());
    }

    #[test]
    fn denylist_covers_subdomains_case_insensitively() {
        let policy = LookupPolicy {
            denylist: vec!["tracker.example".to_owned()],
            ..Default::default()
        };
        assert!(policy.is_denylisted("tracker.example"));
        assert!(policy.is_denylisted("cdn.Tracker.Example"));
        assert!(!policy.is_denylisted("nottracker.example"));
        assert!(!policy.is_denylisted("acme.com"));
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "denylist:\n  - internal.acme\n").unwrap();
        let policy = load_policy(file.path()).expect("load policy");
        assert_eq!(policy.denylist, vec!["internal.acme".to_owned()]);
        assert_eq!(policy.endpoints.region, "en-us");
    }
}
