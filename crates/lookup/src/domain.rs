use url::Url;

use crate::errors::ResolveError;

/// Resolves a page URL to the normalized domain used as the lookup key and
/// staleness token: hostname with a single leading `www.` label stripped.
/// Only `http` and `https` pages are lookup targets.
pub fn resolve(raw: &str) -> Result<String, ResolveError> {
    let parsed = Url::parse(raw)?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(ResolveError::UnsupportedScheme(other.to_owned())),
    }
    let host = parsed.host_str().ok_or(ResolveError::MissingHost)?;
    Ok(strip_www(host).to_owned())
}

fn strip_www(host: &str) -> &str {
    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest,
        _ => host,
    }
}

/// Whether a candidate's hostname actually belongs to the domain being
/// viewed: exact match or a strict subdomain, case-insensitively. Guards
/// against superficial matches like `evil-acme.com` for `acme.com`.
pub fn host_matches(candidate: &str, domain: &str) -> bool {
    if candidate.eq_ignore_ascii_case(domain) {
        return true;
    }
    let suffix = format!(".{}", domain.to_ascii_lowercase());
    candidate.to_ascii_lowercase().ends_with(&suffix)
}

/// Normalized hostname of a candidate's URL, if it has one.
pub fn candidate_host(candidate_url: &str) -> Option<String> {
    resolve(candidate_url).ok()
}
