//! Magnet URI construction and info-hash validation.

use once_cell::sync::Lazy;
use regex_lite::Regex;

static INFO_HASH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9a-fA-F]{40}$").expect("valid regex"));

/// Whether a value looks like a usable info hash: exactly 40 hex chars.
pub fn is_valid_info_hash(value: &str) -> bool {
    INFO_HASH_RE.is_match(value.trim())
}

/// Build a magnet URI from an info hash, display name and announce list.
///
/// Format: `magnet:?xt=urn:btih:<hash>&dn=<name>[&tr=<tracker>]*` with the
/// name and each tracker URL-escaped individually; trackers keep their
/// configured order and blank entries are skipped.
pub fn build_magnet(info_hash: &str, name: &str, trackers: &[String]) -> String {
    let mut params = Vec::with_capacity(2 + trackers.len());
    params.push(format!("xt=urn:btih:{}", info_hash));
    params.push(format!("dn={}", urlencoding::encode(name)));
    for tracker in trackers {
        if !tracker.is_empty() {
            params.push(format!("tr={}", urlencoding::encode(tracker)));
        }
    }
    format!("magnet:?{}", params.join("&"))
}
