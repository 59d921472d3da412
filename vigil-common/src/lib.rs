//! Shared types and utilities for the Vigil workspace.
//!
//! This crate holds the advisory record every other crate passes around,
//! the content-hash identifier used for store-side deduplication, and the
//! centralised tracing setup in [`observability`]. It is intentionally
//! lightweight so that all crates can depend on it without heavy
//! transitive costs.
//!
//! # Overview
//!
//! - [`AdvisoryRecord`]: a single scraped advisory
//! - [`alert_id`]: deterministic store identifier for an advisory title
//! - [`observability`]: centralised tracing/logging initialisation
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

pub mod observability;

/// Source label attached to records when configuration does not override it.
pub const DEFAULT_SOURCE_LABEL: &str = "NDMA Pakistan";

const ALERT_ID_PREFIX: &str = "alert_";
const ALERT_ID_HEX_LEN: usize = 12;

/// A single advisory scraped from the source page.
///
/// Records are built fresh on every extraction and never mutated; the
/// remote store is the only persistent home for a record's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvisoryRecord {
    pub title: String,
    pub date: String,
    pub source: String,
}

impl AdvisoryRecord {
    /// Store document id for this record; see [`alert_id`].
    pub fn alert_id(&self) -> String {
        alert_id(&self.title)
    }
}

/// Derive the store document id for an advisory title.
///
/// MD5 over the trimmed title, truncated to twelve hex characters and
/// prefixed with `alert_`. The date is deliberately not part of the
/// digest: a re-published advisory with the same title collapses onto the
/// document already stored for it.
pub fn alert_id(title: &str) -> String {
    let digest = Md5::digest(title.trim().as_bytes());
    let hex = hex::encode(digest);
    format!("{}{}", ALERT_ID_PREFIX, &hex[..ALERT_ID_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_id_is_deterministic() {
        let a = alert_id("Flood Warning Issued for X");
        let b = alert_id("Flood Warning Issued for X");
        assert_eq!(a, b);
    }

    #[test]
    fn alert_id_known_vector() {
        // md5("abc") = 900150983cd24fb0d6963f7d28e17f72
        assert_eq!(alert_id("abc"), "alert_900150983cd2");
    }

    #[test]
    fn alert_id_format() {
        let id = alert_id("Heavy Rainfall Expected in Sindh");
        assert!(id.starts_with("alert_"));
        assert_eq!(id.len(), "alert_".len() + 12);
        assert!(id["alert_".len()..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn alert_id_ignores_surrounding_whitespace() {
        assert_eq!(alert_id("  GLOF Alert  "), alert_id("GLOF Alert"));
    }

    #[test]
    fn distinct_titles_get_distinct_ids() {
        assert_ne!(
            alert_id("Flood Warning Issued for X"),
            alert_id("Flood Warning Issued for Y")
        );
    }

    #[test]
    fn record_serializes_with_plain_field_names() {
        let record = AdvisoryRecord {
            title: "Flood Warning Issued for X".into(),
            date: "12 Jan 2024".into(),
            source: DEFAULT_SOURCE_LABEL.into(),
        };
        let v = serde_json::to_value(&record).unwrap();
        assert_eq!(v["title"], "Flood Warning Issued for X");
        assert_eq!(v["date"], "12 Jan 2024");
        assert_eq!(v["source"], "NDMA Pakistan");
    }
}
