//! JSON snapshot file written by the non-served `fetch` command.

use anyhow::{Context, Result};
use std::path::Path;
use vigil_common::AdvisoryRecord;

/// Overwrite `path` with an indented JSON array of `records`.
pub fn write_snapshot(path: &Path, records: &[AdvisoryRecord]) -> Result<()> {
    let body = serde_json::to_string_pretty(records).context("failed to serialize records")?;
    std::fs::write(path, body)
        .with_context(|| format!("failed to write snapshot to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(title: &str, date: &str) -> AdvisoryRecord {
        AdvisoryRecord {
            title: title.to_string(),
            date: date.to_string(),
            source: "NDMA Pakistan".to_string(),
        }
    }

    #[test]
    fn snapshot_round_trips_every_record() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("advisories.json");
        let records = vec![
            record("Flood Warning Issued for X", "12 Jan 2024"),
            record("Cyclone Alert for Coastal Areas", "13 Jan 2024"),
            record("GLOF Risk Advisory for Gilgit", "14 Jan 2024"),
        ];

        write_snapshot(&path, &records).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<AdvisoryRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed, records);
        // Indented output, not a single line.
        assert!(raw.contains("\n  "));
    }

    #[test]
    fn snapshot_overwrites_previous_runs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("advisories.json");

        write_snapshot(
            &path,
            &[
                record("Flood Warning Issued for X", "12 Jan 2024"),
                record("Cyclone Alert for Coastal Areas", "13 Jan 2024"),
            ],
        )
        .unwrap();
        write_snapshot(&path, &[record("GLOF Risk Advisory for Gilgit", "14 Jan 2024")])
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<AdvisoryRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].title, "GLOF Risk Advisory for Gilgit");
    }

    #[test]
    fn empty_extraction_writes_an_empty_array() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("advisories.json");

        write_snapshot(&path, &[]).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.trim(), "[]");
    }
}
