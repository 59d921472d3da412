use async_trait::async_trait;
use vigil_common::AdvisoryRecord;
use vigil_extract::{AdvisoryExtractor, ExtractError};

/// Extractor returning a canned record list.
pub struct FixedExtractor {
    pub records: Vec<AdvisoryRecord>,
}

#[async_trait]
impl AdvisoryExtractor for FixedExtractor {
    async fn extract(&self) -> Result<Vec<AdvisoryRecord>, ExtractError> {
        Ok(self.records.clone())
    }
}

/// Extractor that always times out waiting for the readiness signal.
pub struct TimedOutExtractor;

#[async_trait]
impl AdvisoryExtractor for TimedOutExtractor {
    async fn extract(&self) -> Result<Vec<AdvisoryRecord>, ExtractError> {
        Err(ExtractError::ReadinessTimeout { waited_secs: 20 })
    }
}

pub fn record(title: &str, date: &str) -> AdvisoryRecord {
    AdvisoryRecord {
        title: title.to_string(),
        date: date.to_string(),
        source: "NDMA Pakistan".to_string(),
    }
}
