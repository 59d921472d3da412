use crate::error::ExtractError;
use crate::pairing::{pair_fragments, FRAGMENT_XPATH, READY_LINK_TEXT};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, warn};
use vigil_common::AdvisoryRecord;
use vigil_drivers::driver::VigilDriver;
use vigil_drivers::page::WaitOutcome;
use vigil_drivers::profile::BrowserProfile;

/// Anything able to produce the current advisory listing.
///
/// The serving shell programs against this seam so handlers and the sync
/// scheduler can be exercised with a stub instead of a live browser.
#[async_trait]
pub trait AdvisoryExtractor: Send + Sync {
    async fn extract(&self) -> Result<Vec<AdvisoryRecord>, ExtractError>;
}

/// Extraction settings; mirrors the `source` and `browser` config sections.
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    pub url: String,
    pub source_label: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub ready_timeout: Duration,
}

/// fantoccini-backed extractor for the advisories page.
pub struct PageExtractor {
    config: ExtractorConfig,
    profile: BrowserProfile,
}

impl PageExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            config,
            profile: BrowserProfile::default(),
        }
    }

    async fn run(&self, driver: &mut VigilDriver) -> Result<Vec<AdvisoryRecord>, ExtractError> {
        let page = driver
            .goto(&self.config.url)
            .await
            .map_err(|e| ExtractError::Navigation {
                url: self.config.url.clone(),
                message: e.to_string(),
            })?;

        match page
            .wait_for_partial_link_text(READY_LINK_TEXT, self.config.ready_timeout)
            .await
        {
            Ok(WaitOutcome::Ready) => {}
            Ok(WaitOutcome::TimedOut) => {
                return Err(ExtractError::ReadinessTimeout {
                    waited_secs: self.config.ready_timeout.as_secs(),
                })
            }
            Err(e) => return Err(ExtractError::Query(e.to_string())),
        }

        let fragments = page
            .harvest_text(FRAGMENT_XPATH)
            .await
            .map_err(|e| ExtractError::Query(e.to_string()))?;
        info!(
            target: "extract",
            fragments = fragments.len(),
            "extract.page_harvested"
        );

        Ok(pair_fragments(&fragments, &self.config.source_label))
    }
}

#[async_trait]
impl AdvisoryExtractor for PageExtractor {
    async fn extract(&self) -> Result<Vec<AdvisoryRecord>, ExtractError> {
        info!(target: "extract", url = %self.config.url, "extract.start");
        let mut driver =
            VigilDriver::connect(&self.config.webdriver_url, self.config.headless, &self.profile)
                .await
                .map_err(|e| ExtractError::Session(e.to_string()))?;

        let result = self.run(&mut driver).await;

        // The session comes down on every path, success or failure.
        if let Err(close_err) = driver.close().await {
            warn!(
                target: "extract",
                error = %close_err,
                "extract.session_close_failed"
            );
        }

        match &result {
            Ok(records) => info!(
                target: "extract",
                records = records.len(),
                "extract.complete"
            ),
            Err(err) => warn!(target: "extract", error = %err, "extract.failed"),
        }
        result
    }
}
