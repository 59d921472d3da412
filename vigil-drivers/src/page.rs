use anyhow::Result;
use fantoccini::{error::CmdError, Client, Locator};
use std::time::Duration;
use tracing::debug;

/// Outcome of a bounded readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Ready,
    TimedOut,
}

/// High-level page wrapper providing the queries an extraction needs.
pub struct VigilPage {
    pub(crate) client: Client,
}

impl VigilPage {
    /// Construct a page wrapper around an existing WebDriver client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate the session to `url`.
    pub async fn goto(&mut self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)?;
        Ok(())
    }

    /// Block until an anchor whose visible text contains `needle` is
    /// present, bounded by `timeout`. A timeout is an expected outcome,
    /// not an error; other WebDriver failures propagate.
    pub async fn wait_for_partial_link_text(
        &self,
        needle: &str,
        timeout: Duration,
    ) -> Result<WaitOutcome> {
        let xpath = format!("//a[contains(., '{needle}')]");
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::XPath(&xpath))
            .await
        {
            Ok(_) => Ok(WaitOutcome::Ready),
            Err(CmdError::WaitTimeout) => Ok(WaitOutcome::TimedOut),
            Err(e) => Err(e.into()),
        }
    }

    /// Find every node matching `xpath` and return its trimmed visible
    /// text, empty results discarded, in document order.
    pub async fn harvest_text(&self, xpath: &str) -> Result<Vec<String>> {
        let elements = self.client.find_all(Locator::XPath(xpath)).await?;
        debug!(
            target: "browser.page",
            matched = elements.len(),
            "page.harvest.matched"
        );

        let mut fragments = Vec::with_capacity(elements.len());
        for element in elements {
            let text = element.text().await?;
            let text = text.trim();
            if !text.is_empty() {
                fragments.push(text.to_string());
            }
        }
        Ok(fragments)
    }
}
