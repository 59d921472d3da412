use crate::page::VigilPage;
use crate::profile::{browser_arguments, BrowserProfile};
use anyhow::Result;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use std::collections::HashMap;
use webdriver::capabilities::Capabilities;

/// Thin wrapper around a `fantoccini` WebDriver client.
///
/// One driver owns one browser session. The session is released by
/// [`VigilDriver::close`]; callers are responsible for invoking it on
/// every exit path so sessions never leak across extraction runs.
pub struct VigilDriver {
    pub client: Client,
}

impl VigilDriver {
    /// Connect a new session to a running WebDriver service
    /// (chromedriver-compatible) with the given identity profile.
    pub async fn connect(
        webdriver_url: &str,
        headless: bool,
        profile: &BrowserProfile,
    ) -> Result<Self> {
        let mut caps = Capabilities::new();
        let mut chrome_opts = HashMap::new();
        chrome_opts.insert(
            "args".to_string(),
            json!(browser_arguments(profile, headless)),
        );
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(webdriver_url)
            .await?;

        Ok(Self { client })
    }

    /// Navigate to `url` and return a [`VigilPage`] over the session.
    pub async fn goto(&mut self, url: &str) -> Result<VigilPage> {
        let mut page = VigilPage::new(self.client.clone());
        page.goto(url).await?;
        Ok(page)
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}
