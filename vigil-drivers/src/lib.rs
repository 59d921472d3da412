//! WebDriver plumbing for the Vigil workspace.
//!
//! [`driver::VigilDriver`] owns the browser session; [`page::VigilPage`]
//! carries the queries an extraction needs: a bounded readiness wait and
//! bulk text harvesting. Everything speaks to a chromedriver-compatible
//! endpoint through `fantoccini`.

pub mod driver;
pub mod page;
pub mod profile;
