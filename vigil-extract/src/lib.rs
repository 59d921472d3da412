//! Extraction of advisory records from the rendered NDMA advisories page.
//!
//! The browser work lives in [`extractor`]; the positional pairing of
//! harvested text fragments and its filtering rules live in [`pairing`]
//! as pure functions, so the interesting logic is testable without a
//! WebDriver endpoint.

pub mod error;
pub mod extractor;
pub mod pairing;

pub use error::ExtractError;
pub use extractor::{AdvisoryExtractor, ExtractorConfig, PageExtractor};
