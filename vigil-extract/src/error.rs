use thiserror::Error;

/// Failure modes of a single extraction run.
///
/// Each variant is terminal for the run: the extractor never retries, and
/// the caller decides what to do with the failure. The HTTP path renders
/// the message into an `{"error": ...}` payload; the sync path logs it and
/// processes zero records.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The WebDriver session could not be established.
    #[error("webdriver session could not be established: {0}")]
    Session(String),

    /// Navigation to the advisories URL failed.
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    /// The page never produced its readiness signal within the bound.
    #[error("page readiness wait timed out after {waited_secs}s")]
    ReadinessTimeout { waited_secs: u64 },

    /// Querying the rendered DOM failed.
    #[error("dom query failed: {0}")]
    Query(String),
}
