use thiserror::Error;

pub type Result<T> = std::result::Result<T, HoursError>;

#[derive(Debug, Error)]
pub enum HoursError {
    /// Config file missing, unreadable, or a required key absent/empty.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Browser failed to start, or the landing page was not the portal
    /// (wrong page, proxy failure, or site down).
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation failed: {url}")]
    Navigation {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    /// An expected UI element never appeared within the wait bound. Covers
    /// login failure, slow network, and remote UI changes indiscriminately.
    #[error("timeout after {ms}ms waiting for: {condition}")]
    Timeout { ms: u64, condition: String },

    /// An element expected to already be present was not found.
    #[error("element not found: {id}")]
    ElementNotFound { id: String },

    /// The save confirmation message was absent or unexpected.
    #[error("submission not confirmed: {0}")]
    Submission(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),
}
