//! Error types for the console front-end.
//!
//! Chat failures never reach the user as errors: [`CliError::user_message`]
//! turns them into the text shown in place of a reply. Console I/O and
//! configuration failures propagate to `main`, which logs them and exits
//! normally.

/// Errors that can occur while running the console.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Runtime configuration is invalid.
    #[error("config error: {0}")]
    Config(String),

    /// Reading the console or writing to it failed.
    #[error("console I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The chat collaborator failed its health check.
    #[error("health check failed for {endpoint}")]
    Unhealthy {
        /// Endpoint that was checked.
        endpoint: String,
    },

    /// The chat request exceeded its deadline.
    #[error("chat request timed out")]
    Timeout,

    /// The chat collaborator could not be reached.
    #[error("cannot connect to chat server: {0}")]
    Connect(String),

    /// The chat collaborator answered with a non-success status.
    #[error("chat server returned {0}")]
    Status(u16),

    /// Any other HTTP failure.
    #[error("chat request failed: {0}")]
    Http(String),
}

impl CliError {
    /// Text shown to the user in place of a chat reply.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unhealthy { endpoint } => format!(
                "❌ LLM connection failed. Check that the server is running on {endpoint}"
            ),
            Self::Timeout => "⏰ LLM request timed out".to_owned(),
            Self::Connect(_) => "🔌 Cannot connect to LLM server".to_owned(),
            Self::Status(code) => format!("❌ LLM error: {code}"),
            Self::Http(detail) | Self::Config(detail) => format!("❌ LLM error: {detail}"),
            Self::Io(e) => format!("❌ LLM error: {e}"),
        }
    }
}

impl From<reqwest::Error> for CliError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Http(e.to_string())
        }
    }
}
