// SPDX-License-Identifier: MIT

//! Typed error handling for scribeflow-rs
//!
//! Collaborators and the graph interpreter return these types; the agents
//! fold them into their state's `error` field, so nothing here ever crosses
//! an agent's `run()` boundary.

use thiserror::Error;

/// Top-level error type for scribeflow-rs
#[derive(Debug, Error)]
pub enum ScribeError {
    /// API errors from external services (Groq, Brave, etc.)
    #[error("API error from {provider}: {message}")]
    Api { provider: String, message: String },

    /// Configuration errors (missing env vars, invalid config)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transcript extraction errors; the message is surfaced verbatim
    #[error("{0}")]
    Extraction(String),

    /// Malformed collaborator response
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Graph interpreter errors
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// HTTP request errors
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Generic error wrapper
    #[error("{0}")]
    Other(String),
}

/// Errors from the state-graph interpreter
///
/// The three agent graphs are static, so these only fire on a structural
/// defect in graph construction.
#[derive(Debug, Error)]
pub enum GraphError {
    /// No entry point configured
    #[error("Graph has no entry point")]
    NoEntryPoint,

    /// A fixed edge points at a node with no outgoing edge
    #[error("No outgoing edge registered for node '{0}'")]
    MissingEdge(String),

    /// Interpreter safety limit hit
    #[error("Graph execution exceeded {0} steps")]
    StepLimit(usize),
}

impl ScribeError {
    /// Create an API error
    pub fn api(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction(message.into())
    }

    /// Create from a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }
}

impl From<&str> for ScribeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

impl From<String> for ScribeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ScribeError::api("Brave", "rate limit exceeded");
        assert!(err.to_string().contains("Brave"));
        assert!(err.to_string().contains("rate limit"));
    }

    #[test]
    fn test_extraction_error_is_verbatim() {
        let err = ScribeError::extraction("No subtitles found in video metadata.");
        assert_eq!(err.to_string(), "No subtitles found in video metadata.");
    }

    #[test]
    fn test_error_from_str() {
        let err: ScribeError = "something went wrong".into();
        assert_eq!(err.to_string(), "something went wrong");
    }

    #[test]
    fn test_graph_error_display() {
        let err = GraphError::MissingEdge("analyze".to_string());
        assert!(err.to_string().contains("analyze"));
    }
}
