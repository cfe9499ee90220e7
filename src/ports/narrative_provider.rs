//! NarrativeProvider port - Interface to the text-generation provider.
//!
//! Given the structural content key the provider returns narrative prose
//! shaped for the chart kind. Invoked only through the interpretation
//! cache's budget gate, never directly by callers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::interpretation::{ContentKey, InterpretationPayload};

/// Port for narrative generation.
#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Generates a payload for the content key.
    ///
    /// The returned payload's kind must match `key.chart_kind`.
    async fn generate(&self, key: &ContentKey) -> Result<InterpretationPayload, NarrativeError>;
}

/// Narrative provider errors.
#[derive(Debug, Clone, Error)]
pub enum NarrativeError {
    /// Rate limited by the provider.
    #[error("narrative provider rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Provider is temporarily unreachable.
    #[error("narrative provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Request timed out.
    #[error("narrative request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// The content key was rejected.
    #[error("invalid narrative request: {0}")]
    InvalidRequest(String),
}

impl NarrativeError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// True if the call may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            NarrativeError::RateLimited { .. }
                | NarrativeError::Unavailable { .. }
                | NarrativeError::Timeout { .. }
        )
    }
}
