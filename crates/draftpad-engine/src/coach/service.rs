//! External writing-coach services consumed by the editor core.
//!
//! Both services are opaque text-in/JSON-out collaborators. The core never
//! builds prompts or owns a transport; it hands over flat text (spellcheck)
//! or a single sentence (rewrite) and consumes the typed result. Transport
//! implementations can use the [`parse_spellcheck_response`] /
//! [`parse_rewrite_response`] helpers so that a malformed body becomes a
//! [`ServiceError`] instead of leaking into decoration state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of rewrite candidates presented to the user.
pub const MAX_REWRITE_CANDIDATES: usize = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service transport failed: {message}")]
    Transport { message: String },

    #[error("malformed service response: {source}")]
    MalformedResponse {
        #[from]
        source: serde_json::Error,
    },
}

impl ServiceError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// One misspelling reported by the spellcheck service.
///
/// `from`/`to` are byte offsets into the submitted flat text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingIssue {
    pub word: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Spellcheck collaborator: flat text in, offset-addressed issues out.
#[async_trait]
pub trait SpellcheckService: Send + Sync {
    async fn check(&self, text: &str) -> Result<Vec<SpellingIssue>, ServiceError>;
}

/// Rewrite collaborator: one sentence in, up to a few alternative
/// phrasings out, in presentation order.
#[async_trait]
pub trait RewriteService: Send + Sync {
    async fn rewrite(&self, sentence: &str) -> Result<Vec<String>, ServiceError>;
}

/// Parse a spellcheck response body.
pub fn parse_spellcheck_response(body: &str) -> Result<Vec<SpellingIssue>, ServiceError> {
    Ok(serde_json::from_str(body)?)
}

/// Parse a rewrite response body.
pub fn parse_rewrite_response(body: &str) -> Result<Vec<String>, ServiceError> {
    Ok(serde_json::from_str(body)?)
}
