//! Writing-coach integration: external service seams, spellcheck trigger
//! scheduling, and the sentence-rewrite interaction flow.

pub mod rewrite;
pub mod scheduler;
pub mod service;

pub use rewrite::{RewriteFlow, RewriteRequest, RewriteState};
pub use scheduler::SpellcheckScheduler;
pub use service::{
    MAX_REWRITE_CANDIDATES, RewriteService, ServiceError, SpellcheckService, SpellingIssue,
    parse_rewrite_response, parse_spellcheck_response,
};
