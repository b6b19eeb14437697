//! The sentence-rewrite interaction flow.
//!
//! One request at a time: a qualifying gesture starts a request for the
//! sentence under the pointer, the service answers asynchronously, and the
//! user accepts one candidate or dismisses the list. A monotonic request id
//! makes completions last-write-wins: a completion for anything but the
//! current request is dropped, and no in-flight call is ever cancelled.

use std::ops::Range;

use crate::coach::service::{MAX_REWRITE_CANDIDATES, ServiceError};
use crate::editing::AddrMap;

/// An outstanding request for rewrite candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub id: u64,
    /// Address range of the sentence to replace.
    pub range: Range<usize>,
    /// The sentence text sent to the service.
    pub sentence: String,
}

/// Where the interaction currently stands. `Loading` and `Ready` with an
/// empty candidate list are distinct states: the first renders a spinner,
/// the second "no candidates".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RewriteState {
    #[default]
    Idle,
    Loading {
        request: RewriteRequest,
    },
    Ready {
        request: RewriteRequest,
        candidates: Vec<String>,
    },
}

#[derive(Debug, Default)]
pub struct RewriteFlow {
    next_id: u64,
    state: RewriteState,
}

impl RewriteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &RewriteState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, RewriteState::Idle)
    }

    /// Start a new request, superseding any outstanding one.
    pub(crate) fn begin(&mut self, range: Range<usize>, sentence: String) -> RewriteRequest {
        self.next_id += 1;
        let request = RewriteRequest {
            id: self.next_id,
            range,
            sentence,
        };
        self.state = RewriteState::Loading {
            request: request.clone(),
        };
        request
    }

    /// Deliver a service result. Stale completions are ignored; a service
    /// failure presents as an empty candidate list, not an error state.
    pub(crate) fn complete(&mut self, id: u64, result: Result<Vec<String>, ServiceError>) {
        let request = match &self.state {
            RewriteState::Loading { request } if request.id == id => request.clone(),
            _ => {
                tracing::debug!(id, "dropping stale rewrite completion");
                return;
            }
        };
        let mut candidates = match result {
            Ok(candidates) => candidates,
            Err(err) => {
                tracing::warn!(error = %err, "rewrite service failed; presenting no candidates");
                Vec::new()
            }
        };
        candidates.truncate(MAX_REWRITE_CANDIDATES);
        self.state = RewriteState::Ready {
            request,
            candidates,
        };
    }

    /// Take the chosen candidate for acceptance, resetting to idle.
    pub(crate) fn take_candidate(&mut self, index: usize) -> Option<(Range<usize>, String)> {
        let RewriteState::Ready {
            request,
            candidates,
        } = &self.state
        else {
            return None;
        };
        let text = candidates.get(index)?.clone();
        let range = request.range.clone();
        self.state = RewriteState::Idle;
        Some((range, text))
    }

    /// Dismiss the interaction without touching the document.
    pub(crate) fn cancel(&mut self) {
        self.state = RewriteState::Idle;
    }

    /// Remap the pending request's target range through a document
    /// mutation. Returns false when the target was deleted and the flow
    /// cancelled itself.
    pub(crate) fn remap(&mut self, mapping: &AddrMap) -> bool {
        let request = match &mut self.state {
            RewriteState::Loading { request } => request,
            RewriteState::Ready { request, .. } => request,
            RewriteState::Idle => return true,
        };
        match mapping.map_range(&request.range) {
            Some(range) => {
                request.range = range;
                true
            }
            None => {
                tracing::debug!("rewrite target deleted by edit; cancelling");
                self.state = RewriteState::Idle;
                false
            }
        }
    }
}
