//! The editor session: one open draft plus its live coach state.
//!
//! `EditorSession` owns the document, the annotation store, the spellcheck
//! scheduler and the rewrite flow, and sequences them so that a mutation
//! and the decoration remap it requires happen within one call; the
//! host's rendering surface can never observe decorations addressed
//! against a stale document.
//!
//! Async service calls are the only suspension points. The session offers
//! both combined drivers (`run_spellcheck`, `fetch_rewrites`) and their
//! sans-io halves (`apply_spellcheck_result`, `complete_rewrites`) so a
//! host can keep editing while a call is in flight and deliver the result
//! whenever it lands; stale results are tolerated and cleaned up by the
//! next mutation's prune pass.

use std::time::Instant;

use crate::annotations::{AnnotationStore, Decoration, MisspellingDecoration};
use crate::coach::{
    RewriteFlow, RewriteRequest, RewriteService, RewriteState, ServiceError, SpellcheckScheduler,
    SpellcheckService, SpellingIssue,
};
use crate::config::CoachConfig;
use crate::editing::{Bias, Block, Cmd, Document, Patch};
use crate::sentence::sentence_at;

pub struct EditorSession {
    doc: Document,
    store: AnnotationStore,
    scheduler: SpellcheckScheduler,
    rewrite: RewriteFlow,
    config: CoachConfig,
}

impl EditorSession {
    pub fn from_plain_text(text: &str) -> Self {
        Self::with_config(Document::from_plain_text(text), CoachConfig::default())
    }

    pub fn with_config(doc: Document, config: CoachConfig) -> Self {
        Self {
            doc,
            store: AnnotationStore::new(),
            scheduler: SpellcheckScheduler::new(config.spellcheck.clone()),
            rewrite: RewriteFlow::new(),
            config,
        }
    }

    // ---- read surface ----

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn decorations(&self) -> Vec<Decoration> {
        self.store.decorations()
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn rewrite_state(&self) -> &RewriteState {
        self.rewrite.state()
    }

    /// Current plain text for the saving collaborator (which debounces
    /// writes on its side).
    pub fn plain_text(&self) -> String {
        self.doc.plain_text()
    }

    /// Structured content for the saving collaborator.
    pub fn content(&self) -> &[Block] {
        self.doc.content()
    }

    pub fn word_count(&self) -> usize {
        self.doc.word_count()
    }

    // ---- mutation ----

    /// Apply an edit and remap every decoration holder through it.
    pub fn edit(&mut self, cmd: Cmd, now: Instant) -> Patch {
        let flat_before = self.doc.flat_len();
        let patch = self.doc.apply(cmd);
        self.store = self.store.apply_mutation(&patch.mapping, &self.doc);
        if !self.rewrite.remap(&patch.mapping) {
            // Target gone; the lock was already reset by the remap above.
            debug_assert!(!self.store.hover_locked());
        }
        let delta = self.doc.flat_len().abs_diff(flat_before);
        self.scheduler.note_edit(now, delta);
        patch
    }

    // ---- pointer events (from the rendering surface) ----

    /// Pointer moved over the given address: highlight the sentence under
    /// it. Ignored while the hover decoration is locked.
    pub fn pointer_moved(&mut self, addr: usize) {
        if self.store.hover_locked() {
            return;
        }
        match self.sentence_range_at(addr) {
            Some(range) => self.store = self.store.with_hover(range),
            None => self.store = self.store.without_hover(),
        }
    }

    /// Pointer left the editing surface.
    pub fn pointer_left(&mut self) {
        self.store = self.store.without_hover();
    }

    // ---- spellcheck orchestration ----

    /// The user left a paragraph (Enter/Tab). Returns whether a check
    /// should run now.
    pub fn paragraph_exited(&mut self, now: Instant) -> bool {
        self.scheduler.note_paragraph_exit(now)
    }

    /// Whether the idle trigger is due. Hosts poll this from their timer.
    pub fn spellcheck_due(&self, now: Instant) -> bool {
        self.scheduler.idle_check_due(now)
    }

    /// When the host should next poll [`Self::spellcheck_due`].
    pub fn next_spellcheck_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    /// Run one spellcheck round-trip against the current flat text.
    ///
    /// Fails open: on a service error the previous decoration set stays
    /// untouched. Either way the attempt stamps the minimum-interval gate.
    pub async fn run_spellcheck(&mut self, service: &dyn SpellcheckService, now: Instant) {
        let text = self.doc.flat_text();
        match service.check(&text).await {
            Ok(issues) => self.apply_spellcheck_result(&issues, now),
            Err(err) => {
                tracing::warn!(error = %err, "spellcheck failed; keeping previous highlights");
                self.scheduler.mark_checked(now);
            }
        }
    }

    /// Apply a spellcheck result against whatever document state exists
    /// now. The whole misspelling set is replaced; issues whose offsets no
    /// longer resolve to a span are skipped, and a result raced by further
    /// edits is pruned on the next mutation pass.
    pub fn apply_spellcheck_result(&mut self, issues: &[SpellingIssue], now: Instant) {
        let mut decorations = Vec::with_capacity(issues.len());
        for issue in issues {
            if issue.from >= issue.to {
                continue;
            }
            let start = self.doc.address_at(issue.from);
            let end = self.doc.address_at(issue.to);
            if start >= end {
                continue;
            }
            decorations.push(MisspellingDecoration {
                original: self.doc.text_between(start..end),
                range: start..end,
                suggestions: issue.suggestions.clone(),
            });
        }
        tracing::debug!(count = decorations.len(), "applying spellcheck result");
        self.store = self.store.with_misspellings(decorations);
        self.scheduler.mark_checked(now);
    }

    /// Replace a misspelling with one of its suggestions. The host should
    /// follow up with a fresh check, as after any accepted correction.
    pub fn accept_suggestion(&mut self, addr: usize, index: usize, now: Instant) -> Option<Patch> {
        let m = self.store.misspelling_at(addr)?;
        let range = m.range.clone();
        let text = m.suggestions.get(index)?.clone();
        Some(self.edit(Cmd::ReplaceRange { range, text }, now))
    }

    // ---- sentence rewrite flow ----

    /// A qualifying click gesture at `addr`: modifier held and not inside
    /// a misspelling highlight. Locks the hover decoration and returns the
    /// request the host must take to the rewrite service.
    pub fn sentence_clicked(&mut self, addr: usize, modifier: bool) -> Option<RewriteRequest> {
        if !modifier {
            return None;
        }
        if self.store.misspelling_at(addr).is_some() {
            return None;
        }
        let flat = self.doc.flat_text();
        let bounds = sentence_at(&flat, self.doc.flat_index_at(addr));
        if bounds.is_empty() {
            return None;
        }
        let range = self.doc.address_at(bounds.start)..self.doc.address_at(bounds.end);
        if range.start >= range.end {
            return None;
        }
        let sentence = flat[bounds.range()].to_string();
        self.store = self.store.with_hover(range.clone()).lock_hover();
        Some(self.rewrite.begin(range, sentence))
    }

    /// Fetch candidates for a request and deliver them to the flow.
    pub async fn fetch_rewrites(&mut self, service: &dyn RewriteService, request: &RewriteRequest) {
        let result = service.rewrite(&request.sentence).await;
        self.complete_rewrites(request.id, result);
    }

    /// Deliver a rewrite result obtained out-of-band.
    pub fn complete_rewrites(&mut self, id: u64, result: Result<Vec<String>, ServiceError>) {
        self.rewrite.complete(id, result);
    }

    /// Accept one presented candidate: replace the sentence, flash the
    /// inserted text, release the hover lock.
    pub fn accept_rewrite(&mut self, index: usize, now: Instant) -> Option<Patch> {
        let (range, text) = self.rewrite.take_candidate(index)?;
        let patch = self.edit(
            Cmd::ReplaceRange {
                range: range.clone(),
                text: text.clone(),
            },
            now,
        );
        // The mutation already cleared hover state and its lock.
        let start = patch.mapping.map(range.start, Bias::Before);
        let end = start + text.len() + text.matches('\n').count();
        self.store = self
            .store
            .with_flash(start..end, now + self.config.flash_duration);
        self.doc.set_selection(end..end);
        Some(patch)
    }

    /// Dismiss the candidate list without touching the document.
    pub fn dismiss_rewrite(&mut self) {
        self.rewrite.cancel();
        self.store = self.store.unlock_hover().without_hover();
    }

    // ---- timers ----

    /// Advance deadline-driven state (flash expiry).
    pub fn tick(&mut self, now: Instant) {
        self.store = self.store.tick(now);
    }

    /// Deadline of the next pending `tick`, if any.
    pub fn next_tick_deadline(&self) -> Option<Instant> {
        self.store.next_deadline()
    }

    fn sentence_range_at(&self, addr: usize) -> Option<std::ops::Range<usize>> {
        let flat = self.doc.flat_text();
        let bounds = sentence_at(&flat, self.doc.flat_index_at(addr));
        if bounds.is_empty() {
            return None;
        }
        let range = self.doc.address_at(bounds.start)..self.doc.address_at(bounds.end);
        (range.start < range.end).then_some(range)
    }
}
