//! Spellcheck trigger bookkeeping.
//!
//! Two independent triggers can request a check:
//!
//! - **idle**: the user stopped typing for [`SpellcheckConfig::idle_delay`]
//!   while unflushed changes exist;
//! - **paragraph exit**: the user left a block after at least
//!   [`SpellcheckConfig::paragraph_char_threshold`] changed characters.
//!
//! Neither fires more often than
//! [`SpellcheckConfig::min_check_interval`]. The scheduler keeps no timer
//! of its own: callers pass the current [`Instant`] into every method and
//! can ask [`SpellcheckScheduler::next_deadline`] when to poll again, so
//! the state dies with the session and tests need no sleeping.

use std::time::Instant;

use crate::config::SpellcheckConfig;

#[derive(Debug)]
pub struct SpellcheckScheduler {
    config: SpellcheckConfig,
    last_input: Option<Instant>,
    last_check: Option<Instant>,
    pending_changes: bool,
    chars_since_check: usize,
}

impl SpellcheckScheduler {
    pub fn new(config: SpellcheckConfig) -> Self {
        Self {
            config,
            last_input: None,
            last_check: None,
            pending_changes: false,
            chars_since_check: 0,
        }
    }

    pub fn config(&self) -> &SpellcheckConfig {
        &self.config
    }

    /// Record an edit of `changed_chars` flat-text characters.
    pub fn note_edit(&mut self, now: Instant, changed_chars: usize) {
        self.last_input = Some(now);
        if changed_chars > 0 {
            self.pending_changes = true;
            self.chars_since_check += changed_chars;
        }
    }

    /// The user signalled a paragraph boundary. Returns whether a check
    /// should fire now.
    pub fn note_paragraph_exit(&mut self, now: Instant) -> bool {
        let due = self.pending_changes
            && self.chars_since_check >= self.config.paragraph_char_threshold
            && self.interval_elapsed(now);
        if due {
            tracing::debug!(
                chars = self.chars_since_check,
                "paragraph-exit spellcheck trigger"
            );
        }
        due
    }

    /// Whether the idle trigger is due.
    pub fn idle_check_due(&self, now: Instant) -> bool {
        let Some(last_input) = self.last_input else {
            return false;
        };
        self.pending_changes
            && now.saturating_duration_since(last_input) >= self.config.idle_delay
            && self.interval_elapsed(now)
    }

    /// When the idle trigger could next fire, if changes are pending.
    /// Hosts use this to schedule their single-shot poll timer; it moves
    /// with every further edit.
    pub fn next_deadline(&self) -> Option<Instant> {
        let last_input = self.last_input?;
        if !self.pending_changes {
            return None;
        }
        let idle_at = last_input + self.config.idle_delay;
        let gated_at = self
            .last_check
            .map(|t| t + self.config.min_check_interval)
            .unwrap_or(idle_at);
        Some(idle_at.max(gated_at))
    }

    /// A check ran (successfully or not): reset the pending state and
    /// stamp the minimum-interval gate.
    pub fn mark_checked(&mut self, now: Instant) {
        self.last_check = Some(now);
        self.pending_changes = false;
        self.chars_since_check = 0;
    }

    fn interval_elapsed(&self, now: Instant) -> bool {
        match self.last_check {
            None => true,
            Some(t) => now.saturating_duration_since(t) >= self.config.min_check_interval,
        }
    }
}
