//! Engine tunables.

use std::time::Duration;

/// Timing and threshold knobs for the automatic spellcheck triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellcheckConfig {
    /// Quiet time after the last keystroke before the idle trigger fires.
    pub idle_delay: Duration,
    /// Minimum gap between two checks, whatever triggered them.
    pub min_check_interval: Duration,
    /// Changed characters required before a paragraph exit triggers.
    pub paragraph_char_threshold: usize,
}

impl Default for SpellcheckConfig {
    fn default() -> Self {
        Self {
            idle_delay: Duration::from_secs(5),
            min_check_interval: Duration::from_secs(10),
            paragraph_char_threshold: 20,
        }
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    pub spellcheck: SpellcheckConfig,
    /// How long a flash-confirmation highlight stays visible.
    pub flash_duration: Duration,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            spellcheck: SpellcheckConfig::default(),
            flash_duration: Duration::from_millis(600),
        }
    }
}
