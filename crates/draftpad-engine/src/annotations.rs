//! Live highlight annotations anchored to document addresses.
//!
//! The store owns three decoration lifecycles:
//!
//! - **misspellings**: an unbounded set, rebuilt wholesale from each fresh
//!   spellcheck result, remapped on every mutation and pruned when the live
//!   text no longer matches the snapshot taken at creation;
//! - **hover-sentence**: a singleton following the pointer, frozen while
//!   `locked` (an outstanding rewrite request) and cleared by any mutation;
//! - **flash-confirmation**: a singleton marking freshly inserted
//!   replacement text, cleared by its deadline or the next mutation,
//!   whichever comes first.
//!
//! Updates are immutable-in/immutable-out: every method returns the next
//! store value. [`AnnotationStore::apply_mutation`] must be called for
//! every document change, and it remaps before validating content, since
//! validation reads text at the *new* addresses.

use std::ops::Range;
use std::time::Instant;

use crate::editing::{AddrMap, Document};

/// A misspelling highlight with its suggestion payload and the text
/// snapshot used to detect staleness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MisspellingDecoration {
    pub range: Range<usize>,
    /// Live text at creation time; the decoration is dropped once the text
    /// at its (remapped) range no longer matches.
    pub original: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Flash {
    range: Range<usize>,
    expires_at: Instant,
}

/// Read-only decoration view handed to the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoration {
    pub range: Range<usize>,
    pub kind: DecorationKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationKind {
    Misspelling { suggestions: Vec<String> },
    HoverSentence,
    FlashConfirmation,
}

/// The current set of decorations, partitioned by kind.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotationStore {
    misspellings: Vec<MisspellingDecoration>,
    hover: Option<Range<usize>>,
    hover_locked: bool,
    flash: Option<Flash>,
}

impl AnnotationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn misspellings(&self) -> &[MisspellingDecoration] {
        &self.misspellings
    }

    pub fn hover(&self) -> Option<Range<usize>> {
        self.hover.clone()
    }

    pub fn hover_locked(&self) -> bool {
        self.hover_locked
    }

    pub fn flash(&self) -> Option<Range<usize>> {
        self.flash.as_ref().map(|f| f.range.clone())
    }

    /// The misspelling decoration containing `addr`, if any.
    pub fn misspelling_at(&self, addr: usize) -> Option<&MisspellingDecoration> {
        self.misspellings.iter().find(|m| m.range.contains(&addr))
    }

    /// Remap every retained decoration through a mutation's mapping, then
    /// prune misspellings whose live text no longer matches their snapshot.
    ///
    /// Hover and flash represent transient state and clear unconditionally
    /// on any mutation; the hover lock resets with them.
    #[must_use]
    pub fn apply_mutation(&self, mapping: &AddrMap, doc: &Document) -> Self {
        let end = doc.end_address();
        let misspellings = self
            .misspellings
            .iter()
            .filter_map(|m| {
                let range = mapping.map_range(&m.range)?;
                if range.end > end {
                    return None;
                }
                if doc.text_between(range.clone()) != m.original {
                    return None;
                }
                Some(MisspellingDecoration {
                    range,
                    original: m.original.clone(),
                    suggestions: m.suggestions.clone(),
                })
            })
            .collect();
        Self {
            misspellings,
            hover: None,
            hover_locked: false,
            flash: None,
        }
    }

    /// Replace the misspelling set wholesale with a fresh check result.
    #[must_use]
    pub fn with_misspellings(&self, misspellings: Vec<MisspellingDecoration>) -> Self {
        Self {
            misspellings,
            ..self.clone()
        }
    }

    /// Move the hover-sentence highlight. Ignored while locked.
    #[must_use]
    pub fn with_hover(&self, range: Range<usize>) -> Self {
        if self.hover_locked {
            return self.clone();
        }
        Self {
            hover: Some(range),
            ..self.clone()
        }
    }

    /// Clear the hover-sentence highlight. Ignored while locked.
    #[must_use]
    pub fn without_hover(&self) -> Self {
        if self.hover_locked {
            return self.clone();
        }
        Self {
            hover: None,
            ..self.clone()
        }
    }

    /// Freeze the hover highlight while an async rewrite is outstanding.
    #[must_use]
    pub fn lock_hover(&self) -> Self {
        Self {
            hover_locked: true,
            ..self.clone()
        }
    }

    /// Resume pointer-driven hover updates.
    #[must_use]
    pub fn unlock_hover(&self) -> Self {
        Self {
            hover_locked: false,
            ..self.clone()
        }
    }

    /// Show a flash-confirmation over freshly inserted text.
    #[must_use]
    pub fn with_flash(&self, range: Range<usize>, expires_at: Instant) -> Self {
        Self {
            flash: Some(Flash { range, expires_at }),
            ..self.clone()
        }
    }

    /// Clear the flash once its deadline has passed.
    #[must_use]
    pub fn tick(&self, now: Instant) -> Self {
        match &self.flash {
            Some(flash) if now >= flash.expires_at => Self {
                flash: None,
                ..self.clone()
            },
            _ => self.clone(),
        }
    }

    /// Deadline the host should schedule a tick for, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.flash.as_ref().map(|f| f.expires_at)
    }

    /// The full decoration set for the rendering surface.
    pub fn decorations(&self) -> Vec<Decoration> {
        let mut out: Vec<Decoration> = self
            .misspellings
            .iter()
            .map(|m| Decoration {
                range: m.range.clone(),
                kind: DecorationKind::Misspelling {
                    suggestions: m.suggestions.clone(),
                },
            })
            .collect();
        if let Some(hover) = &self.hover {
            out.push(Decoration {
                range: hover.clone(),
                kind: DecorationKind::HoverSentence,
            });
        }
        if let Some(flash) = &self.flash {
            out.push(Decoration {
                range: flash.range.clone(),
                kind: DecorationKind::FlashConfirmation,
            });
        }
        out
    }
}
