//! Sentence boundary detection over flat text.
//!
//! A cheap scan-based approximation: good enough to highlight and rewrite
//! one sentence at a time without a language model. Terminators are `.` `!`
//! `?`; runs of terminators (`...`, `?!`) and trailing closing quotes or
//! parentheses are consumed into the sentence so a replacement never
//! strands dangling punctuation. Leading whitespace after the previous
//! terminator is excluded; trailing whitespace before the next terminator
//! is kept with the sentence.

/// Byte offsets of a sentence within the scanned text.
///
/// `start == end` means "no sentence here" and callers must treat it as a
/// no-op rather than opening an interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceBounds {
    pub start: usize,
    pub end: usize,
}

impl SentenceBounds {
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

const EMPTY: SentenceBounds = SentenceBounds { start: 0, end: 0 };

fn is_terminator(b: u8) -> bool {
    matches!(b, b'.' | b'!' | b'?')
}

fn is_closer(b: u8) -> bool {
    matches!(b, b'"' | b'\'' | b')')
}

/// Find the boundaries of the sentence enclosing `index`.
///
/// `index` is a byte offset into `text`; offsets outside `[0, len)` yield
/// the degenerate empty result. Indices inside a multi-byte character are
/// snapped down to the character's first byte.
pub fn sentence_at(text: &str, index: usize) -> SentenceBounds {
    if index >= text.len() {
        return EMPTY;
    }
    let mut index = index;
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    let bytes = text.as_bytes();

    // Walk back to just after the previous terminator (or text start).
    let mut start = index;
    while start > 0 && !is_terminator(bytes[start - 1]) {
        start -= 1;
    }

    // The sentence starts at its first non-whitespace character.
    while start < text.len() {
        let ch = match text[start..].chars().next() {
            Some(ch) => ch,
            None => break,
        };
        if ch.is_whitespace() {
            start += ch.len_utf8();
        } else {
            break;
        }
    }

    // Walk forward to the first terminator, then consume the full
    // terminator run and any closing quotes/parens.
    let mut end = index;
    let mut terminated = false;
    while end < bytes.len() {
        if is_terminator(bytes[end]) {
            end += 1;
            while end < bytes.len() && is_terminator(bytes[end]) {
                end += 1;
            }
            while end < bytes.len() && is_closer(bytes[end]) {
                end += 1;
            }
            terminated = true;
            break;
        }
        end += 1;
    }

    // Unpunctuated tail: stop at the next newline, or the end of text.
    if !terminated {
        end = match text[index..].find('\n') {
            Some(off) => index + off,
            None => text.len(),
        };
    }

    if end < start {
        return EMPTY;
    }
    SentenceBounds { start, end }
}
