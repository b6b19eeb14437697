use crate::editing::Document;
use crate::editing::mapping::AddrMap;

/// Commands that can be applied to the document.
///
/// All positions are addresses. Out-of-range or structural positions are
/// clamped during resolution, never rejected: commands arrive from
/// keystroke-adjacent paths and must degrade gracefully.
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: std::ops::Range<usize>,
    },
    ReplaceRange {
        range: std::ops::Range<usize>,
        text: String,
    },
    SplitParagraph {
        at: usize,
    },
    /// Replace the entire document (e.g. an accepted generated draft).
    SetContent {
        text: String,
    },
}

/// Address units an inserted plain-text string occupies: each byte is one
/// unit, except newlines, which become a close/open token pair.
fn inserted_units(text: &str) -> usize {
    text.len() + text.matches('\n').count()
}

/// Resolve, execute and describe a command against the document.
///
/// Returns the mutation's position mapping and the changed ranges in the
/// new address space. The mapping is computed from the same resolved
/// positions the tree surgery uses, so remapped decorations and the tree
/// can never disagree.
pub(crate) fn apply_to(doc: &mut Document, cmd: &Cmd) -> (AddrMap, Vec<std::ops::Range<usize>>) {
    match cmd {
        Cmd::InsertText { at, text } => {
            if text.is_empty() {
                return (AddrMap::identity(), Vec::new());
            }
            let at = doc.resolve_addr(*at);
            let units = inserted_units(text);
            doc.insert_text_at(at, text);
            (AddrMap::replacing(at, 0, units), vec![at..at + units])
        }
        Cmd::DeleteRange { range } => {
            let range = resolve_range(doc, range);
            if range.is_empty() {
                return (AddrMap::identity(), Vec::new());
            }
            let old_len = range.end - range.start;
            doc.delete_range_at(range.clone());
            (
                AddrMap::replacing(range.start, old_len, 0),
                vec![range.start..range.start],
            )
        }
        Cmd::ReplaceRange { range, text } => {
            let range = resolve_range(doc, range);
            let old_len = range.end - range.start;
            let units = inserted_units(text);
            if old_len == 0 && units == 0 {
                return (AddrMap::identity(), Vec::new());
            }
            doc.delete_range_at(range.clone());
            doc.insert_text_at(range.start, text);
            (
                AddrMap::replacing(range.start, old_len, units),
                vec![range.start..range.start + units],
            )
        }
        Cmd::SplitParagraph { at } => {
            let at = doc.resolve_addr(*at);
            doc.split_block_at(at);
            (AddrMap::replacing(at, 0, 2), vec![at..at + 2])
        }
        Cmd::SetContent { text } => {
            let old_size = doc.content_size();
            doc.set_content(text);
            let new_size = doc.content_size();
            (
                AddrMap::replacing(0, old_size, new_size),
                vec![0..new_size],
            )
        }
    }
}

/// Clamp a command range to resolved, ordered text positions.
///
/// Ends that land on a block's opening unit resolve into that block's
/// content, so a range covering a close/open token pair deletes exactly the
/// boundary between two blocks.
fn resolve_range(doc: &Document, range: &std::ops::Range<usize>) -> std::ops::Range<usize> {
    let start = doc.resolve_addr(range.start.min(range.end));
    let end = doc.resolve_addr(range.end.max(range.start));
    start..end.max(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::mapping::Bias;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_reports_mapping_over_resolved_position() {
        let mut doc = Document::from_plain_text("Helo");
        let patch = doc.apply(Cmd::InsertText {
            at: 3,
            text: "l".to_string(),
        });
        assert_eq!(doc.flat_text(), "Hello");
        // Addresses after the insertion shift by one.
        assert_eq!(patch.mapping.map(4, Bias::Before), 5);
        assert_eq!(patch.mapping.map(2, Bias::Before), 2);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn insert_with_newline_counts_structural_units() {
        let mut doc = Document::from_plain_text("ab");
        // 'b' sits at address 2 before the edit.
        let patch = doc.apply(Cmd::InsertText {
            at: 2,
            text: "x\ny".to_string(),
        });
        assert_eq!(doc.plain_text(), "ax\nyb");
        // "x\ny" inserts 3 bytes plus one extra unit for the block split.
        assert_eq!(patch.mapping.map(2, Bias::After), 6);
        assert_eq!(doc.text_between(6..7), "b");
    }

    #[test]
    fn delete_collapses_mapped_range() {
        let mut doc = Document::from_plain_text("Heello");
        let patch = doc.apply(Cmd::DeleteRange { range: 2..3 });
        assert_eq!(doc.flat_text(), "Hello");
        assert_eq!(patch.mapping.map(3, Bias::Before), 2);
        assert_eq!(patch.mapping.map(4, Bias::Before), 3);
    }

    #[test]
    fn replace_range_swaps_text_in_place() {
        let mut doc = Document::from_plain_text("I like wrold maps");
        // "wrold" occupies addresses 8..13.
        assert_eq!(doc.text_between(8..13), "wrold");
        let patch = doc.apply(Cmd::ReplaceRange {
            range: 8..13,
            text: "world".to_string(),
        });
        assert_eq!(doc.flat_text(), "I like world maps");
        assert_eq!(patch.mapping.map(14, Bias::Before), 14);
    }

    #[test]
    fn replace_with_longer_text_shifts_tail() {
        let mut doc = Document::from_plain_text("a b c");
        // "b" at address 3.
        let patch = doc.apply(Cmd::ReplaceRange {
            range: 3..4,
            text: "beta".to_string(),
        });
        assert_eq!(doc.flat_text(), "a beta c");
        assert_eq!(patch.mapping.map(5, Bias::Before), 8);
    }

    #[test]
    fn split_paragraph_inserts_two_units() {
        let mut doc = Document::from_plain_text("oneword");
        let patch = doc.apply(Cmd::SplitParagraph { at: 4 });
        assert_eq!(doc.plain_text(), "one\nword");
        // 'w' was at address 4; it now sits past a close/open pair.
        assert_eq!(patch.mapping.map(4, Bias::After), 6);
        assert_eq!(doc.text_between(6..7), "w");
    }

    #[test]
    fn set_content_replaces_whole_address_space() {
        let mut doc = Document::from_plain_text("old text");
        let old_size = doc.content_size();
        let patch = doc.apply(Cmd::SetContent {
            text: "brand\nnew".to_string(),
        });
        assert_eq!(doc.plain_text(), "brand\nnew");
        // Every old interior address is gone.
        assert!(patch.mapping.map_result(old_size / 2, Bias::Before).deleted);
    }

    #[test]
    fn empty_insert_is_identity() {
        let mut doc = Document::from_plain_text("abc");
        let patch = doc.apply(Cmd::InsertText {
            at: 2,
            text: String::new(),
        });
        assert!(patch.mapping.is_identity());
        assert_eq!(doc.flat_text(), "abc");
    }

    #[test]
    fn out_of_range_positions_clamp() {
        let mut doc = Document::from_plain_text("abc");
        doc.apply(Cmd::InsertText {
            at: 10_000,
            text: "!".to_string(),
        });
        assert_eq!(doc.flat_text(), "abc!");

        let mut doc = Document::from_plain_text("abc");
        doc.apply(Cmd::DeleteRange { range: 2..10_000 });
        assert_eq!(doc.flat_text(), "a");
    }

    #[test]
    fn reversed_range_is_reordered() {
        let mut doc = Document::from_plain_text("abcdef");
        doc.apply(Cmd::DeleteRange { range: 4..2 });
        assert_eq!(doc.flat_text(), "abef");
    }

    #[test]
    fn selection_transforms_through_edits() {
        let mut doc = Document::from_plain_text("hello");
        doc.set_selection(3..3);
        doc.apply(Cmd::InsertText {
            at: 1,
            text: "XX".to_string(),
        });
        assert_eq!(doc.selection(), 5..5);
    }
}
