//! Decoration lifecycles across edits, driven through the editor session.

use std::time::{Duration, Instant};

use draftpad_engine::{Cmd, EditorSession, SpellingIssue};

fn issue(word: &str, from: usize, to: usize, suggestions: &[&str]) -> SpellingIssue {
    SpellingIssue {
        word: word.to_string(),
        from,
        to,
        suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
    }
}

#[test]
fn misspelling_survives_unrelated_edits_at_a_remapped_address() {
    let mut session = EditorSession::from_plain_text("I like wrold maps");
    let now = Instant::now();
    session.apply_spellcheck_result(&[issue("wrold", 7, 12, &["world"])], now);

    // Edit far before the word: the decoration shifts but stays alive.
    session.edit(
        Cmd::InsertText {
            at: 1,
            text: "really ".into(),
        },
        now,
    );

    let misspellings = session.annotations().misspellings();
    assert_eq!(misspellings.len(), 1);
    assert_eq!(
        session
            .document()
            .text_between(misspellings[0].range.clone()),
        "wrold"
    );
}

#[test]
fn misspelling_dropped_once_its_text_is_corrected() {
    let mut session = EditorSession::from_plain_text("I like wrold maps");
    let now = Instant::now();
    session.apply_spellcheck_result(&[issue("wrold", 7, 12, &["world"])], now);

    let range = session.annotations().misspellings()[0].range.clone();
    session.edit(
        Cmd::ReplaceRange {
            range,
            text: "world".into(),
        },
        now,
    );

    assert!(session.annotations().misspellings().is_empty());
    assert_eq!(session.document().flat_text(), "I like world maps");
}

#[test]
fn new_result_fully_replaces_the_previous_set() {
    let mut session = EditorSession::from_plain_text("teh wrold turns");
    let now = Instant::now();
    session.apply_spellcheck_result(
        &[issue("teh", 0, 3, &["the"]), issue("wrold", 4, 9, &["world"])],
        now,
    );
    assert_eq!(session.annotations().misspellings().len(), 2);

    // The next result names only one word; the other must disappear even
    // though its text is unchanged.
    session.apply_spellcheck_result(
        &[issue("wrold", 4, 9, &["world"])],
        now + Duration::from_secs(30),
    );
    let misspellings = session.annotations().misspellings();
    assert_eq!(misspellings.len(), 1);
    assert_eq!(misspellings[0].original, "wrold");
}

#[test]
fn decorations_spanning_paragraph_edits_are_pruned_not_corrupted() {
    let mut session = EditorSession::from_plain_text("first wrold\nsecond block");
    let now = Instant::now();
    session.apply_spellcheck_result(&[issue("wrold", 6, 11, &["world"])], now);

    // Split the first paragraph inside the decorated word.
    let inside = session.document().address_at(8);
    session.edit(Cmd::SplitParagraph { at: inside }, now);

    // The word's flat text is still "wrold" (flat view has no separators),
    // but the decorated span now crosses a block boundary the snapshot was
    // not taken over; either outcome must leave a consistent store.
    for m in session.annotations().misspellings() {
        assert_eq!(session.document().text_between(m.range.clone()), m.original);
    }
}

#[test]
fn hover_state_follows_lock_through_a_full_interaction() {
    let mut session = EditorSession::from_plain_text("One two. Three four.");
    let addr = session.document().address_at(3);

    session.pointer_moved(addr);
    let before = session.annotations().hover().expect("hover");

    // A qualifying click locks the highlight in place.
    session.sentence_clicked(addr, true).expect("request");
    assert!(session.annotations().hover_locked());

    // Pointer movement over another sentence changes nothing while locked.
    let other = session.document().address_at(12);
    session.pointer_moved(other);
    assert_eq!(session.annotations().hover(), Some(before.clone()));
    session.pointer_left();
    assert_eq!(session.annotations().hover(), Some(before));

    // Dismissing unlocks and releases the highlight.
    session.dismiss_rewrite();
    assert!(!session.annotations().hover_locked());
    assert_eq!(session.annotations().hover(), None);

    // Normal pointer-driven updates resume immediately.
    session.pointer_moved(other);
    let after = session.annotations().hover().expect("hover resumes");
    assert_eq!(session.document().text_between(after), "Three four.");
}

#[test]
fn any_edit_clears_hover_and_flash() {
    let mut session = EditorSession::from_plain_text("Some sentence here.");
    let now = Instant::now();
    session.pointer_moved(session.document().address_at(2));
    assert!(session.annotations().hover().is_some());

    session.edit(
        Cmd::InsertText {
            at: 1,
            text: "x".into(),
        },
        now,
    );
    assert!(session.annotations().hover().is_none());
    assert!(session.annotations().flash().is_none());
}

#[test]
fn spellcheck_result_maps_flat_offsets_through_paragraphs() {
    // "wrold" sits in the second paragraph; its flat offsets must map to
    // addresses past the structural units.
    let mut session = EditorSession::from_plain_text("good start\nthe wrold here");
    let now = Instant::now();
    let flat = session.document().flat_text();
    let from = flat.find("wrold").unwrap();
    session.apply_spellcheck_result(&[issue("wrold", from, from + 5, &["world"])], now);

    let m = &session.annotations().misspellings()[0];
    assert_eq!(session.document().text_between(m.range.clone()), "wrold");
}
