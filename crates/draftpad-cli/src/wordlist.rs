//! A dictionary-backed implementation of the engine's spellcheck seam.
//!
//! Looks words up in a plain word list (one word per line, e.g.
//! `/usr/share/dict/words`) and suggests corrections that are one edit
//! away and present in the list. Numeric-only tokens are skipped before
//! submission, matching what the hosted checker does.

use std::collections::HashSet;
use std::path::Path;

use async_trait::async_trait;
use draftpad_engine::{ServiceError, SpellcheckService, SpellingIssue};

const MAX_SUGGESTIONS: usize = 3;

pub struct WordlistSpellchecker {
    known_words: HashSet<String>,
}

impl WordlistSpellchecker {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_words(content.lines()))
    }

    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let known_words = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { known_words }
    }

    pub fn word_count(&self) -> usize {
        self.known_words.len()
    }

    fn is_known(&self, word: &str) -> bool {
        self.known_words.contains(&word.to_lowercase())
    }

    /// Dictionary words one edit (deletion, substitution, transposition or
    /// insertion) away from `word`.
    fn suggest(&self, word: &str) -> Vec<String> {
        let word = word.to_lowercase();
        let chars: Vec<char> = word.chars().collect();
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        let mut consider = |candidate: String, out: &mut Vec<String>| {
            if out.len() < MAX_SUGGESTIONS
                && candidate != word
                && self.known_words.contains(&candidate)
                && seen.insert(candidate.clone())
            {
                out.push(candidate);
            }
        };

        // Transpositions first: they cover the most common typos.
        for i in 0..chars.len().saturating_sub(1) {
            let mut c = chars.clone();
            c.swap(i, i + 1);
            consider(c.into_iter().collect(), &mut out);
        }
        // Deletions.
        for i in 0..chars.len() {
            let mut c = chars.clone();
            c.remove(i);
            consider(c.into_iter().collect(), &mut out);
        }
        // Substitutions and insertions.
        for i in 0..=chars.len() {
            for letter in 'a'..='z' {
                if i < chars.len() {
                    let mut c = chars.clone();
                    c[i] = letter;
                    consider(c.iter().collect(), &mut out);
                }
                let mut c = chars.clone();
                c.insert(i, letter);
                consider(c.into_iter().collect(), &mut out);
            }
        }

        out
    }

    fn check_sync(&self, text: &str) -> Vec<SpellingIssue> {
        let mut issues = Vec::new();
        for (from, token) in tokens(text) {
            if token.chars().all(|c| c.is_ascii_digit()) {
                continue;
            }
            if self.is_known(token) {
                continue;
            }
            issues.push(SpellingIssue {
                word: token.to_string(),
                from,
                to: from + token.len(),
                suggestions: self.suggest(token),
            });
        }
        issues
    }
}

#[async_trait]
impl SpellcheckService for WordlistSpellchecker {
    async fn check(&self, text: &str) -> Result<Vec<SpellingIssue>, ServiceError> {
        Ok(self.check_sync(text))
    }
}

/// Alphanumeric tokens with their byte offsets.
fn tokens(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start = None;
    for (i, ch) in text.char_indices() {
        if ch.is_alphanumeric() || ch == '\'' {
            start.get_or_insert(i);
        } else if let Some(s) = start.take() {
            out.push((s, &text[s..i]));
        }
    }
    if let Some(s) = start {
        out.push((s, &text[s..]));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> WordlistSpellchecker {
        WordlistSpellchecker::from_words(["the", "world", "turns", "it's"])
    }

    #[test]
    fn known_words_produce_no_issues() {
        let issues = checker().check_sync("The world turns.");
        assert!(issues.is_empty());
    }

    #[test]
    fn unknown_words_are_flagged_with_offsets() {
        let issues = checker().check_sync("the wrold turns");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].word, "wrold");
        assert_eq!(issues[0].from, 4);
        assert_eq!(issues[0].to, 9);
    }

    #[test]
    fn transposition_typos_get_suggestions() {
        let issues = checker().check_sync("wrold");
        assert_eq!(issues[0].suggestions, vec!["world".to_string()]);
    }

    #[test]
    fn numeric_tokens_are_skipped() {
        let issues = checker().check_sync("the world in 2026");
        assert!(issues.is_empty());
    }

    #[test]
    fn apostrophes_stay_inside_tokens() {
        let issues = checker().check_sync("it's the world");
        assert!(issues.is_empty());
    }

    #[test]
    fn token_offsets_survive_unicode_prefixes() {
        let issues = checker().check_sync("naïve wrold");
        let wrold = issues.iter().find(|i| i.word == "wrold").unwrap();
        assert_eq!(&"naïve wrold"[wrold.from..wrold.to], "wrold");
    }
}
