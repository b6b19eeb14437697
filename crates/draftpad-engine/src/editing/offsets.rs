//! The offset mapper: conversion between flat-text indices and document
//! addresses.
//!
//! Spellcheck and rewrite services work on the flat text view; decorations
//! anchor to addresses. Both conversions walk the tree in document order,
//! accumulating consumed flat length at each run. This is O(n) per call,
//! which is fine at essay scale; nothing here is cached.
//!
//! Neither function can fail. Out-of-range input clamps to the nearest
//! valid boundary: an index at or past the flat length maps to the
//! document's terminal address, and an address past the last run maps to
//! the total flat length.

use crate::editing::Document;

/// Convert a flat-text index to a document address.
pub fn address_at(doc: &Document, flat_index: usize) -> usize {
    for run in doc.runs() {
        if flat_index >= run.flat && flat_index < run.flat + run.text.len() {
            return run.addr + (flat_index - run.flat);
        }
    }
    // End of document, or past it.
    doc.end_address()
}

/// Convert a document address to a flat-text index.
pub fn flat_index_at(doc: &Document, addr: usize) -> usize {
    let mut consumed = 0;
    for run in doc.runs() {
        let run_end = run.addr + run.text.len();
        if addr >= run.addr && addr <= run_end {
            return run.flat + (addr - run.addr);
        }
        if run_end <= addr {
            consumed = run.flat + run.text.len();
        } else {
            // The run starts past the address: it sits on a structural
            // unit before this run.
            break;
        }
    }
    consumed
}

impl Document {
    /// See [`address_at`].
    pub fn address_at(&self, flat_index: usize) -> usize {
        address_at(self, flat_index)
    }

    /// See [`flat_index_at`].
    pub fn flat_index_at(&self, addr: usize) -> usize {
        flat_index_at(self, addr)
    }
}
