/*!
 * Editing core: document tree, addressing, and the mutation pipeline.
 *
 * ## Architecture
 *
 * The editable draft is a tree of [`Block`]s (paragraphs), each holding an
 * ordered sequence of [`TextRun`]s. Every node occupies a contiguous span
 * of a single global address space: a block's opening token consumes one
 * unit, each run consumes its byte length, and the block's closing token
 * consumes one more unit. Addresses are strictly increasing in document
 * order and the terminal address equals the total content size.
 *
 * Alongside the address space there is a *flat text view*: the
 * concatenation of all run texts with no structural separators. External
 * services (spellcheck, rewrite) and sentence detection work on flat
 * offsets; decorations anchor to addresses. The [`offsets`] module converts
 * between the two by tree traversal.
 *
 * All changes flow through [`Document::apply`] as [`Cmd`]s. Applying a
 * command mutates the tree and returns a [`Patch`] whose [`AddrMap`]
 * describes how old addresses moved; anything holding addresses (the
 * annotation store, a pending rewrite request) remaps through it. Range
 * starts map with [`Bias::After`] and ends with [`Bias::Before`], so text
 * inserted exactly at a decoration's edge lands outside it.
 *
 * ## Module structure
 *
 * - **`document`**: the tree, traversal, and tree surgery primitives
 * - **`commands`**: `Cmd` enum, clamped resolution, mapping derivation
 * - **`mapping`**: `AddrMap` position mapping with biased lookup
 * - **`offsets`**: flat index to address conversion and back (the offset mapper)
 * - **`patch`**: edit result metadata
 */

pub mod commands;
pub mod document;
pub mod mapping;
pub mod offsets;
pub mod patch;

pub use commands::Cmd;
pub use document::{Block, Document, TextRun};
pub use mapping::{AddrMap, Bias, Mapped};
pub use offsets::{address_at, flat_index_at};
pub use patch::Patch;
