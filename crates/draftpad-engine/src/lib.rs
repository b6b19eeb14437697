/*!
 * # draftpad-engine
 *
 * The editing core of draftpad: a structured draft document bridged
 * against linear-text services (spellcheck, sentence rewriting) through
 * offset mapping, plus the live decoration state that keeps highlights
 * attached to the right text while the user keeps typing.
 *
 * The pieces, leaves first:
 *
 * - [`editing`]: the block/run document tree, its address space, the
 *   command-based mutation pipeline, the position mapping each mutation
 *   publishes, and flat-offset to address conversion.
 * - [`sentence`]: scan-based sentence boundary detection over flat text.
 * - [`annotations`]: the decoration store with misspelling highlights,
 *   staleness pruning, the hover-sentence singleton and its lock, and the
 *   flash-confirmation singleton.
 * - [`coach`]: external service traits, spellcheck trigger scheduling,
 *   and the rewrite interaction state machine.
 * - [`session`]: `EditorSession`, which owns all of the above and
 *   sequences mutation and decoration remapping atomically per event.
 *
 * Everything is single-threaded and event-driven; async service calls are
 * the only suspension points, and results are applied against whatever
 * document state exists when they land (last write wins, validated by
 * content match afterwards).
 */

pub mod annotations;
pub mod coach;
pub mod config;
pub mod editing;
pub mod sentence;
pub mod session;

pub use annotations::{AnnotationStore, Decoration, DecorationKind, MisspellingDecoration};
pub use coach::{
    MAX_REWRITE_CANDIDATES, RewriteRequest, RewriteService, RewriteState, ServiceError,
    SpellcheckService, SpellingIssue,
};
pub use config::{CoachConfig, SpellcheckConfig};
pub use editing::{AddrMap, Bias, Block, Cmd, Document, Mapped, Patch, TextRun};
pub use sentence::{SentenceBounds, sentence_at};
pub use session::EditorSession;
