// Neuma pattern engine.
//
// Derives compact melodic-contour patterns from digitized chant notation.
// A document tree (folios, lines, syllables, neume groups, notes) is walked
// depth-first while tracking provenance; each nonSpaced unit under a syllable
// is flattened into notes, re-segmented along its original neume boundaries,
// and encoded into a short string such as `*uQ[dL]`. Occurrences are
// aggregated per manuscript source and pattern.
//
// Architecture:
// - pitch.rs: pitch ordinals, direction codes, ornament suffixes
// - source.rs: `SourceNode` input boundary (JSON objects and `AttrNode`s)
// - node.rs: internal tree (`Node`, `NeumeElement`) and lowering
// - extract.rs: note flattening, validity filtering, group segmentation
// - pattern.rs: pattern string encoding for one unit
// - traverse.rs: context-propagating walk (`Walker`, `Context`)
// - document.rs: `Document`, metadata, exclusion filter, per-document entry
// - aggregate.rs: source -> pattern -> occurrences accumulation and merge
// - error.rs: `AnalysisError`
//
// No I/O happens in this crate; corpus loading, caching and export live in
// `neuma_corpus`.

pub mod aggregate;
pub mod document;
pub mod error;
pub mod extract;
pub mod node;
pub mod pattern;
pub mod pitch;
pub mod source;
pub mod traverse;

pub use aggregate::{AggregateResult, PatternOccurrence, PatternTable};
pub use document::{
    AnalysisConfig, Document, DocumentMeta, DocumentPatterns, analyze_document, analyze_documents,
};
pub use error::AnalysisError;
pub use pattern::{encode_pattern, encode_unit};
pub use pitch::{Direction, NoteType, direction, pitch_ordinal, suffix};
pub use source::{AttrNode, SourceNode};
