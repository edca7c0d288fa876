// Corpus tooling around the neuma pattern engine.
//
// Loads an exported transcription corpus from disk, runs the pattern engine
// over every source (in parallel on rayon), caches the aggregate, and writes
// the JSON bundle the viewer consumes.
//
// - config.rs: `CorpusConfig` (paths, parallelism, analysis options)
// - loader.rs: source discovery, document loading, JSON file helpers
// - analysis.rs: per-source and whole-corpus analysis, cache-or-analyze
// - cache.rs: aggregate cache file
// - assets.rs: glyph SVG outlines and IIIF manifest table
// - export.rs: viewer export document and pattern statistics
// - logging.rs: tracing subscriber (`NEUMA_LOG`)
// - error.rs: `CorpusError`

pub mod analysis;
pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;

pub use analysis::{analyze_corpus, analyze_source, load_or_analyze};
pub use config::CorpusConfig;
pub use error::CorpusError;
pub use export::{ExportDocument, build_export, write_export};
