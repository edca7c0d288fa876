// Errors from corpus loading, caching, configuration and export.
//
// Each variant carries the path involved so a log line alone identifies the
// offending file. Document-level analysis failures wrap `AnalysisError`.

use neuma_patterns::AnalysisError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus directory {} does not exist", .0.display())]
    MissingCorpus(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("document {document_id} in {}: {source}", .path.display())]
    Document {
        path: PathBuf,
        document_id: String,
        source: AnalysisError,
    },
}
