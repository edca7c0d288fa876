// Run configuration for corpus analysis and export.
//
// `CorpusConfig` collects every path and switch the `analyze` binary needs,
// loaded from an optional JSON file. Every field has a default, so a partial
// file (or none at all) is valid; command-line flags override whatever the
// file says. The nested `analysis` block is passed unchanged to the pattern
// engine.
//
// Example:
//   {
//     "corpus_path": "export",
//     "output_file": "ui/public/data.json",
//     "parallel": false,
//     "analysis": { "excluded_id_suffixes": ["TR", "GS"] }
//   }

use crate::error::CorpusError;
use neuma_patterns::AnalysisConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Root of the exported corpus: one source directory, or a directory of
    /// source directories.
    pub corpus_path: PathBuf,
    /// Cached `AggregateResult` from a previous run.
    pub cache_file: PathBuf,
    /// Viewer export written at the end of a run.
    pub output_file: PathBuf,
    /// Directory holding the glyph SVGs.
    pub glyph_dir: PathBuf,
    /// JSON table of source sigla and IIIF manifest URLs.
    pub manifest_file: PathBuf,
    /// Analyze sources on the rayon thread pool.
    pub parallel: bool,
    pub analysis: AnalysisConfig,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        CorpusConfig {
            corpus_path: PathBuf::from("export"),
            cache_file: PathBuf::from("transcription_cache.json"),
            output_file: PathBuf::from("ui/public/data.json"),
            glyph_dir: PathBuf::from("glyphs"),
            manifest_file: PathBuf::from("data/raw/manifests.json"),
            parallel: true,
            analysis: AnalysisConfig::default(),
        }
    }
}

impl CorpusConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Read and parse a config file.
    pub fn load(path: &Path) -> Result<Self, CorpusError> {
        let json = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        CorpusConfig::from_json(&json).map_err(|source| CorpusError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}
