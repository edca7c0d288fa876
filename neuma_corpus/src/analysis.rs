// Whole-corpus analysis.
//
// Sources are independent, so each is loaded and analyzed on its own (on the
// rayon pool when `parallel` is set). Per-source results are merged in
// discovery order, which keeps occurrence lists identical between parallel
// and sequential runs. A source that fails to load is logged and left out.

use crate::cache::{read_cache, write_cache};
use crate::config::CorpusConfig;
use crate::error::CorpusError;
use crate::loader::{discover_sources, load_source};
use neuma_patterns::{AggregateResult, AnalysisConfig, analyze_document};
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const PROGRESS_EVERY: usize = 10;

/// Load and analyze every document of one source directory.
pub fn analyze_source(dir: &Path, config: &AnalysisConfig) -> Result<AggregateResult, CorpusError> {
    let loaded = load_source(dir)?;
    let total = loaded.documents.len();
    let mut result = AggregateResult::new();
    for (i, doc) in loaded.documents.iter().enumerate() {
        if let Some(found) = analyze_document(doc, config) {
            result.add_document(found);
        }
        if (i + 1) % PROGRESS_EVERY == 0 {
            tracing::info!(source = %dir.display(), done = i + 1, total, "analyzing");
        }
    }
    tracing::debug!(
        source = %dir.display(),
        documents = total,
        skipped = loaded.skipped,
        occurrences = result.total_occurrences(),
        "source analyzed"
    );
    Ok(result)
}

/// Analyze every source under `config.corpus_path`.
pub fn analyze_corpus(config: &CorpusConfig) -> Result<AggregateResult, CorpusError> {
    let sources = discover_sources(&config.corpus_path)?;
    tracing::info!(
        corpus = %config.corpus_path.display(),
        sources = sources.len(),
        parallel = config.parallel,
        "analyzing corpus"
    );

    let analyze = |dir: &PathBuf| match analyze_source(dir, &config.analysis) {
        Ok(result) => Some(result),
        Err(e) => {
            tracing::warn!(source = %dir.display(), error = %e, "skipping source");
            None
        }
    };
    let per_source: Vec<Option<AggregateResult>> = if config.parallel {
        sources.par_iter().map(analyze).collect()
    } else {
        sources.iter().map(analyze).collect()
    };

    let mut merged = AggregateResult::new();
    for result in per_source.into_iter().flatten() {
        merged.merge(result);
    }
    tracing::info!(
        sources = merged.source_count(),
        occurrences = merged.total_occurrences(),
        "corpus analyzed"
    );
    Ok(merged)
}

/// Return the cached analysis if present and readable, otherwise analyze
/// the corpus and refresh the cache. `refresh` ignores any existing cache.
pub fn load_or_analyze(config: &CorpusConfig, refresh: bool) -> Result<AggregateResult, CorpusError> {
    if !refresh {
        match read_cache(&config.cache_file) {
            Ok(Some(cached)) => {
                tracing::info!(cache = %config.cache_file.display(), "using cached analysis");
                return Ok(cached);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "unreadable cache, reprocessing"),
        }
    }

    let result = analyze_corpus(config)?;
    if let Err(e) = write_cache(&config.cache_file, &result) {
        tracing::warn!(error = %e, "could not write cache");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    fn one_note_doc(base: &str) -> Value {
        json!({"kind": "RootContainer", "children": [
            {"kind": "Syllable", "text": "la", "notes": {"spaced": [
                {"nonSpaced": [{"base": base, "octave": 4}]}
            ]}}
        ]})
    }

    fn corpus(tmp: &TempDir, sources: usize, docs: usize) -> CorpusConfig {
        for s in 0..sources {
            let src = tmp.path().join(format!("corpus/S{s}"));
            write(&src.join("meta.json"), &json!({"source_id": format!("Source {s}")}));
            for d in 0..docs {
                write(&src.join(format!("d{d:02}/data.json")), &one_note_doc("C"));
            }
        }
        CorpusConfig {
            corpus_path: tmp.path().join("corpus"),
            cache_file: tmp.path().join("cache.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let tmp = TempDir::new().unwrap();
        let mut config = corpus(&tmp, 4, 12);
        let parallel = analyze_corpus(&config).unwrap();
        config.parallel = false;
        let sequential = analyze_corpus(&config).unwrap();
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.source_count(), 4);
        assert_eq!(parallel.occurrences("Source 2", "*").len(), 12);
    }

    #[test]
    fn test_occurrences_follow_document_order() {
        let tmp = TempDir::new().unwrap();
        let config = corpus(&tmp, 1, 3);
        let result = analyze_corpus(&config).unwrap();
        let ids: Vec<&str> = result
            .occurrences("Source 0", "*")
            .iter()
            .map(|o| o.document_id.as_str())
            .collect();
        assert_eq!(ids, ["d00", "d01", "d02"]);
    }

    #[test]
    fn test_cache_is_reused_until_refresh() {
        let tmp = TempDir::new().unwrap();
        let config = corpus(&tmp, 1, 1);
        let first = load_or_analyze(&config, false).unwrap();
        assert!(config.cache_file.is_file());

        // New documents are invisible while the cache stands.
        write(
            &tmp.path().join("corpus/S0/d99/data.json"),
            &one_note_doc("D"),
        );
        assert_eq!(load_or_analyze(&config, false).unwrap(), first);

        let refreshed = load_or_analyze(&config, true).unwrap();
        assert_eq!(refreshed.occurrences("Source 0", "*").len(), 2);
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_analysis() {
        let tmp = TempDir::new().unwrap();
        let config = corpus(&tmp, 1, 2);
        fs::write(&config.cache_file, "not json").unwrap();
        let result = load_or_analyze(&config, false).unwrap();
        assert_eq!(result.total_occurrences(), 2);
        assert_eq!(read_cache(&config.cache_file).unwrap(), Some(result));
    }

    #[test]
    fn test_missing_corpus_is_an_error() {
        let config = CorpusConfig {
            corpus_path: PathBuf::from("/nonexistent/corpus"),
            ..Default::default()
        };
        assert!(matches!(
            analyze_corpus(&config),
            Err(CorpusError::MissingCorpus(_))
        ));
    }
}
