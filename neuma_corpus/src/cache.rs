// On-disk cache of a full corpus analysis.
//
// The cache file is the serialized `AggregateResult` itself, so a cached run
// and a fresh one produce byte-identical exports.

use crate::error::CorpusError;
use crate::loader::write_json;
use neuma_patterns::AggregateResult;
use std::fs;
use std::path::Path;

/// Read a cached result. `Ok(None)` when no cache file exists.
pub fn read_cache(path: &Path) -> Result<Option<AggregateResult>, CorpusError> {
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let result = serde_json::from_str(&text).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(result))
}

/// Write `result` to `path`, creating parent directories as needed.
pub fn write_cache(path: &Path, result: &AggregateResult) -> Result<(), CorpusError> {
    write_json(path, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuma_patterns::PatternOccurrence;
    use tempfile::TempDir;

    #[test]
    fn test_missing_cache_is_none() {
        let tmp = TempDir::new().unwrap();
        assert!(read_cache(&tmp.path().join("cache.json")).unwrap().is_none());
    }

    #[test]
    fn test_write_then_read() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/cache.json");
        let mut result = AggregateResult::new();
        result.record(
            "Pa 1235",
            "[*uO]",
            PatternOccurrence {
                document_id: "d1".into(),
                folio: "12v".into(),
                line: "3".into(),
                syllable: "Ky".into(),
                notes: "C4-E4".into(),
            },
        );
        write_cache(&path, &result).unwrap();
        assert_eq!(read_cache(&path).unwrap(), Some(result));
    }

    #[test]
    fn test_corrupt_cache_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("cache.json");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(read_cache(&path), Err(CorpusError::Json { .. })));
    }
}
