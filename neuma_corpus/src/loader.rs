// Corpus discovery and document loading.
//
// On-disk layout of an exported corpus:
//
//   export/
//     <source>/
//       meta.json            source-level metadata (source_id, ...)
//       <document>/
//         meta.json          optional, overrides source-level keys
//         data.json          root node of the document tree
//
// A source directory may also hold `data.json` directly, in which case it is
// itself a single document. Discovery accepts either a single source
// directory (it has `meta.json`) or a directory of them.
//
// Unreadable or malformed documents are logged and skipped; only a failure
// to read the source directory itself fails the source.

use crate::error::CorpusError;
use neuma_patterns::{Document, DocumentMeta};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const META_FILE: &str = "meta.json";
pub const DATA_FILE: &str = "data.json";

/// Source directories under `root`, in path order.
pub fn discover_sources(root: &Path) -> Result<Vec<PathBuf>, CorpusError> {
    if !root.is_dir() {
        return Err(CorpusError::MissingCorpus(root.to_path_buf()));
    }
    if root.join(META_FILE).is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    subdirs_with(root, META_FILE)
}

/// Immediate subdirectories of `dir` that contain `file`, sorted.
fn subdirs_with(dir: &Path, file: &str) -> Result<Vec<PathBuf>, CorpusError> {
    let entries = fs::read_dir(dir).map_err(|source| CorpusError::Read {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| CorpusError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() && path.join(file).is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Documents of one source, plus how many could not be loaded.
#[derive(Debug)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub documents: Vec<Document>,
    pub skipped: usize,
}

/// Load every document of a source directory.
pub fn load_source(dir: &Path) -> Result<LoadedSource, CorpusError> {
    let source_meta = match read_meta(&dir.join(META_FILE)) {
        Ok(meta) => meta,
        Err(e) => {
            tracing::warn!(source = %dir.display(), error = %e, "unusable source metadata, using none");
            Map::new()
        }
    };

    let mut doc_dirs = Vec::new();
    if dir.join(DATA_FILE).is_file() {
        doc_dirs.push(dir.to_path_buf());
    }
    doc_dirs.extend(subdirs_with(dir, DATA_FILE)?);

    let mut documents = Vec::with_capacity(doc_dirs.len());
    let mut skipped = 0;
    for doc_dir in &doc_dirs {
        let own_meta = doc_dir.as_path() != dir;
        match load_document(doc_dir, &source_meta, own_meta) {
            Ok(doc) => documents.push(doc),
            Err(e) => {
                tracing::warn!(error = %e, "skipping document");
                skipped += 1;
            }
        }
    }

    Ok(LoadedSource {
        path: dir.to_path_buf(),
        documents,
        skipped,
    })
}

/// Load one document directory. When `own_meta` is set, the directory's
/// `meta.json` (if any) is layered over the inherited `base_meta`.
pub fn load_document(
    dir: &Path,
    base_meta: &Map<String, Value>,
    own_meta: bool,
) -> Result<Document, CorpusError> {
    let mut meta = base_meta.clone();
    if own_meta {
        // A source-level id never names its member documents.
        meta.remove("document_id");
        meta.extend(read_meta(&dir.join(META_FILE))?);
    }
    let meta = DocumentMeta::from_map(meta);

    let id = meta.document_id().unwrap_or_else(|| {
        dir.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let data_path = dir.join(DATA_FILE);
    let data = read_json(&data_path)?;
    Document::from_value(id.clone(), meta, &data).map_err(|source| CorpusError::Document {
        path: data_path,
        document_id: id,
        source,
    })
}

/// Parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, CorpusError> {
    let text = fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` to `path`, creating parent directories as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), CorpusError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| CorpusError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string(value).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a metadata file. Anything but a JSON object counts as empty.
fn read_meta(path: &Path) -> Result<Map<String, Value>, CorpusError> {
    if !path.is_file() {
        return Ok(Map::new());
    }
    match read_json(path)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write(path: &Path, value: &Value) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_string(value).unwrap()).unwrap();
    }

    fn tree() -> Value {
        json!({"kind": "Root", "children": []})
    }

    #[test]
    fn test_discover_directory_of_sources() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("B/meta.json"), &json!({}));
        write(&tmp.path().join("A/meta.json"), &json!({}));
        fs::create_dir_all(tmp.path().join("not_a_source")).unwrap();

        let sources = discover_sources(tmp.path()).unwrap();
        let names: Vec<String> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["A", "B"]);
    }

    #[test]
    fn test_discover_single_source() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("meta.json"), &json!({}));
        assert_eq!(discover_sources(tmp.path()).unwrap(), [tmp.path().to_path_buf()]);
    }

    #[test]
    fn test_discover_missing_root() {
        let err = discover_sources(Path::new("/nonexistent/corpus")).unwrap_err();
        assert!(matches!(err, CorpusError::MissingCorpus(_)));
    }

    #[test]
    fn test_document_meta_layers_over_source_meta() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("Pa1235");
        write(&src.join("meta.json"), &json!({"source_id": "Pa 1235", "foliostart": "1r"}));
        write(&src.join("d1/meta.json"), &json!({"document_id": "Pa1235_001", "foliostart": "7v"}));
        write(&src.join("d1/data.json"), &tree());
        write(&src.join("d2/data.json"), &tree());

        let loaded = load_source(&src).unwrap();
        assert_eq!(loaded.skipped, 0);
        assert_eq!(loaded.documents.len(), 2);
        let d1 = &loaded.documents[0];
        assert_eq!(d1.id, "Pa1235_001");
        assert_eq!(d1.source_name(), "Pa 1235");
        assert_eq!(d1.meta.initial_context().folio, "7v");
        let d2 = &loaded.documents[1];
        assert_eq!(d2.id, "d2");
        assert_eq!(d2.meta.initial_context().folio, "1r");
    }

    #[test]
    fn test_broken_documents_are_skipped() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("S");
        write(&src.join("meta.json"), &json!({"source_id": "S"}));
        write(&src.join("good/data.json"), &tree());
        write(&src.join("array_root/data.json"), &json!([]));
        fs::create_dir_all(src.join("bad_json")).unwrap();
        fs::write(src.join("bad_json/data.json"), "{not json").unwrap();

        let loaded = load_source(&src).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].id, "good");
        assert_eq!(loaded.skipped, 2);
    }

    #[test]
    fn test_write_json_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/out.json");
        write_json(&path, &json!({"k": [1, 2]})).unwrap();
        assert_eq!(read_json(&path).unwrap(), json!({"k": [1, 2]}));
    }

    #[test]
    fn test_source_directory_as_single_document() {
        let tmp = TempDir::new().unwrap();
        write(&tmp.path().join("meta.json"), &json!({"document_id": "solo", "source": "X"}));
        write(&tmp.path().join("data.json"), &tree());
        let loaded = load_source(tmp.path()).unwrap();
        assert_eq!(loaded.documents.len(), 1);
        assert_eq!(loaded.documents[0].id, "solo");
        assert_eq!(loaded.documents[0].source_name(), "X");
    }
}
