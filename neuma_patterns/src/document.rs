// Documents, their metadata, and per-document analysis.
//
// A `Document` is one manuscript unit: an id, a free-form metadata map, and
// the lowered tree. Building one (`from_value` / `from_source`) is the only
// fallible step; a built document always analyzes.
//
// Metadata keys read here:
// - `source_id`, else `source`: the aggregation key (`"Unknown"` if neither);
// - `initial_folio`, else `foliostart`: starting folio;
// - `initial_line`, else `zeilenstart`: starting line, also the seed of the
//   zeile counter when it parses as an integer (0 otherwise).
//
// Documents whose id ends with one of `AnalysisConfig::excluded_id_suffixes`
// (transcription copies `TR` and ghost sources `GS` by default) are skipped
// before any traversal.

use crate::aggregate::AggregateResult;
use crate::error::AnalysisError;
use crate::node::{Node, lower_node};
use crate::source::SourceNode;
use crate::traverse::{Context, FoundPattern, Walker};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Source name used when the metadata names none.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Key-value metadata attached to a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentMeta(Map<String, Value>);

impl DocumentMeta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(map: Map<String, Value>) -> Self {
        DocumentMeta(map)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// A field as text: non-empty strings and numbers count, anything else
    /// (missing, null, empty string, bool, nested) does not.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// First of `keys` that yields text.
    fn first_text(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|k| self.text(k))
    }

    pub fn source_name(&self) -> String {
        self.first_text(&["source_id", "source"])
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string())
    }

    pub fn document_id(&self) -> Option<String> {
        self.text("document_id")
    }

    /// Context a traversal of this document starts from.
    pub fn initial_context(&self) -> Context {
        Context {
            folio: self
                .first_text(&["initial_folio", "foliostart"])
                .unwrap_or_default(),
            line: self
                .first_text(&["initial_line", "zeilenstart"])
                .unwrap_or_else(|| "0".to_string()),
            syllable: String::new(),
        }
    }
}

/// Analysis settings shared by every document of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Document ids ending with any of these are excluded.
    pub excluded_id_suffixes: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            excluded_id_suffixes: vec!["TR".to_string(), "GS".to_string()],
        }
    }
}

impl AnalysisConfig {
    pub fn is_excluded(&self, document_id: &str) -> bool {
        self.excluded_id_suffixes
            .iter()
            .any(|suffix| !suffix.is_empty() && document_id.ends_with(suffix.as_str()))
    }
}

/// One manuscript document, ready for analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub meta: DocumentMeta,
    pub data: Node,
}

impl Document {
    /// Build from a JSON tree. The root must be an object.
    pub fn from_value(
        id: impl Into<String>,
        meta: DocumentMeta,
        data: &Value,
    ) -> Result<Self, AnalysisError> {
        let id = id.into();
        if !data.is_object() {
            return Err(AnalysisError::RootNotANode { document_id: id });
        }
        Document::from_source(id, meta, data)
    }

    /// Build from any supported node shape.
    pub fn from_source<N: SourceNode>(
        id: impl Into<String>,
        meta: DocumentMeta,
        data: &N,
    ) -> Result<Self, AnalysisError> {
        Ok(Document {
            id: id.into(),
            meta,
            data: lower_node(data)?,
        })
    }

    pub fn source_name(&self) -> String {
        self.meta.source_name()
    }
}

/// Everything one document contributed, keyed by its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPatterns {
    pub source: String,
    pub patterns: Vec<FoundPattern>,
}

/// Walk one document. Returns `None` for excluded documents.
pub fn analyze_document(doc: &Document, config: &AnalysisConfig) -> Option<DocumentPatterns> {
    if config.is_excluded(&doc.id) {
        tracing::debug!(document_id = %doc.id, "skipping excluded document");
        return None;
    }

    let initial = doc.meta.initial_context();
    let zeile_seed = initial.line.trim().parse().unwrap_or(0);
    let mut walker = Walker::new(&doc.id, initial, zeile_seed);
    walker.walk(&doc.data);
    let patterns = walker.finish();

    tracing::debug!(document_id = %doc.id, patterns = patterns.len(), "document analyzed");
    Some(DocumentPatterns {
        source: doc.source_name(),
        patterns,
    })
}

/// Analyze documents in order into one aggregate.
pub fn analyze_documents<'a, I>(docs: I, config: &AnalysisConfig) -> AggregateResult
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut result = AggregateResult::new();
    for doc in docs {
        if let Some(found) = analyze_document(doc, config) {
            result.add_document(found);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::AttrNode;
    use serde_json::json;

    fn one_note_doc(id: &str, meta: DocumentMeta) -> Document {
        let data = json!({"kind": "Root", "children": [
            {"kind": "Syllable", "text": "al", "notes": {"spaced": [
                {"nonSpaced": [{"base": "G", "octave": 3}]}
            ]}}
        ]});
        Document::from_value(id, meta, &data).unwrap()
    }

    #[test]
    fn test_source_name_resolution() {
        let both = DocumentMeta::new().with("source_id", "Pa 1235").with("source", "other");
        assert_eq!(both.source_name(), "Pa 1235");
        let fallback = DocumentMeta::new().with("source_id", "").with("source", "Ba 5");
        assert_eq!(fallback.source_name(), "Ba 5");
        assert_eq!(DocumentMeta::new().source_name(), UNKNOWN_SOURCE);
    }

    #[test]
    fn test_initial_context_precedence() {
        let meta = DocumentMeta::new()
            .with("foliostart", "10r")
            .with("zeilenstart", 4)
            .with("initial_folio", "11v");
        let ctx = meta.initial_context();
        assert_eq!(ctx.folio, "11v");
        assert_eq!(ctx.line, "4");
        assert_eq!(DocumentMeta::new().initial_context().line, "0");
    }

    #[test]
    fn test_excluded_suffixes() {
        let config = AnalysisConfig::default();
        assert!(config.is_excluded("Pa1235_017TR"));
        assert!(config.is_excluded("X_GS"));
        assert!(!config.is_excluded("TR_first"));
        assert!(!config.is_excluded("Pa1235_017"));
    }

    #[test]
    fn test_excluded_document_contributes_nothing() {
        let doc = one_note_doc("abcTR", DocumentMeta::new().with("source_id", "S"));
        assert_eq!(analyze_document(&doc, &AnalysisConfig::default()), None);
        let result = analyze_documents([&doc], &AnalysisConfig::default());
        assert!(result.is_empty());
    }

    #[test]
    fn test_analyze_document_uses_meta() {
        let meta = DocumentMeta::new()
            .with("source_id", "S")
            .with("foliostart", "3r")
            .with("zeilenstart", "2");
        let doc = one_note_doc("d7", meta);
        let found = analyze_document(&doc, &AnalysisConfig::default()).unwrap();
        assert_eq!(found.source, "S");
        let occ = &found.patterns[0].occurrence;
        assert_eq!(
            (occ.folio.as_str(), occ.line.as_str(), occ.syllable.as_str()),
            ("3r", "2", "al")
        );
    }

    #[test]
    fn test_zeile_seed_from_initial_line() {
        let data = json!({"kind": "Root", "children": [
            {"kind": "ZeileContainer", "children": [
                {"kind": "Syllable", "text": "x", "notes": {"spaced": [
                    {"nonSpaced": [{"base": "C", "octave": 4}]}
                ]}}
            ]}
        ]});
        let meta = DocumentMeta::new().with("zeilenstart", "6");
        let doc = Document::from_value("d", meta, &data).unwrap();
        let found = analyze_document(&doc, &AnalysisConfig::default()).unwrap();
        assert_eq!(found.patterns[0].occurrence.line, "7");
    }

    #[test]
    fn test_huge_octaves_encode_in_order() {
        let data = json!({"kind": "Root", "children": [
            {"kind": "Syllable", "text": "hi", "notes": {"spaced": [
                {"nonSpaced": [{"grouped": [
                    {"base": "C", "octave": 200_000_000},
                    {"base": "D", "octave": 200_000_000},
                    {"base": "E", "octave": 5_000_000_000_i64}
                ]}]}
            ]}}
        ]});
        let doc = Document::from_value("d", DocumentMeta::new(), &data).unwrap();
        let found = analyze_document(&doc, &AnalysisConfig::default()).unwrap();
        // An octave outside the i32 range is not a usable note.
        assert_eq!(found.patterns[0].pattern, "[*u]");
        assert_eq!(found.patterns[0].occurrence.notes, "C200000000-D200000000");
    }

    #[test]
    fn test_maximal_start_lines_do_not_overflow() {
        let data = json!({"kind": "Root", "children": [
            {"kind": "LineChange"},
            {"kind": "ZeileContainer", "children": [
                {"kind": "Syllable", "text": "x", "notes": {"spaced": [
                    {"nonSpaced": [{"base": "C", "octave": 4}]}
                ]}}
            ]}
        ]});
        let max = i64::MAX.to_string();
        for key in ["zeilenstart", "initial_line"] {
            let meta = DocumentMeta::new().with(key, max.as_str());
            let doc = Document::from_value("d", meta, &data).unwrap();
            let found = analyze_document(&doc, &AnalysisConfig::default()).unwrap();
            assert_eq!(found.patterns[0].occurrence.line, max);
        }
    }

    #[test]
    fn test_root_must_be_object() {
        let err = Document::from_value("bad", DocumentMeta::new(), &json!([1, 2])).unwrap_err();
        assert!(matches!(err, AnalysisError::RootNotANode { .. }));
    }

    #[test]
    fn test_attr_document() {
        let root = AttrNode::new("Root").with(
            "children",
            vec![AttrNode::new("Syllable").with("text", "la").with(
                "notes",
                AttrNode::untyped().with(
                    "spaced",
                    vec![AttrNode::untyped().with(
                        "nonSpaced",
                        vec![AttrNode::untyped().with("base", "A").with("octave", 3)],
                    )],
                ),
            )],
        );
        let doc = Document::from_source("attr", DocumentMeta::new(), &root).unwrap();
        let found = analyze_document(&doc, &AnalysisConfig::default()).unwrap();
        assert_eq!(found.source, UNKNOWN_SOURCE);
        assert_eq!(found.patterns[0].pattern, "*");
        assert_eq!(found.patterns[0].occurrence.notes, "A3");
    }
}
