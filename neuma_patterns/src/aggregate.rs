// Corpus-wide accumulation of pattern occurrences.
//
// `AggregateResult` maps source name -> pattern string -> occurrences, in
// the order they were recorded. It is the only state that outlives a single
// document. Partial results (one per worker or per corpus partition) combine
// with `merge`, which concatenates occurrence lists key by key; merging in a
// fixed order gives a deterministic result.
//
// Serialized form (used by the cache and the viewer export):
//   { "<source>": { "<pattern>": [[doc_id, folio, line, syllable, notes], ...] } }

use crate::document::DocumentPatterns;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where one pattern instance was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatternOccurrence {
    pub document_id: String,
    pub folio: String,
    pub line: String,
    pub syllable: String,
    /// Dash-joined note tokens of the whole unit, e.g. `F3-G3-A3`.
    pub notes: String,
}

impl Serialize for PatternOccurrence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (
            &self.document_id,
            &self.folio,
            &self.line,
            &self.syllable,
            &self.notes,
        )
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for PatternOccurrence {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (document_id, folio, line, syllable, notes) =
            <(String, String, String, String, String)>::deserialize(deserializer)?;
        Ok(PatternOccurrence {
            document_id,
            folio,
            line,
            syllable,
            notes,
        })
    }
}

/// Occurrences of each pattern within one source.
pub type PatternTable = BTreeMap<String, Vec<PatternOccurrence>>;

/// Source -> pattern -> occurrences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateResult {
    sources: BTreeMap<String, PatternTable>,
}

impl AggregateResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one occurrence under (source, pattern).
    pub fn record(&mut self, source: &str, pattern: &str, occurrence: PatternOccurrence) {
        self.sources
            .entry(source.to_string())
            .or_default()
            .entry(pattern.to_string())
            .or_default()
            .push(occurrence);
    }

    /// Record everything one document produced, in document order.
    pub fn add_document(&mut self, found: DocumentPatterns) {
        for item in found.patterns {
            self.record(&found.source, &item.pattern, item.occurrence);
        }
    }

    /// Append every occurrence of `other` after this result's own, per key.
    pub fn merge(&mut self, other: AggregateResult) {
        for (source, patterns) in other.sources {
            let table = self.sources.entry(source).or_default();
            for (pattern, occurrences) in patterns {
                table.entry(pattern).or_default().extend(occurrences);
            }
        }
    }

    /// Source names with their pattern tables, in name order.
    pub fn sources(&self) -> impl Iterator<Item = (&str, &PatternTable)> {
        self.sources.iter().map(|(name, table)| (name.as_str(), table))
    }

    pub fn patterns(&self, source: &str) -> Option<&PatternTable> {
        self.sources.get(source)
    }

    /// Occurrences of `pattern` in `source`; empty if either is unknown.
    pub fn occurrences(&self, source: &str, pattern: &str) -> &[PatternOccurrence] {
        self.sources
            .get(source)
            .and_then(|table| table.get(pattern))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of occurrences across all sources and patterns.
    pub fn total_occurrences(&self) -> usize {
        self.sources
            .values()
            .flat_map(BTreeMap::values)
            .map(Vec::len)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occ(doc: &str, notes: &str) -> PatternOccurrence {
        PatternOccurrence {
            document_id: doc.into(),
            folio: "1r".into(),
            line: "2".into(),
            syllable: "ky".into(),
            notes: notes.into(),
        }
    }

    #[test]
    fn test_record_preserves_insertion_order() {
        let mut r = AggregateResult::new();
        r.record("A", "*", occ("d1", "C4"));
        r.record("A", "*", occ("d2", "D4"));
        r.record("A", "[*u]", occ("d1", "C4-D4"));
        let docs: Vec<&str> = r
            .occurrences("A", "*")
            .iter()
            .map(|o| o.document_id.as_str())
            .collect();
        assert_eq!(docs, ["d1", "d2"]);
        assert_eq!(r.total_occurrences(), 3);
        assert!(r.occurrences("B", "*").is_empty());
    }

    #[test]
    fn test_merge_concatenates_per_key() {
        let mut left = AggregateResult::new();
        left.record("A", "*", occ("d1", "C4"));
        let mut right = AggregateResult::new();
        right.record("A", "*", occ("d2", "C4"));
        right.record("B", "*e", occ("d3", "C4-C4"));

        left.merge(right);
        assert_eq!(left.occurrences("A", "*").len(), 2);
        assert_eq!(left.occurrences("A", "*")[1].document_id, "d2");
        assert_eq!(left.occurrences("B", "*e").len(), 1);
        assert_eq!(left.source_count(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let mut r = AggregateResult::new();
        r.record("Src", "[*uO]", occ("doc", "C4-E4"));
        let v = serde_json::to_value(&r).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"Src": {"[*uO]": [["doc", "1r", "2", "ky", "C4-E4"]]}})
        );
        let back: AggregateResult = serde_json::from_value(v).unwrap();
        assert_eq!(back, r);
    }
}
