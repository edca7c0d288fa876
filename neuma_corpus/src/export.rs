// The single JSON document the viewer loads.
//
// Shape:
//   {
//     "data":       { source: { pattern: [[doc, folio, line, syllable, notes], ...] } },
//     "stats":      { pattern: { "count": n, "length": chars } },
//     "overallMax": largest occurrence count of any (source, pattern),
//     "glyphs":     { name: { "viewBox": ..., "d": ... } },
//     "manifests":  { siglum: { "url": ... } }
//   }

use crate::assets::{Glyph, ManifestEntry};
use crate::error::CorpusError;
use crate::loader::write_json;
use neuma_patterns::AggregateResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStats {
    /// Occurrences summed over all sources.
    pub count: usize,
    /// Pattern length in characters.
    pub length: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub data: AggregateResult,
    pub stats: BTreeMap<String, PatternStats>,
    pub overall_max: usize,
    pub glyphs: BTreeMap<String, Glyph>,
    pub manifests: BTreeMap<String, ManifestEntry>,
}

/// Per-pattern totals and the largest single (source, pattern) count.
pub fn pattern_stats(result: &AggregateResult) -> (BTreeMap<String, PatternStats>, usize) {
    let mut stats: BTreeMap<String, PatternStats> = BTreeMap::new();
    let mut overall_max = 0;
    for (_, table) in result.sources() {
        for (pattern, occurrences) in table {
            let entry = stats.entry(pattern.clone()).or_insert_with(|| PatternStats {
                count: 0,
                length: pattern.chars().count(),
            });
            entry.count += occurrences.len();
            overall_max = overall_max.max(occurrences.len());
        }
    }
    (stats, overall_max)
}

pub fn build_export(
    result: AggregateResult,
    glyphs: BTreeMap<String, Glyph>,
    manifests: BTreeMap<String, ManifestEntry>,
) -> ExportDocument {
    let (stats, overall_max) = pattern_stats(&result);
    ExportDocument {
        data: result,
        stats,
        overall_max,
        glyphs,
        manifests,
    }
}

/// Write the export, creating parent directories as needed.
pub fn write_export(export: &ExportDocument, path: &Path) -> Result<(), CorpusError> {
    write_json(path, export)?;
    tracing::info!(path = %path.display(), patterns = export.stats.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuma_patterns::PatternOccurrence;
    use serde_json::json;
    use tempfile::TempDir;

    fn occ(doc: &str) -> PatternOccurrence {
        PatternOccurrence {
            document_id: doc.into(),
            folio: "1r".into(),
            line: "1".into(),
            syllable: "a".into(),
            notes: "C4".into(),
        }
    }

    fn sample() -> AggregateResult {
        let mut r = AggregateResult::new();
        r.record("A", "*", occ("a1"));
        r.record("A", "*", occ("a2"));
        r.record("A", "[*uO]", occ("a1"));
        r.record("B", "*", occ("b1"));
        r.record("B", "*", occ("b2"));
        r.record("B", "*", occ("b3"));
        r
    }

    #[test]
    fn test_stats_sum_across_sources() {
        let (stats, overall_max) = pattern_stats(&sample());
        assert_eq!(stats["*"], PatternStats { count: 5, length: 1 });
        assert_eq!(stats["[*uO]"], PatternStats { count: 1, length: 5 });
        assert_eq!(overall_max, 3);
    }

    #[test]
    fn test_empty_result() {
        let (stats, overall_max) = pattern_stats(&AggregateResult::new());
        assert!(stats.is_empty());
        assert_eq!(overall_max, 0);
    }

    #[test]
    fn test_export_json_keys() {
        let export = build_export(sample(), BTreeMap::new(), BTreeMap::new());
        let v = serde_json::to_value(&export).unwrap();
        assert_eq!(v["overallMax"], json!(3));
        assert_eq!(v["stats"]["*"], json!({"count": 5, "length": 1}));
        assert_eq!(v["data"]["B"]["*"][2], json!(["b3", "1r", "1", "a", "C4"]));
        assert!(v.get("glyphs").is_some());
        assert!(v.get("manifests").is_some());
    }

    #[test]
    fn test_write_export_creates_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ui/public/data.json");
        let export = build_export(sample(), BTreeMap::new(), BTreeMap::new());
        write_export(&export, &path).unwrap();
        let back: ExportDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, export);
    }
}
