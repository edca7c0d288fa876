// Viewer assets bundled into the export: glyph outlines and IIIF manifests.

use crate::error::CorpusError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

/// Glyphs the viewer draws, each read from `<glyph_dir>/<name>.svg`.
pub const GLYPH_NAMES: [&str; 6] = [
    "note",
    "oriscus",
    "quilisma",
    "ascending",
    "descending",
    "strophicus",
];

const DEFAULT_VIEW_BOX: &str = "0 0 10 10";

static VIEW_BOX_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"viewBox="([^"]+)""#).ok());
static PATH_D_RE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#" d="([^"]+)""#).ok());

/// A single SVG outline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Glyph {
    #[serde(rename = "viewBox")]
    pub view_box: String,
    pub d: String,
}

impl Glyph {
    /// Stand-in for a glyph file that does not exist.
    pub fn placeholder() -> Self {
        Glyph {
            view_box: DEFAULT_VIEW_BOX.to_string(),
            d: "M5,5 L10,10".to_string(),
        }
    }

    /// The `viewBox` and the first path `d` of an SVG document.
    pub fn from_svg(svg: &str) -> Self {
        Glyph {
            view_box: first_capture(&VIEW_BOX_RE, svg).unwrap_or_else(|| DEFAULT_VIEW_BOX.to_string()),
            d: first_capture(&PATH_D_RE, svg).unwrap_or_default(),
        }
    }
}

fn first_capture(re: &LazyLock<Option<Regex>>, text: &str) -> Option<String> {
    let re = re.as_ref()?;
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Every entry of `GLYPH_NAMES`, read from `dir`.
pub fn load_glyphs(dir: &Path) -> BTreeMap<String, Glyph> {
    GLYPH_NAMES
        .iter()
        .map(|&name| {
            let path = dir.join(format!("{name}.svg"));
            let glyph = match std::fs::read_to_string(&path) {
                Ok(svg) => Glyph::from_svg(&svg),
                Err(e) => {
                    tracing::warn!(glyph = name, path = %path.display(), error = %e, "glyph unavailable, using placeholder");
                    Glyph::placeholder()
                }
            };
            (name.to_string(), glyph)
        })
        .collect()
}

/// One row of the source table.
#[derive(Debug, Deserialize)]
pub struct ManifestRow {
    #[serde(rename = "Quellensigle", default)]
    pub siglum: Option<String>,
    #[serde(rename = "Manifest", default)]
    pub manifest: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub url: String,
}

/// Siglum -> manifest URL. Rows without a siglum or manifest are skipped.
pub fn parse_manifests(json: &str) -> Result<BTreeMap<String, ManifestEntry>, serde_json::Error> {
    let rows: Vec<ManifestRow> = serde_json::from_str(json)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let siglum = row.siglum.filter(|s| !s.is_empty())?;
            let url = row.manifest.filter(|m| !m.is_empty())?;
            Some((siglum, ManifestEntry { url }))
        })
        .collect())
}

/// Read the manifest table. A missing or malformed file gives an empty map.
pub fn load_manifests(path: &Path) -> BTreeMap<String, ManifestEntry> {
    match read_manifests(path) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "no manifests loaded");
            BTreeMap::new()
        }
    }
}

fn read_manifests(path: &Path) -> Result<BTreeMap<String, ManifestEntry>, CorpusError> {
    let json = std::fs::read_to_string(path).map_err(|source| CorpusError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifests(&json).map_err(|source| CorpusError::Json {
        path: path.to_path_buf(),
        source,
    })
}
