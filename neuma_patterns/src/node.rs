// Internal document tree and the lowering from external node shapes.
//
// The corpus encodings are loosely typed: the same concept may live under
// several field names, and whether a field exists at all is meaningful. This
// module resolves all of that once, at lowering time, into two tagged unions:
// - `Node` / `NodeKind` for the document tree walked by traverse.rs
//   (folio changes, line changes, zeile containers, syllables, tree-level
//   nonSpaced units, generic containers);
// - `NeumeElement` for the content of a nonSpaced unit (groups, containers,
//   terminal notes), consumed by extract.rs.
//
// Lowering is generic over `SourceNode`, so JSON objects and `AttrNode`s
// produce identical trees. Field-name fallbacks:
// - node children: `children`, else `elements` (first present wins);
// - element children: `neume_components`, `children`, `notes`, `elements`;
// - note octave: `octave`, else `oct`.
//
// Recursion depth is bounded by `MAX_NODE_DEPTH`; deeper input is rejected
// as a whole with `AnalysisError::TooDeep`.

use crate::error::AnalysisError;
use crate::pitch::NoteType;
use crate::source::{Scalar, SourceNode};

/// Deepest nesting accepted in either the document tree or a neume element.
pub const MAX_NODE_DEPTH: usize = 256;

/// Field names searched, in priority order, for the members of an element.
const ELEMENT_CHILD_FIELDS: [&str; 4] = ["neume_components", "children", "notes", "elements"];

/// One node of the document tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Section/division label; when non-empty it overrides the current folio.
    pub label: Option<String>,
    pub kind: NodeKind,
    /// Tree children. Always empty for syllables and nonSpaced units, whose
    /// content is carried by the variant itself.
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// New folio. `folio` is the node's `folio` field, else its `text`.
    FolioChange { folio: Option<String> },
    /// New manuscript line, with an explicit number (`n` or `line`) if given.
    LineChange { explicit: Option<String> },
    /// Visual line wrapper; each one advances the zeile counter.
    ZeileContainer,
    Syllable(Syllable),
    /// A nonSpaced unit appearing directly in the tree.
    NonSpacedGroup { elements: Vec<NeumeElement> },
    /// Any other kind, or none. Traversed through its children.
    Container { kind: Option<String> },
}

/// A sung syllable and its notation.
#[derive(Debug, Clone, PartialEq)]
pub struct Syllable {
    pub text: String,
    /// One element list per `spaced` entry that has a `nonSpaced` field.
    /// `None` when the syllable's `notes` is absent or lacks `spaced`.
    pub units: Option<Vec<Vec<NeumeElement>>>,
}

/// Content of a nonSpaced unit.
#[derive(Debug, Clone, PartialEq)]
pub enum NeumeElement {
    /// Ligature group declared through `grouped`.
    Group(Vec<NeumeElement>),
    /// Neume or other wrapper holding members under a children-like field.
    /// Empty for elements that carry neither members nor note fields.
    Container(Vec<NeumeElement>),
    Note(RawNote),
}

/// A terminal note as encoded, before validity filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNote {
    /// Letter name, only when a non-empty string was present.
    pub base: Option<String>,
    pub octave: Option<i64>,
    pub note_type: NoteType,
    pub liquescent: bool,
}

impl RawNote {
    /// A note is usable when it has a letter and a non-zero octave. The
    /// octave is judged after numeric parsing, so the string `"0"` is
    /// rejected exactly like the number `0`.
    pub fn is_real(&self) -> bool {
        self.base.is_some() && self.octave.is_some_and(|o| o != 0)
    }
}

/// Lower an external tree node (and everything below it).
pub fn lower_node<N: SourceNode>(src: &N) -> Result<Node, AnalysisError> {
    lower_node_at(src, 0)
}

fn lower_node_at<N: SourceNode>(src: &N, depth: usize) -> Result<Node, AnalysisError> {
    if depth > MAX_NODE_DEPTH {
        return Err(AnalysisError::TooDeep {
            limit: MAX_NODE_DEPTH,
        });
    }

    let label = src.truthy_text("label");
    let kind = match src.kind() {
        Some("FolioChange") => NodeKind::FolioChange {
            folio: src
                .scalar("folio")
                .or_else(|| src.scalar("text"))
                .map(|s| s.to_text()),
        },
        Some("LineChange") => NodeKind::LineChange {
            explicit: src.truthy_text("n").or_else(|| src.truthy_text("line")),
        },
        Some("ZeileContainer") => NodeKind::ZeileContainer,
        Some("Syllable") => {
            let syllable = Syllable {
                text: src.scalar("text").map(|s| s.to_text()).unwrap_or_default(),
                units: lower_syllable_units(src, depth)?,
            };
            return Ok(Node {
                label,
                kind: NodeKind::Syllable(syllable),
                children: Vec::new(),
            });
        }
        Some("nonSpaced" | "NonSpacedGroup") => {
            let elements = lower_elements(&node_children(src), depth + 1)?;
            return Ok(Node {
                label,
                kind: NodeKind::NonSpacedGroup { elements },
                children: Vec::new(),
            });
        }
        other => NodeKind::Container {
            kind: other.map(str::to_string),
        },
    };

    let children = node_children(src)
        .into_iter()
        .map(|child| lower_node_at(child, depth + 1))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Node {
        label,
        kind,
        children,
    })
}

fn node_children<N: SourceNode>(src: &N) -> Vec<&N> {
    src.list("children")
        .or_else(|| src.list("elements"))
        .unwrap_or_default()
}

/// Resolve `notes.spaced[*].nonSpaced` into element lists.
fn lower_syllable_units<N: SourceNode>(
    src: &N,
    depth: usize,
) -> Result<Option<Vec<Vec<NeumeElement>>>, AnalysisError> {
    let Some(spaced) = src.node("notes").and_then(|notes| notes.list("spaced")) else {
        return Ok(None);
    };

    let mut units = Vec::with_capacity(spaced.len());
    for entry in spaced {
        // A nonSpaced field is either the element list itself or a node
        // wrapping it under `children`.
        let members = match entry.list("nonSpaced") {
            Some(list) => list,
            None => match entry.node("nonSpaced") {
                Some(wrapper) => wrapper.list("children").unwrap_or_default(),
                None => continue,
            },
        };
        units.push(lower_elements(&members, depth + 1)?);
    }
    Ok(Some(units))
}

fn lower_elements<N: SourceNode>(
    members: &[&N],
    depth: usize,
) -> Result<Vec<NeumeElement>, AnalysisError> {
    members
        .iter()
        .map(|m| lower_element_at(*m, depth))
        .collect()
}

/// Lower one neume element (and its members).
pub fn lower_element<N: SourceNode>(src: &N) -> Result<NeumeElement, AnalysisError> {
    lower_element_at(src, 0)
}

fn lower_element_at<N: SourceNode>(src: &N, depth: usize) -> Result<NeumeElement, AnalysisError> {
    if depth > MAX_NODE_DEPTH {
        return Err(AnalysisError::TooDeep {
            limit: MAX_NODE_DEPTH,
        });
    }

    if let Some(grouped) = src.list("grouped") {
        return Ok(NeumeElement::Group(lower_elements(&grouped, depth + 1)?));
    }

    let members = ELEMENT_CHILD_FIELDS
        .iter()
        .find_map(|field| src.list(field))
        .unwrap_or_default();

    if members.is_empty() && (src.has_field("base") || src.has_field("octave")) {
        return Ok(NeumeElement::Note(lower_note(src)));
    }

    Ok(NeumeElement::Container(lower_elements(&members, depth + 1)?))
}

fn lower_note<N: SourceNode>(src: &N) -> RawNote {
    RawNote {
        base: src.truthy_text("base"),
        octave: src
            .scalar("octave")
            .or_else(|| src.scalar("oct"))
            .and_then(|s| s.as_int()),
        note_type: match src.scalar("noteType") {
            Some(Scalar::Str(name)) => NoteType::from_name(name),
            _ => NoteType::Normal,
        },
        liquescent: src.scalar("liquescent").is_some_and(|s| s.is_truthy()),
    }
}
