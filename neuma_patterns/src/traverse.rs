// Depth-first document walk with positional context.
//
// A `Walker` owns the provenance context of exactly one document: the
// current folio, line and syllable, plus the zeile counter. It visits the
// lowered tree in document order and, at every syllable (and every
// tree-level nonSpaced unit), runs each unit through pattern.rs and records
// the resulting pattern together with a snapshot of the context.
//
// Per node, in order:
//   1. a non-empty `label` replaces the folio;
//   2. a ZeileContainer advances the zeile counter and sets the line to it;
//   3. kind-specific handling (syllable, nonSpaced, folio change, line change);
//   4. recursion into children, except below syllables and nonSpaced units,
//      whose content has been consumed in step 3.
//
// The zeile counter and LineChange handling both write `line`; whichever
// fired last wins. A LineChange without an explicit number increments a
// numeric line and leaves a non-numeric one (e.g. "7r") untouched. Neither
// counts past `i64::MAX`; at the limit `line` stays as it is.

use crate::aggregate::PatternOccurrence;
use crate::node::{NeumeElement, Node, NodeKind};
use crate::pattern::encode_unit;

/// Provenance position inside one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub folio: String,
    pub line: String,
    pub syllable: String,
}

/// One pattern found in a document, with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPattern {
    pub pattern: String,
    pub occurrence: PatternOccurrence,
}

/// Traversal state for a single document.
#[derive(Debug)]
pub struct Walker<'a> {
    document_id: &'a str,
    context: Context,
    zeile_counter: i64,
    found: Vec<FoundPattern>,
}

impl<'a> Walker<'a> {
    /// Start a walk. `zeile_seed` is the line number the first
    /// ZeileContainer counts up from.
    pub fn new(document_id: &'a str, initial: Context, zeile_seed: i64) -> Self {
        Walker {
            document_id,
            context: initial,
            zeile_counter: zeile_seed,
            found: Vec::new(),
        }
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Visit `node` and everything below it.
    pub fn walk(&mut self, node: &Node) {
        if let Some(label) = &node.label {
            self.context.folio.clone_from(label);
        }

        match &node.kind {
            NodeKind::ZeileContainer => {
                if let Some(next) = self.zeile_counter.checked_add(1) {
                    self.zeile_counter = next;
                    self.context.line = next.to_string();
                }
            }
            NodeKind::Syllable(syllable) => {
                self.context.syllable.clone_from(&syllable.text);
                if let Some(units) = &syllable.units {
                    for unit in units {
                        self.emit_unit(unit);
                    }
                }
                return;
            }
            NodeKind::NonSpacedGroup { elements } => {
                self.emit_unit(elements);
                return;
            }
            NodeKind::FolioChange { folio } => {
                if let Some(folio) = folio {
                    self.context.folio.clone_from(folio);
                }
            }
            NodeKind::LineChange { explicit } => match explicit {
                Some(line) => self.context.line.clone_from(line),
                None => {
                    let next = self
                        .context
                        .line
                        .trim()
                        .parse::<i64>()
                        .ok()
                        .and_then(|n| n.checked_add(1));
                    if let Some(next) = next {
                        self.context.line = next.to_string();
                    }
                }
            },
            NodeKind::Container { .. } => {}
        }

        for child in &node.children {
            self.walk(child);
        }
    }

    fn emit_unit(&mut self, elements: &[NeumeElement]) {
        let Some(unit) = encode_unit(elements) else {
            return;
        };
        self.found.push(FoundPattern {
            pattern: unit.pattern,
            occurrence: PatternOccurrence {
                document_id: self.document_id.to_string(),
                folio: self.context.folio.clone(),
                line: self.context.line.clone(),
                syllable: self.context.syllable.clone(),
                notes: unit.notes,
            },
        });
    }

    /// End the walk and hand back everything found, in document order.
    pub fn finish(self) -> Vec<FoundPattern> {
        self.found
    }
}
