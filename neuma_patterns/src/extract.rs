// Note extraction and group segmentation for one nonSpaced unit.
//
// A nonSpaced unit is a list of top-level neume elements, each possibly a
// nested group or container. Pattern encoding needs two views of it:
// - the flat, ordered list of usable notes (`real_notes`), from which the
//   provenance note string and all pitch comparisons are taken;
// - the original element boundaries (`segment_groups`), which decide where
//   ligature brackets and link directions go.
//
// Segmentation works by counting: each top-level element claims as many
// entries from the front of the real-note list as it has raw (unfiltered)
// terminal notes. When an element mixes usable and incomplete notes, its
// claim is larger than its usable content and the boundaries that follow
// shift left. That behavior is kept as-is; the provenance string and the
// note total are unaffected, only bracket placement can drift.

use crate::node::{NeumeElement, RawNote};
use crate::pitch::{NoteType, pitch_ordinal, suffix};

/// A usable note: letter and octave both present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub base: String,
    pub octave: i32,
    pub note_type: NoteType,
    pub liquescent: bool,
    /// Ordinal from `pitch_ordinal`, cached for direction comparisons.
    pub pitch: i64,
}

impl Note {
    pub fn new(base: impl Into<String>, octave: i32, note_type: NoteType, liquescent: bool) -> Self {
        let base = base.into();
        let pitch = pitch_ordinal(&base, octave);
        Note {
            base,
            octave,
            note_type,
            liquescent,
            pitch,
        }
    }

    /// Promote a raw note, or `None` if it lacks a letter or a usable octave.
    pub fn from_raw(raw: &RawNote) -> Option<Note> {
        if !raw.is_real() {
            return None;
        }
        let base = raw.base.as_deref()?;
        let octave = i32::try_from(raw.octave?).ok()?;
        Some(Note::new(base, octave, raw.note_type, raw.liquescent))
    }

    /// Ornament suffix of this note.
    pub fn suffix(&self) -> String {
        suffix(self.note_type, self.liquescent)
    }

    /// Provenance token, e.g. `G3`.
    pub fn token(&self) -> String {
        format!("{}{}", self.base, self.octave)
    }
}

/// Flatten an element into its terminal notes, in order, without filtering.
pub fn raw_notes(element: &NeumeElement) -> Vec<&RawNote> {
    let mut out = Vec::new();
    collect_raw(element, &mut out);
    out
}

fn collect_raw<'a>(element: &'a NeumeElement, out: &mut Vec<&'a RawNote>) {
    match element {
        NeumeElement::Group(members) | NeumeElement::Container(members) => {
            for member in members {
                collect_raw(member, out);
            }
        }
        NeumeElement::Note(raw) => out.push(raw),
    }
}

/// Number of terminal notes under an element, usable or not.
pub fn raw_note_count(element: &NeumeElement) -> usize {
    match element {
        NeumeElement::Group(members) | NeumeElement::Container(members) => {
            members.iter().map(raw_note_count).sum()
        }
        NeumeElement::Note(_) => 1,
    }
}

/// All usable notes of a unit, flattened in element order. Incomplete notes
/// are dropped silently.
pub fn real_notes(elements: &[NeumeElement]) -> Vec<Note> {
    elements
        .iter()
        .flat_map(raw_notes)
        .filter_map(Note::from_raw)
        .collect()
}

/// Split `real` back into one contiguous segment per top-level element.
///
/// Elements whose claim falls entirely past the end of `real` produce no
/// segment. The segments always cover `real` exactly when the elements are
/// the ones `real` was extracted from.
pub fn segment_groups<'a>(elements: &[NeumeElement], real: &'a [Note]) -> Vec<&'a [Note]> {
    let mut segments = Vec::with_capacity(elements.len());
    let mut start = 0;
    for element in elements {
        let claim = raw_note_count(element);
        if claim == 0 {
            continue;
        }
        let end = (start + claim).min(real.len());
        if end > start {
            segments.push(&real[start..end]);
        }
        start = end;
    }
    segments
}
