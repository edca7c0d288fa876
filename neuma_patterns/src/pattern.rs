// Pattern string encoding.
//
// A pattern is a compact contour signature of one nonSpaced unit:
// - `*` marks the first note (it has no predecessor to compare against);
// - every later note contributes its direction from the previous note
//   (`u`, `d`, `e`) followed by its ornament suffix (`O`, `Q`, `L`, `S`, ...);
// - segments of two or more notes (ligatures) are wrapped in `[` `]`;
//   single-note segments never are.
//
// The link step into a segment (previous segment's last note -> this
// segment's first note) is written before the segment's opening bracket, so
// `[C4] [D4 Quilisma, C4]` encodes as `*uQ[d]`.

use crate::extract::{Note, real_notes, segment_groups};
use crate::node::NeumeElement;
use crate::pitch::direction;

/// Pattern and provenance note string of one nonSpaced unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitPattern {
    pub pattern: String,
    pub notes: String,
}

/// Run the full extract -> segment -> encode pipeline over one unit.
/// Returns `None` when the unit has no usable note.
pub fn encode_unit(elements: &[NeumeElement]) -> Option<UnitPattern> {
    let real = real_notes(elements);
    if real.is_empty() {
        return None;
    }
    let segments = segment_groups(elements, &real);
    Some(UnitPattern {
        pattern: encode_pattern(&segments),
        notes: notes_string(&real),
    })
}

/// Encode segments into a pattern string. Empty segments are skipped; no
/// segments at all yields an empty string.
pub fn encode_pattern(segments: &[&[Note]]) -> String {
    let mut out = String::new();
    let mut prev_last: Option<&Note> = None;

    for segment in segments {
        let (Some(first), Some(last)) = (segment.first(), segment.last()) else {
            continue;
        };
        let bracketed = segment.len() > 1;

        match prev_last {
            None => {
                if bracketed {
                    out.push('[');
                }
                out.push('*');
                out.push_str(&first.suffix());
            }
            Some(prev) => {
                push_step(&mut out, prev, first);
                if bracketed {
                    out.push('[');
                }
            }
        }

        for pair in segment.windows(2) {
            push_step(&mut out, &pair[0], &pair[1]);
        }

        if bracketed {
            out.push(']');
        }
        prev_last = Some(last);
    }

    out
}

fn push_step(out: &mut String, from: &Note, to: &Note) {
    out.push_str(direction(from.pitch, to.pitch).as_str());
    out.push_str(&to.suffix());
}

/// Dash-joined provenance tokens, e.g. `C4-D4-C4`.
pub fn notes_string(notes: &[Note]) -> String {
    notes.iter().map(Note::token).collect::<Vec<_>>().join("-")
}
