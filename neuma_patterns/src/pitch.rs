// Pitch ordinals, melodic direction, and ornament suffixes.
//
// The three leaf encoders of the pattern alphabet:
// - `pitch_ordinal`: diatonic letter + octave -> a single integer used only
//   as a total order key (C4 = 48, A4 = 57). Not an acoustic pitch; there are
//   no accidentals in the source encodings.
// - `direction`: compares two ordinals -> `u` / `d` / `e`.
// - `suffix`: note type + liquescent flag -> `O`, `Q`, `L`, `S`, combinations
//   with a trailing `L`, or nothing.
//
// Used by pattern.rs for every emitted step of a pattern string.

use serde::{Deserialize, Serialize};

/// Semitone offset of a diatonic letter above C. Unknown letters (including
/// multi-character strings) map to 0 rather than failing.
fn diatonic_offset(base: &str) -> i32 {
    match base.to_ascii_uppercase().as_str() {
        "C" => 0,
        "D" => 2,
        "E" => 4,
        "F" => 5,
        "G" => 7,
        "A" => 9,
        "B" => 11,
        _ => 0,
    }
}

/// Map a note letter and octave to a comparable ordinal: `octave * 12 + offset`.
/// Computed in `i64`, so every `i32` octave has an exact ordinal.
pub fn pitch_ordinal(base: &str, octave: i32) -> i64 {
    i64::from(octave) * 12 + i64::from(diatonic_offset(base))
}

/// Melodic motion between two consecutive notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Equal,
}

impl Direction {
    /// The single-letter code used in pattern strings.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "u",
            Direction::Down => "d",
            Direction::Equal => "e",
        }
    }
}

/// Classify the motion from ordinal `p1` to ordinal `p2`.
pub fn direction(p1: i64, p2: i64) -> Direction {
    if p2 > p1 {
        Direction::Up
    } else if p2 < p1 {
        Direction::Down
    } else {
        Direction::Equal
    }
}

/// Notated shape of a single note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NoteType {
    #[default]
    Normal,
    Oriscus,
    Quilisma,
    Liquescent,
    Strophicus,
}

impl NoteType {
    /// Parse the `noteType` string of a source encoding. Anything unrecognized
    /// is treated as a plain note.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Oriscus" => NoteType::Oriscus,
            "Quilisma" => NoteType::Quilisma,
            "Liquescent" => NoteType::Liquescent,
            "Strophicus" => NoteType::Strophicus,
            _ => NoteType::Normal,
        }
    }

    fn code(self) -> &'static str {
        match self {
            NoteType::Normal => "",
            NoteType::Oriscus => "O",
            NoteType::Quilisma => "Q",
            NoteType::Liquescent => "L",
            NoteType::Strophicus => "S",
        }
    }
}

/// Ornament suffix for a note. A liquescent flag adds `L` unless the type
/// code already contains it, so the result never holds `LL`.
pub fn suffix(note_type: NoteType, liquescent: bool) -> String {
    let mut s = String::from(note_type.code());
    if liquescent && !s.contains('L') {
        s.push('L');
    }
    s
}
