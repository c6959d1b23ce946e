//! Note arithmetic — chromatic indices, pitch values and semitone distances.
//!
//! Pitch is a total integer order over (note name, octave) pairs:
//! `octave * 12 + chromatic index`, with the chromatic scale enumerated in
//! sharp spellings. All functions here are pure.

use crate::error::ResolveError;

/// The twelve note names of one octave, sharp spellings only, starting at C.
pub const CHROMATIC_SCALE: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Position (0-11) of a sharp-spelled note name within one octave.
pub fn chromatic_index(name: &str) -> Result<i32, ResolveError> {
    CHROMATIC_SCALE
        .iter()
        .position(|&n| n == name)
        .map(|i| i as i32)
        .ok_or_else(|| ResolveError::InvalidNoteName {
            name: name.to_string(),
        })
}

/// Integer pitch of a note: `octave * 12 + chromatic_index(name)`.
///
/// The octave is unbounded; a larger octave always yields a strictly
/// larger pitch for the same note name.
pub fn pitch_value(name: &str, octave: i32) -> Result<i32, ResolveError> {
    Ok(octave * 12 + chromatic_index(name)?)
}

/// Signed distance in semitones between two notes. Positive means the
/// first note is higher than the second.
pub fn semitone_distance(
    note_a: &str,
    octave_a: i32,
    note_b: &str,
    octave_b: i32,
) -> Result<i32, ResolveError> {
    Ok(pitch_value(note_a, octave_a)? - pitch_value(note_b, octave_b)?)
}

/// Map the five flat spellings to their sharp equivalents.
///
/// Total over all inputs: anything that is not one of the five flats
/// passes through unchanged, and a truly invalid name fails later at
/// chromatic-index lookup.
pub fn normalize_to_sharp(name: &str) -> &str {
    match name {
        "Bb" => "A#",
        "Db" => "C#",
        "Eb" => "D#",
        "Gb" => "F#",
        "Ab" => "G#",
        other => other,
    }
}
