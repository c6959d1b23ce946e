//! Note request tokens — `"A4"`, `"F#3"`, `"Db5"`.
//!
//! The grammar is one note letter `A`-`G`, an optional `#` or `b`
//! accidental, then exactly one octave digit. Anything else is rejected
//! with a typed error rather than being coerced.

use crate::error::ResolveError;

/// A parsed note request: the note spelling as written (possibly a flat)
/// plus the requested octave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    pub note: String,
    pub octave: i32,
}

impl NoteRequest {
    /// Parse a request token.
    ///
    /// The note is kept in its original spelling; callers normalize flats
    /// before doing pitch arithmetic.
    pub fn parse(token: &str) -> Result<NoteRequest, ResolveError> {
        let malformed = || ResolveError::MalformedNoteToken {
            token: token.to_string(),
        };

        let mut chars = token.chars();
        let letter = chars.next().ok_or_else(malformed)?;
        if !('A'..='G').contains(&letter) {
            return Err(malformed());
        }

        let mut note = String::from(letter);
        let mut next = chars.next();
        if let Some(accidental @ ('#' | 'b')) = next {
            note.push(accidental);
            next = chars.next();
        }

        let octave = next
            .and_then(|d| d.to_digit(10))
            .ok_or_else(malformed)? as i32;
        if chars.next().is_some() {
            return Err(malformed());
        }

        Ok(NoteRequest { note, octave })
    }
}
