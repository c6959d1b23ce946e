//! Nearest-sample resolution.
//!
//! Given an instrument's bank and a requested note, pick the sample whose
//! recorded pitch is numerically closest and report the signed semitone
//! distance from the request to it. The playback layer turns that
//! distance into a rate.

use crate::bank::{Sample, SampleLibrary};
use crate::error::ResolveError;
use crate::note::{normalize_to_sharp, pitch_value, semitone_distance};
use crate::playback::playback_rate;
use crate::request::NoteRequest;

/// The outcome of resolving a request: the chosen sample and the signed
/// semitone distance from the requested pitch to the sample's native
/// pitch (positive = request above the sample).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlayback<'a> {
    pub sample: &'a Sample,
    pub semitone_distance: i32,
}

impl ResolvedPlayback<'_> {
    /// The rate at which the chosen sample must play to sound at the
    /// requested pitch.
    pub fn playback_rate(&self) -> f64 {
        playback_rate(self.semitone_distance)
    }
}

/// Find the sample in `bank` whose pitch is closest to the requested note.
///
/// Single scan keeping the best-so-far candidate; a later sample replaces
/// it only on a strictly smaller absolute distance, so the first-seen
/// minimum wins ties. A bank entry with an invalid note name is a
/// configuration error and fails the whole lookup.
pub fn find_nearest<'a>(
    bank: &'a [Sample],
    note: &str,
    octave: i32,
) -> Result<&'a Sample, ResolveError> {
    let requested = pitch_value(note, octave)?;

    let mut best: Option<(&Sample, i32)> = None;
    for sample in bank {
        let distance = (requested - pitch_value(&sample.note, sample.octave)?).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((sample, distance)),
        }
    }

    best.map(|(sample, _)| sample).ok_or(ResolveError::EmptyBank)
}

/// Resolve an instrument name + note token to a concrete sample.
///
/// Parses the token, normalizes flat spellings to sharps, looks up the
/// instrument's bank and scans it for the nearest sample.
pub fn resolve<'a>(
    library: &'a SampleLibrary,
    instrument: &str,
    token: &str,
) -> Result<ResolvedPlayback<'a>, ResolveError> {
    let request = NoteRequest::parse(token)?;
    let note = normalize_to_sharp(&request.note);

    let bank = library
        .bank(instrument)
        .ok_or_else(|| ResolveError::UnknownInstrument {
            name: instrument.to_string(),
        })?;

    let sample = find_nearest(bank, note, request.octave)?;
    let semitone_distance = semitone_distance(note, request.octave, &sample.note, sample.octave)?;

    Ok(ResolvedPlayback {
        sample,
        semitone_distance,
    })
}
