//! Sample banks — the static configuration of recorded samples.
//!
//! A library maps instrument names to ordered banks of samples. It is
//! loaded once (typically from a JSON document of the shape
//! `{ "Grand Piano": [ { "note": "A", "octave": 4, "resourceId": ".." } ] }`)
//! and never mutated during playback.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One recorded sample: the note and octave it was recorded at, plus the
/// id of the audio asset (a path or URL fragment resolved by the sample
/// source).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Sharp-spelled note name (e.g. "D#").
    pub note: String,
    /// Octave the sample was recorded at.
    pub octave: i32,
    /// Reference to the audio data.
    #[serde(rename = "resourceId")]
    pub resource_id: String,
}

impl Sample {
    pub fn new(note: impl Into<String>, octave: i32, resource_id: impl Into<String>) -> Self {
        Sample {
            note: note.into(),
            octave,
            resource_id: resource_id.into(),
        }
    }
}

/// Instrument name → ordered bank of samples.
///
/// Bank order is load order and is never re-sorted; nearest-sample ties
/// resolve to the earliest entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleLibrary {
    banks: HashMap<String, Vec<Sample>>,
}

impl SampleLibrary {
    pub fn new() -> Self {
        SampleLibrary {
            banks: HashMap::new(),
        }
    }

    /// Parse a library from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Register (or replace) an instrument's bank.
    pub fn insert_bank(&mut self, instrument: impl Into<String>, samples: Vec<Sample>) {
        self.banks.insert(instrument.into(), samples);
    }

    /// The bank for an instrument, if one is registered.
    pub fn bank(&self, instrument: &str) -> Option<&[Sample]> {
        self.banks.get(instrument).map(|b| b.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    /// Iterate over registered instrument names.
    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.banks.keys().map(|k| k.as_str())
    }

    /// The stock Grand Piano library: A, C, D# and F# recorded at octaves
    /// 4-6, four samples per octave spread so every request is at most a
    /// couple of semitones from a recording.
    pub fn grand_piano() -> Self {
        const DIRECTORY: &str = "samples/grand-piano/piano";
        let mut samples = Vec::new();
        for (note, file_note) in [("A", "a"), ("C", "c"), ("D#", "d#"), ("F#", "f#")] {
            for octave in 4..=6 {
                samples.push(Sample::new(
                    note,
                    octave,
                    format!("{DIRECTORY}-{file_note}{octave}.wav"),
                ));
            }
        }
        let mut library = SampleLibrary::new();
        library.insert_bank("Grand Piano", samples);
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_from_json() {
        let json = r#"{
            "Grand Piano": [
                { "note": "A", "octave": 4, "resourceId": "piano-a4.wav" },
                { "note": "C", "octave": 4, "resourceId": "piano-c4.wav" }
            ]
        }"#;

        let library = SampleLibrary::from_json(json).unwrap();
        let bank = library.bank("Grand Piano").unwrap();
        assert_eq!(bank.len(), 2);
        assert_eq!(bank[0], Sample::new("A", 4, "piano-a4.wav"));
        assert_eq!(bank[1].resource_id, "piano-c4.wav");
    }

    #[test]
    fn bank_order_is_preserved() {
        let json = r#"{
            "Kalimba": [
                { "note": "G", "octave": 5, "resourceId": "g5.wav" },
                { "note": "C", "octave": 3, "resourceId": "c3.wav" },
                { "note": "E", "octave": 4, "resourceId": "e4.wav" }
            ]
        }"#;

        let library = SampleLibrary::from_json(json).unwrap();
        let notes: Vec<&str> = library
            .bank("Kalimba")
            .unwrap()
            .iter()
            .map(|s| s.note.as_str())
            .collect();
        assert_eq!(notes, ["G", "C", "E"], "bank must keep its load order");
    }

    #[test]
    fn json_roundtrip() {
        let library = SampleLibrary::grand_piano();
        let json = serde_json::to_string(&library).unwrap();
        let reparsed = SampleLibrary::from_json(&json).unwrap();
        assert_eq!(
            reparsed.bank("Grand Piano").unwrap(),
            library.bank("Grand Piano").unwrap()
        );
    }

    #[test]
    fn unknown_instrument_is_none() {
        let library = SampleLibrary::grand_piano();
        assert!(library.bank("Kazoo").is_none());
    }

    #[test]
    fn grand_piano_bank_contents() {
        let library = SampleLibrary::grand_piano();
        let bank = library.bank("Grand Piano").unwrap();

        assert_eq!(bank.len(), 12);
        assert_eq!(bank[0], Sample::new("A", 4, "samples/grand-piano/piano-a4.wav"));
        assert_eq!(
            bank[8],
            Sample::new("D#", 6, "samples/grand-piano/piano-d#6.wav")
        );
        assert!(bank.iter().all(|s| (4..=6).contains(&s.octave)));
    }
}
