//! One-shot playback: resolve, fetch, decode, start the output.
//!
//! Each `play` call is independent — there is no voice pool, scheduler or
//! retry loop here. The I/O capability runs once per request, after
//! resolution has already succeeded.

use std::fmt;

use log::debug;

use crate::bank::SampleLibrary;
use crate::error::ResolveError;
use crate::loader::{decode, LoadError, SampleSource};
use crate::playback::AudioOutput;
use crate::resolver::resolve;

#[derive(Debug)]
pub enum PlayError {
    Resolve(ResolveError),
    Load(LoadError),
}

impl fmt::Display for PlayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayError::Resolve(e) => write!(f, "Resolution error: {e}"),
            PlayError::Load(e) => write!(f, "Load error: {e}"),
        }
    }
}

impl std::error::Error for PlayError {}

impl From<ResolveError> for PlayError {
    fn from(e: ResolveError) -> Self {
        PlayError::Resolve(e)
    }
}

impl From<LoadError> for PlayError {
    fn from(e: LoadError) -> Self {
        PlayError::Load(e)
    }
}

/// Plays resolved samples through an audio output.
///
/// Owns the static sample library plus the fetch and output
/// collaborators. The output implementor holds the device handle.
pub struct Player<S, O> {
    library: SampleLibrary,
    source: S,
    output: O,
}

impl<S: SampleSource, O: AudioOutput> Player<S, O> {
    pub fn new(library: SampleLibrary, source: S, output: O) -> Self {
        Player {
            library,
            source,
            output,
        }
    }

    pub fn library(&self) -> &SampleLibrary {
        &self.library
    }

    /// Resolve `token` against `instrument`'s bank, then fetch, decode and
    /// start the nearest sample pitch-shifted to the requested note.
    pub async fn play(&self, instrument: &str, token: &str) -> Result<(), PlayError> {
        let resolved = resolve(&self.library, instrument, token)?;
        let rate = resolved.playback_rate();
        debug!(
            "{instrument} {token}: sample '{}' at {:+} semitones, rate {rate:.4}",
            resolved.sample.resource_id, resolved.semitone_distance
        );

        let bytes = self.source.fetch(&resolved.sample.resource_id).await?;
        let buffer = decode(&resolved.sample.resource_id, &bytes)?;

        self.output.play(&buffer, rate);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::AudioBuffer;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Mutex;

    struct MapSource {
        resources: HashMap<String, Vec<u8>>,
    }

    impl SampleSource for MapSource {
        async fn fetch(&self, resource_id: &str) -> Result<Vec<u8>, LoadError> {
            self.resources
                .get(resource_id)
                .cloned()
                .ok_or_else(|| LoadError::Fetch {
                    resource: resource_id.to_string(),
                    reason: "not found".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingOutput {
        calls: Mutex<Vec<(usize, f64)>>,
    }

    impl AudioOutput for RecordingOutput {
        fn play(&self, buffer: &AudioBuffer, playback_rate: f64) {
            self.calls
                .lock()
                .unwrap()
                .push((buffer.frames(), playback_rate));
        }
    }

    fn mono_wav(frames: usize) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for _ in 0..frames {
                writer.write_sample(1000_i16).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    fn piano_player() -> Player<MapSource, RecordingOutput> {
        let library = SampleLibrary::grand_piano();
        let mut resources = HashMap::new();
        for sample in library.bank("Grand Piano").unwrap() {
            resources.insert(sample.resource_id.clone(), mono_wav(128));
        }
        Player::new(library, MapSource { resources }, RecordingOutput::default())
    }

    #[tokio::test]
    async fn plays_exact_note_at_unit_rate() {
        let player = piano_player();
        player.play("Grand Piano", "A4").await.unwrap();

        let calls = player.output.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (frames, rate) = calls[0];
        assert_eq!(frames, 128);
        assert_eq!(rate, 1.0);
    }

    #[tokio::test]
    async fn plays_flat_request_pitched_down() {
        let player = piano_player();
        // Ab4 resolves to the A4 sample, one semitone above the request.
        player.play("Grand Piano", "Ab4").await.unwrap();

        let calls = player.output.calls.lock().unwrap();
        let (_, rate) = calls[0];
        let expected = 2.0_f64.powf(-1.0 / 12.0);
        assert!(
            (rate - expected).abs() < 1e-12,
            "Ab4 on an A4 sample should play at {expected}, got {rate}"
        );
    }

    #[tokio::test]
    async fn unknown_instrument_is_a_resolution_error() {
        let player = piano_player();
        let err = player.play("Kazoo", "A4").await.unwrap_err();
        assert!(matches!(
            err,
            PlayError::Resolve(ResolveError::UnknownInstrument { .. })
        ));
        assert!(player.output.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_resource_is_a_fetch_error() {
        let library = SampleLibrary::grand_piano();
        let player = Player::new(
            library,
            MapSource {
                resources: HashMap::new(),
            },
            RecordingOutput::default(),
        );

        let err = player.play("Grand Piano", "A4").await.unwrap_err();
        assert!(matches!(err, PlayError::Load(LoadError::Fetch { .. })));
    }

    #[tokio::test]
    async fn undecodable_resource_is_a_decode_error() {
        let library = SampleLibrary::grand_piano();
        let mut resources = HashMap::new();
        for sample in library.bank("Grand Piano").unwrap() {
            resources.insert(sample.resource_id.clone(), b"not audio".to_vec());
        }
        let player = Player::new(library, MapSource { resources }, RecordingOutput::default());

        let err = player.play("Grand Piano", "A4").await.unwrap_err();
        assert!(matches!(err, PlayError::Load(LoadError::Decode { .. })));
        assert!(player.output.calls.lock().unwrap().is_empty());
    }
}
