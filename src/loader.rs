//! Sample fetching and decoding for native playback.
//!
//! The browser build leaves fetching and decoding to the host's audio
//! API; this module is the native counterpart, enabled by the `playback`
//! feature. WAV and MP3 payloads are recognized from their leading bytes.

use std::fmt;
use std::io::Cursor;

use log::debug;

use crate::playback::AudioBuffer;

/// Errors from the I/O boundary.
///
/// Unlike resolution errors these can be transient; retry and backoff
/// policy belongs to the surrounding application.
#[derive(Debug)]
pub enum LoadError {
    /// The resource bytes could not be fetched.
    Fetch { resource: String, reason: String },
    /// The fetched bytes could not be decoded into audio.
    Decode { resource: String, reason: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Fetch { resource, reason } => {
                write!(f, "Failed to fetch sample '{resource}': {reason}")
            }
            LoadError::Decode { resource, reason } => {
                write!(f, "Failed to decode sample '{resource}': {reason}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Source of raw sample bytes, keyed by resource id.
#[allow(async_fn_in_trait)]
pub trait SampleSource {
    async fn fetch(&self, resource_id: &str) -> Result<Vec<u8>, LoadError>;
}

/// Fetches sample resources over HTTP(S), relative to a base URL.
pub struct HttpSampleSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSampleSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpSampleSource {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn url_for(&self, resource_id: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            resource_id.trim_start_matches('/')
        )
    }
}

impl SampleSource for HttpSampleSource {
    async fn fetch(&self, resource_id: &str) -> Result<Vec<u8>, LoadError> {
        let url = self.url_for(resource_id);
        debug!("fetching sample {url}");

        let fetch_error = |reason: String| LoadError::Fetch {
            resource: resource_id.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?
            .error_for_status()
            .map_err(|e| fetch_error(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Decode fetched bytes into an audio buffer.
///
/// `resource_id` is only used to label errors; the container format is
/// sniffed from the payload itself.
pub fn decode(resource_id: &str, bytes: &[u8]) -> Result<AudioBuffer, LoadError> {
    let decode_error = |reason: String| LoadError::Decode {
        resource: resource_id.to_string(),
        reason,
    };

    if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
        decode_wav(bytes).map_err(decode_error)
    } else if looks_like_mp3(bytes) {
        decode_mp3(bytes).map_err(decode_error)
    } else {
        Err(decode_error("unrecognized audio container".to_string()))
    }
}

fn looks_like_mp3(bytes: &[u8]) -> bool {
    // ID3 tag header, or a bare MPEG frame sync (11 set bits).
    bytes.starts_with(b"ID3") || (bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] & 0xE0 == 0xE0)
}

fn decode_wav(bytes: &[u8]) -> Result<AudioBuffer, String> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let spec = reader.spec();

    let data: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| e.to_string())?,
        hound::SampleFormat::Int => {
            let max = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max))
                .collect::<Result<_, _>>()
                .map_err(|e| e.to_string())?
        }
    };

    Ok(AudioBuffer::new(data, spec.channels, spec.sample_rate))
}

fn decode_mp3(bytes: &[u8]) -> Result<AudioBuffer, String> {
    let mut decoder = minimp3::Decoder::new(Cursor::new(bytes));
    let mut data: Vec<f32> = Vec::new();
    let mut channels = 0_u16;
    let mut sample_rate = 0_u32;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if channels == 0 {
                    channels = frame.channels as u16;
                    sample_rate = frame.sample_rate as u32;
                }
                data.extend(frame.data.iter().map(|&s| s as f32 / 32768.0));
            }
            Err(minimp3::Error::Eof) => break,
            Err(e) => return Err(format!("{e:?}")),
        }
    }

    if data.is_empty() {
        return Err("no audio frames".to_string());
    }
    Ok(AudioBuffer::new(data, channels, sample_rate))
}
