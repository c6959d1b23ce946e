pub mod bank;
pub mod error;
pub mod note;
pub mod playback;
pub mod request;
pub mod resolver;

#[cfg(feature = "playback")]
pub mod loader;
#[cfg(feature = "playback")]
pub mod player;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::bank::SampleLibrary;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// WASM-exposed: return the airkeys-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// Wire shape handed to the browser for one resolved request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedSample {
    /// Resource id of the chosen sample.
    pub resource_id: String,
    /// The chosen sample's recorded note and octave.
    pub note: String,
    pub octave: i32,
    /// Signed semitones from the request to the sample's native pitch.
    pub semitone_distance: i32,
    /// Rate the host audio layer should apply to the sample.
    pub playback_rate: f64,
}

/// Resolve a note request against a JSON sample library.
///
/// The native entry point behind [`resolve_sample`]; errors keep their
/// types here instead of being flattened to strings.
pub fn resolve_request(
    library: &SampleLibrary,
    instrument: &str,
    note: &str,
) -> Result<ResolvedSample, error::ResolveError> {
    let resolved = resolver::resolve(library, instrument, note)?;
    Ok(ResolvedSample {
        resource_id: resolved.sample.resource_id.clone(),
        note: resolved.sample.note.clone(),
        octave: resolved.sample.octave,
        semitone_distance: resolved.semitone_distance,
        playback_rate: resolved.playback_rate(),
    })
}

/// WASM-exposed: resolve `note` against `instrument` in a JSON sample
/// library, returning `{resourceId, note, octave, semitoneDistance,
/// playbackRate}` for the host audio layer to fetch and play.
#[wasm_bindgen]
pub fn resolve_sample(
    library_json: &str,
    instrument: &str,
    note: &str,
) -> Result<JsValue, JsValue> {
    let library =
        SampleLibrary::from_json(library_json).map_err(|e| JsValue::from_str(&format!("{e}")))?;
    let resolved = resolve_request(&library, instrument, note)
        .map_err(|e| JsValue::from_str(&format!("{e}")))?;
    serde_wasm_bindgen::to_value(&resolved).map_err(|e| JsValue::from_str(&format!("{e}")))
}
