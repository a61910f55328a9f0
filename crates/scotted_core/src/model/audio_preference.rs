//! Audio preference value model.
//!
//! # Responsibility
//! - Define the `{isMuted, volume}` record broadcast to subscribers.
//! - Convert between in-memory values and their durable string encoding.
//!
//! # Invariants
//! - Values built by `AudioPreference::new` or `clamp_volume` stay inside
//!   `[MIN_VOLUME, MAX_VOLUME]`; struct literals are trusted as written.
//! - Negative zero is stored and broadcast as `0`.
//! - Malformed persisted text decodes to `None`, never to an error.

use serde::{Deserialize, Serialize};

/// Lowest accepted volume level.
pub const MIN_VOLUME: f64 = 0.0;
/// Highest accepted volume level.
pub const MAX_VOLUME: f64 = 1.0;

/// Mute flag and volume level shared by every audio consumer.
///
/// Serialized in camelCase to match the change-event payload consumed by the
/// web client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioPreference {
    pub is_muted: bool,
    /// Linear gain in `[0, 1]`.
    pub volume: f64,
}

impl AudioPreference {
    /// Creates a preference, clamping `volume` into range.
    ///
    /// A NaN volume falls back to `MAX_VOLUME`.
    pub fn new(is_muted: bool, volume: f64) -> Self {
        let volume = if volume.is_nan() {
            MAX_VOLUME
        } else {
            clamp_volume(volume)
        };
        Self { is_muted, volume }
    }

    /// Gain a media element should actually play at.
    pub fn effective_volume(&self) -> f64 {
        if self.is_muted {
            MIN_VOLUME
        } else {
            self.volume
        }
    }

    /// Returns whether any sound would be produced.
    pub fn is_audible(&self) -> bool {
        self.effective_volume() > MIN_VOLUME
    }
}

impl Default for AudioPreference {
    /// Muted at full volume: autoplaying media starts silent.
    fn default() -> Self {
        Self {
            is_muted: true,
            volume: MAX_VOLUME,
        }
    }
}

/// Clamps `volume` into `[MIN_VOLUME, MAX_VOLUME]`.
///
/// Negative zero becomes positive zero. NaN is passed through unchanged;
/// callers decide how to treat it.
pub fn clamp_volume(volume: f64) -> f64 {
    if volume == MIN_VOLUME {
        return MIN_VOLUME;
    }
    volume.clamp(MIN_VOLUME, MAX_VOLUME)
}

/// Encodes a mute flag as `"true"` / `"false"`.
pub fn encode_muted(is_muted: bool) -> &'static str {
    if is_muted {
        "true"
    } else {
        "false"
    }
}

/// Decodes a stored mute flag. Anything but `"true"` / `"false"` is `None`.
pub fn decode_muted(value: &str) -> Option<bool> {
    match value.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Encodes a volume using the shortest round-trippable float text.
pub fn encode_volume(volume: f64) -> String {
    volume.to_string()
}

/// Decodes a stored volume.
///
/// Returns `None` for text that is not a finite number; finite values outside
/// range are clamped.
pub fn decode_volume(value: &str) -> Option<f64> {
    let parsed = value.trim().parse::<f64>().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    Some(clamp_volume(parsed))
}

#[cfg(test)]
mod tests {
    use super::{
        clamp_volume, decode_muted, decode_volume, encode_muted, encode_volume, AudioPreference,
    };

    #[test]
    fn default_is_muted_at_full_volume() {
        let preference = AudioPreference::default();
        assert!(preference.is_muted);
        assert_eq!(preference.volume, 1.0);
        assert!(!preference.is_audible());
    }

    #[test]
    fn new_clamps_and_replaces_nan() {
        assert_eq!(AudioPreference::new(false, 3.0).volume, 1.0);
        assert_eq!(AudioPreference::new(false, -2.0).volume, 0.0);
        assert_eq!(AudioPreference::new(false, f64::NAN).volume, 1.0);
    }

    #[test]
    fn effective_volume_is_zero_when_muted() {
        assert_eq!(AudioPreference::new(true, 0.7).effective_volume(), 0.0);
        assert_eq!(AudioPreference::new(false, 0.7).effective_volume(), 0.7);
        assert!(!AudioPreference::new(false, 0.0).is_audible());
    }

    #[test]
    fn clamp_handles_infinities() {
        assert_eq!(clamp_volume(f64::INFINITY), 1.0);
        assert_eq!(clamp_volume(f64::NEG_INFINITY), 0.0);
        assert_eq!(clamp_volume(0.25), 0.25);
    }

    #[test]
    fn negative_zero_clamps_to_positive_zero() {
        let clamped = clamp_volume(-0.0);
        assert!(clamped.is_sign_positive());
        assert_eq!(encode_volume(clamped), "0");
        assert_eq!(decode_volume("-0"), Some(0.0));
        assert!(AudioPreference::new(false, -0.0).volume.is_sign_positive());
    }

    #[test]
    fn muted_flag_accepts_only_exact_booleans() {
        assert_eq!(decode_muted(encode_muted(true)), Some(true));
        assert_eq!(decode_muted(encode_muted(false)), Some(false));
        assert_eq!(decode_muted("yes"), None);
        assert_eq!(decode_muted("TRUE"), None);
        assert_eq!(decode_muted(""), None);
    }

    #[test]
    fn volume_decoding_rejects_non_finite_text() {
        assert_eq!(decode_volume("abc"), None);
        assert_eq!(decode_volume("NaN"), None);
        assert_eq!(decode_volume("inf"), None);
        assert_eq!(decode_volume(""), None);
    }

    #[test]
    fn volume_decoding_clamps_out_of_range_numbers() {
        assert_eq!(decode_volume("1.5"), Some(1.0));
        assert_eq!(decode_volume("-0.3"), Some(0.0));
        assert_eq!(decode_volume(" 0.4 "), Some(0.4));
    }

    #[test]
    fn volume_encoding_matches_browser_number_text() {
        assert_eq!(encode_volume(1.0), "1");
        assert_eq!(encode_volume(0.0), "0");
        assert_eq!(encode_volume(0.5), "0.5");
    }
}
