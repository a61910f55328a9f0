//! Storage keys, defaults and channel names for audio preferences.
//!
//! The key names are shared with the web client; changing them orphans every
//! preference persisted so far.

use crate::model::audio_preference::{clamp_volume, AudioPreference};

/// Durable key holding the mute flag as `"true"` / `"false"`.
pub const AUDIO_MUTED_KEY: &str = "scotted.audio.muted";
/// Durable key holding the volume as float text.
pub const AUDIO_VOLUME_KEY: &str = "scotted.audio.volume";
/// Broadcast channel name for preference changes.
pub const AUDIO_SETTINGS_CHANNEL: &str = "scotted:audio-settings";
/// Path unauthenticated visitors are sent to by the route guard.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

/// Where and how an `AudioPreferenceStore` persists its state.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioPreferenceConfig {
    pub muted_key: String,
    pub volume_key: String,
    /// Used when no valid mute flag is stored.
    pub default_muted: bool,
    /// Used when no valid volume is stored. Clamped on use.
    pub default_volume: f64,
}

impl AudioPreferenceConfig {
    /// Preference used when storage holds nothing usable.
    pub fn default_preference(&self) -> AudioPreference {
        AudioPreference::new(self.default_muted, self.default_volume)
    }

    /// Same keys with every default replaced by `preference`.
    pub fn with_defaults(mut self, preference: AudioPreference) -> Self {
        self.default_muted = preference.is_muted;
        self.default_volume = clamp_volume(preference.volume);
        self
    }
}

impl Default for AudioPreferenceConfig {
    fn default() -> Self {
        let defaults = AudioPreference::default();
        Self {
            muted_key: AUDIO_MUTED_KEY.to_string(),
            volume_key: AUDIO_VOLUME_KEY.to_string(),
            default_muted: defaults.is_muted,
            default_volume: defaults.volume,
        }
    }
}
