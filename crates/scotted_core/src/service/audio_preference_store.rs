//! Shared audio preference store.
//!
//! # Responsibility
//! - Hold the mute flag and volume every audio consumer plays with.
//! - Persist changes to durable storage on a best-effort basis.
//! - Broadcast every change to all subscribers of this store.
//!
//! # Invariants
//! - `volume` is always within `[0, 1]`.
//! - Raising `volume` above zero while muted clears the mute flag.
//! - Storage failures never reach callers; the in-memory value stays
//!   authoritative for the session.
//! - The in-memory value is updated before subscribers run.
//! - Changes made from inside a subscriber are delivered after the running
//!   notification, so every subscriber ends on the value `preference()`
//!   reports.

use crate::broadcast::{ListenerRegistry, Subscription};
use crate::config::{AudioPreferenceConfig, AUDIO_SETTINGS_CHANNEL};
use crate::model::audio_preference::{
    clamp_volume, decode_muted, decode_volume, encode_muted, encode_volume, AudioPreference,
    MIN_VOLUME,
};
use crate::storage::KeyValueStorage;
use log::{debug, warn};
use std::cell::Cell;

/// Injectable preference store with explicit publish-subscribe.
///
/// One store instance stands for one execution context (one tab). Stores over
/// the same durable storage only see each other's writes through
/// [`AudioPreferenceStore::reload`].
pub struct AudioPreferenceStore<S: KeyValueStorage> {
    storage: S,
    config: AudioPreferenceConfig,
    current: Cell<Option<AudioPreference>>,
    listeners: ListenerRegistry<AudioPreference>,
}

impl<S: KeyValueStorage> AudioPreferenceStore<S> {
    /// Creates a store with the shared web-client keys and defaults.
    pub fn new(storage: S) -> Self {
        Self::with_config(storage, AudioPreferenceConfig::default())
    }

    pub fn with_config(storage: S, config: AudioPreferenceConfig) -> Self {
        Self {
            storage,
            config,
            current: Cell::new(None),
            listeners: ListenerRegistry::new(AUDIO_SETTINGS_CHANNEL),
        }
    }

    pub fn config(&self) -> &AudioPreferenceConfig {
        &self.config
    }

    /// Returns the current preference, seeding it from storage on first use.
    pub fn preference(&self) -> AudioPreference {
        if let Some(preference) = self.current.get() {
            return preference;
        }
        let loaded = self.load();
        self.current.set(Some(loaded));
        loaded
    }

    /// Sets the volume, clamped to `[0, 1]`, and notifies subscribers once.
    ///
    /// # Contract
    /// - A result above zero while muted also unmutes and persists that.
    /// - A result of zero leaves the mute flag untouched.
    /// - NaN is ignored: nothing is written and nobody is notified.
    pub fn set_volume(&self, volume: f64) -> AudioPreference {
        let previous = self.preference();
        if volume.is_nan() {
            warn!("event=audio_set_volume module=service status=rejected reason=nan");
            return previous;
        }

        let volume = clamp_volume(volume);
        self.persist(&self.config.volume_key, &encode_volume(volume));

        let mut next = AudioPreference {
            is_muted: previous.is_muted,
            volume,
        };
        if volume > MIN_VOLUME && previous.is_muted {
            next.is_muted = false;
            self.persist(&self.config.muted_key, encode_muted(false));
        }

        self.commit(next);
        next
    }

    /// Flips the mute flag, keeping the volume, and notifies subscribers.
    pub fn toggle_mute(&self) -> AudioPreference {
        let previous = self.preference();
        let next = AudioPreference {
            is_muted: !previous.is_muted,
            volume: previous.volume,
        };
        self.persist(&self.config.muted_key, encode_muted(next.is_muted));
        self.commit(next);
        next
    }

    /// Re-reads durable storage, picking up writes from other contexts.
    ///
    /// Subscribers are notified only when the reloaded value differs.
    pub fn reload(&self) -> AudioPreference {
        let loaded = self.load();
        if self.current.get() != Some(loaded) {
            self.commit(loaded);
        }
        loaded
    }

    /// Registers `listener` for every future change made through this store.
    pub fn subscribe(
        &self,
        listener: impl Fn(&AudioPreference) + 'static,
    ) -> Subscription<AudioPreference> {
        self.listeners.subscribe(listener)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn commit(&self, next: AudioPreference) {
        self.current.set(Some(next));
        debug!(
            "event=audio_preference_changed module=service muted={} volume={}",
            next.is_muted, next.volume
        );
        self.listeners.notify(&next);
    }

    fn load(&self) -> AudioPreference {
        let defaults = self.config.default_preference();
        let is_muted = self
            .read(&self.config.muted_key)
            .and_then(|raw| decode_or_warn(&self.config.muted_key, &raw, decode_muted))
            .unwrap_or(defaults.is_muted);
        let volume = self
            .read(&self.config.volume_key)
            .and_then(|raw| decode_or_warn(&self.config.volume_key, &raw, decode_volume))
            .unwrap_or(defaults.volume);
        AudioPreference { is_muted, volume }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=storage_read module=service status=error key={} error={}",
                    key, err
                );
                None
            }
        }
    }

    fn persist(&self, key: &str, value: &str) {
        if let Err(err) = self.storage.set_item(key, value) {
            warn!(
                "event=storage_write module=service status=error key={} error={}",
                key, err
            );
        }
    }
}

fn decode_or_warn<V>(key: &str, raw: &str, decode: fn(&str) -> Option<V>) -> Option<V> {
    let decoded = decode(raw);
    if decoded.is_none() {
        warn!(
            "event=storage_read module=service status=invalid key={} fallback=default",
            key
        );
    }
    decoded
}
