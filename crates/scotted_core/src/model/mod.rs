//! Domain values shared by the store, storage and broadcast layers.
//!
//! # Responsibility
//! - Define the canonical preference shape carried across every layer.
//! - Own the clamping and parsing rules so no caller re-implements them.
//!
//! # Invariants
//! - `AudioPreference::new` and every value the store hands out keep
//!   `volume` in `[0, 1]`. Fields are public, so a struct literal is only as
//!   valid as its author makes it.

pub mod audio_preference;
