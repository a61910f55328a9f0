//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate storage and broadcast into use-case level APIs.
//! - Keep UI layers decoupled from storage details.

pub mod audio_preference_store;
