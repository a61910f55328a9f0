//! Core client-side state for Scotted.
//! This crate is the single source of truth for audio preference invariants.

pub mod auth;
pub mod broadcast;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;

pub use auth::route_guard::{AuthContext, AuthSnapshot, RouteDecision, RouteGuard};
pub use broadcast::{ListenerRegistry, Subscription, SubscriptionId};
pub use config::AudioPreferenceConfig;
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::audio_preference::AudioPreference;
pub use service::audio_preference_store::AudioPreferenceStore;
pub use storage::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
