//! # NeuroCalm Core Library
//!
//! Core logic for the NeuroCalm wellness dashboard: a simulated biometric
//! feed, a mock wearable-device registry and thin prompt flows over an
//! external text-generation service. Front-ends (the CLI today) are thin
//! layers over this crate.
//!
//! ## Architecture
//!
//! - **Health data store**: a synchronous state machine holding the latest
//!   reading and the device registry. [`HealthSession`] owns one store,
//!   regenerates its reading on a timer and hands out [`HealthDataHandle`]s
//!   that are only valid while the session lives.
//! - **Storage**: TOML-based configuration under `~/.config/neurocalm`
//! - **AI flows**: typed prompt flows over the [`ai::TextGenerator`] trait
//!
//! ## Key Components
//!
//! - [`HealthDataStore`]: reading and device registry
//! - [`HealthSession`]: timer scope around a store
//! - [`Config`]: application configuration management
//! - [`Event`]: everything a session reports to its consumers

pub mod ai;
pub mod error;
pub mod events;
pub mod health;
pub mod profile;
pub mod storage;

pub use error::{AiError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use health::{
    Device, HealthDataHandle, HealthDataStore, HealthReading, HealthSession, NewDevice,
    StoreSnapshot,
};
pub use profile::Profile;
pub use storage::Config;
