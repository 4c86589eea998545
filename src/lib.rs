//! # Glucowatch
//!
//! Continuous Glucose Monitoring Service - A full-stack Rust application for
//! classifying, tracking, and streaming blood glucose readings.
//!
//! ## Features
//!
//! - **Five-band classification**: Fixed clinical thresholds in mmol/L
//! - **Live monitoring**: Bounded in-memory history with summary statistics
//! - **Emergency alerts**: Critical readings raise events with the
//!   registered emergency contact attached
//! - **Real-time**: WebSocket streaming of readings and alerts
//! - **Patient profile**: Validated medical profile with medication list
//!
//! ## Modules
//!
//! - [`classifier`]: Glucose status bands, thresholds, and readings
//! - [`monitor`]: Live monitoring service and reading sources
//! - [`alert`]: Emergency alert log
//! - [`profile`]: Patient profile store
//! - [`api`]: REST API server with Axum
//! - [`stream`]: WebSocket pub/sub hub
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glucowatch::alert::AlertLog;
//! use glucowatch::monitor::{GlucoseMonitor, MonitorConfig};
//! use glucowatch::profile::ProfileStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let alerts = Arc::new(AlertLog::default());
//!     let profiles = Arc::new(ProfileStore::new());
//!     let monitor = GlucoseMonitor::new(MonitorConfig::default(), alerts, profiles);
//!
//!     // Record readings; classification happens at construction
//!     let outcome = monitor.record_mmol(5.6).await?;
//!     println!("status: {}", outcome.reading.status());
//!
//!     let outcome = monitor.record_mmol(2.1).await?;
//!     assert!(outcome.emergency);
//!
//!     // Summarize the retained history
//!     let summary = monitor.summary(None).await;
//!     println!("{} readings, {} emergencies", summary.count, summary.emergencies);
//!
//!     Ok(())
//! }
//! ```

pub mod alert;
pub mod api;
pub mod classifier;
pub mod config;
pub mod monitor;
pub mod profile;
pub mod stream;

// Re-export top-level types for convenience
pub use classifier::{
    classify, GlucoseReading, GlucoseStatus, ReadingError, Severity, CRITICAL_HIGH_MMOL,
    CRITICAL_LOW_MMOL, WARNING_HIGH_MMOL, WARNING_LOW_MMOL,
};

pub use monitor::{
    demo_profile, demo_source, spawn_feed, summarize, GlucoseMonitor, GlucoseSummary,
    MonitorConfig, MonitorEvent, ReadingHistory, ReadingSource, Recorded, ScriptedSource,
    SensorState,
};

pub use alert::{AlertEvent, AlertLog};

pub use profile::{EmergencyContact, Medication, PatientProfile, ProfileError, ProfileStore};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use stream::{
    spawn_event_bridge, stream_handler, ClientMessage, HubConfig, HubError, ServerMessage,
    StreamEvent, StreamHub,
};

pub use config::{
    generate_default_config, AlertSection, ApiSection, Config, ConfigError, LoggingConfig,
    MonitorSection,
};
