//! Live glucose monitoring
//!
//! Everything between the raw sensor value and the dashboard:
//!
//! - **history**: bounded ring of recent readings
//! - **stats**: pure summary aggregation (average, time in range, alerts)
//! - **service**: `GlucoseMonitor`, the stateful core that records,
//!   alerts, and broadcasts
//! - **source**: `ReadingSource` suppliers and the feed task that drives
//!   them on a cadence
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use glucowatch::alert::AlertLog;
//! use glucowatch::monitor::{demo_source, spawn_feed, GlucoseMonitor, MonitorConfig};
//! use glucowatch::profile::ProfileStore;
//!
//! #[tokio::main]
//! async fn main() {
//!     let monitor = Arc::new(GlucoseMonitor::new(
//!         MonitorConfig::default(),
//!         Arc::new(AlertLog::default()),
//!         Arc::new(ProfileStore::new()),
//!     ));
//!
//!     let feed = spawn_feed(
//!         monitor.clone(),
//!         Box::new(demo_source(24)),
//!         std::time::Duration::from_secs(300),
//!     );
//!
//!     feed.await.unwrap();
//!     println!("{:?}", monitor.summary(None).await);
//! }
//! ```

pub mod history;
pub mod service;
pub mod source;
pub mod stats;

pub use history::{ReadingHistory, DEFAULT_HISTORY_CAPACITY};
pub use service::{GlucoseMonitor, MonitorConfig, MonitorEvent, Recorded, SensorState};
pub use source::{demo_profile, demo_source, spawn_feed, ReadingSource, ScriptedSource};
pub use stats::{summarize, GlucoseSummary};
