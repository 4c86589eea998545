//! Reading sources and the feed task
//!
//! A [`ReadingSource`] is where glucose values come from: a sensor
//! bridge, a replay file, or the built-in deterministic demo curve.
//! Sources yield plain mmol values; validation and classification happen
//! in the monitor when the feed records them. There is deliberately no
//! random generation here, so a given source always produces the same
//! session.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::service::GlucoseMonitor;

/// Supplier of glucose values for the feed task
#[async_trait]
pub trait ReadingSource: Send {
    /// Next glucose value in mmol/L, or `None` when the source is done
    async fn next_mmol(&mut self) -> Option<f64>;

    /// Short label used in logs
    fn name(&self) -> &str;
}

/// Source that replays a fixed sequence of values
pub struct ScriptedSource {
    name: String,
    values: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

#[async_trait]
impl ReadingSource for ScriptedSource {
    async fn next_mmol(&mut self) -> Option<f64> {
        self.values.pop_front()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Deterministic demo curve: a gentle sine around 5.5 mmol/L.
///
/// Matches the dashboard's demo session, one decimal per value. Every
/// value stays in or near the normal band, so the demo runs without
/// alerts.
pub fn demo_profile(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let v = 5.5 + ((i as f64) / 4.0).sin() * 1.5;
            (v * 10.0).round() / 10.0
        })
        .collect()
}

/// A scripted source pre-loaded with the demo curve
pub fn demo_source(len: usize) -> ScriptedSource {
    ScriptedSource::new("demo", demo_profile(len))
}

/// Drive a source into the monitor on a fixed cadence.
///
/// Ticks immediately, then every `interval`. Values the monitor rejects
/// are logged and skipped. The task ends when the source is exhausted
/// and resolves to the number of readings recorded.
pub fn spawn_feed(
    monitor: Arc<GlucoseMonitor>,
    mut source: Box<dyn ReadingSource>,
    interval: Duration,
) -> tokio::task::JoinHandle<usize> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut recorded = 0usize;

        loop {
            ticker.tick().await;

            match source.next_mmol().await {
                Some(mmol) => match monitor.record_mmol(mmol).await {
                    Ok(outcome) => {
                        recorded += 1;
                        if outcome.emergency {
                            tracing::warn!(
                                source = source.name(),
                                mmol,
                                "Feed delivered an emergency reading"
                            );
                        }
                    }
                    Err(e) => {
                        tracing::warn!(
                            source = source.name(),
                            error = %e,
                            "Feed value rejected"
                        );
                    }
                },
                None => break,
            }
        }

        tracing::info!(
            source = source.name(),
            readings = recorded,
            "Reading source exhausted"
        );
        recorded
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alert::AlertLog;
    use crate::monitor::MonitorConfig;
    use crate::profile::ProfileStore;

    fn test_monitor() -> Arc<GlucoseMonitor> {
        Arc::new(GlucoseMonitor::new(
            MonitorConfig::default(),
            Arc::new(AlertLog::default()),
            Arc::new(ProfileStore::new()),
        ))
    }

    #[tokio::test]
    async fn test_scripted_source_yields_in_order() {
        let mut source = ScriptedSource::new("test", [5.0, 6.0, 7.0]);
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.next_mmol().await, Some(5.0));
        assert_eq!(source.next_mmol().await, Some(6.0));
        assert_eq!(source.next_mmol().await, Some(7.0));
        assert_eq!(source.next_mmol().await, None);
    }

    #[test]
    fn test_demo_profile_is_deterministic_and_in_band() {
        let a = demo_profile(24);
        let b = demo_profile(24);
        assert_eq!(a, b);
        assert_eq!(a.len(), 24);

        // Sine around 5.5 with amplitude 1.5 never leaves [4.0, 7.0]
        for v in &a {
            assert!(*v >= 4.0 && *v <= 7.0, "demo value {} out of band", v);
        }
        assert_eq!(a[0], 5.5);
    }

    #[tokio::test]
    async fn test_spawn_feed_records_until_exhausted() {
        let monitor = test_monitor();
        let source = Box::new(ScriptedSource::new("replay", [5.0, 3.1, 6.4]));

        let handle = spawn_feed(monitor.clone(), source, Duration::from_millis(1));
        let recorded = handle.await.unwrap();

        assert_eq!(recorded, 3);
        assert_eq!(monitor.history().await.len(), 3);
        assert_eq!(monitor.current().await.unwrap().value(), 6.4);
    }

    #[tokio::test]
    async fn test_spawn_feed_skips_rejected_values() {
        let monitor = test_monitor();
        let source = Box::new(ScriptedSource::new("replay", [5.0, f64::NAN, 6.0]));

        let handle = spawn_feed(monitor.clone(), source, Duration::from_millis(1));
        let recorded = handle.await.unwrap();

        assert_eq!(recorded, 2);
        assert_eq!(monitor.history().await.len(), 2);
    }
}
