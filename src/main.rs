//! Glucowatch demo driver
//!
//! Runs a scripted sensor day through the monitoring pipeline and reports
//! the resulting summary. Useful for exercising the full path (classify,
//! record, alert) without the API server.

use glucowatch::alert::AlertLog;
use glucowatch::config::Config;
use glucowatch::monitor::{
    demo_source, spawn_feed, GlucoseMonitor, MonitorConfig, ScriptedSource,
};
use glucowatch::profile::{EmergencyContact, Medication, PatientProfile, ProfileStore};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "glucowatch=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Glucowatch Monitoring Engine v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_default();

    let alerts = Arc::new(AlertLog::new(config.alerts.capacity));
    let profiles = Arc::new(ProfileStore::new());
    register_demo_profile(&profiles).await?;

    let monitor = Arc::new(GlucoseMonitor::new(
        MonitorConfig {
            history_capacity: config.monitor.history_capacity,
            stale_after_secs: config.monitor.stale_after_secs(),
        },
        Arc::clone(&alerts),
        Arc::clone(&profiles),
    ));

    // Demo: replay a scripted day curve through the monitor at speed
    demo_feed(&monitor).await?;

    // Demo: push the readings that trip the alert path
    demo_emergency(&monitor, &alerts).await?;

    report_summary(&monitor).await;

    tracing::info!("Glucowatch demo complete");
    Ok(())
}

async fn register_demo_profile(profiles: &ProfileStore) -> Result<(), Box<dyn std::error::Error>> {
    let profile = PatientProfile {
        first_name: "Sarah".to_string(),
        last_name: "Johnson".to_string(),
        age: 34,
        phone: "+1 555 0100".to_string(),
        emergency_contact: EmergencyContact {
            name: "John Johnson".to_string(),
            phone: "+1 555 0123".to_string(),
        },
        medications: vec![Medication {
            name: "Insulin glargine".to_string(),
            dosage: "10 units".to_string(),
            frequency: "once daily".to_string(),
        }],
        medical_conditions: Some("Type 1 diabetes".to_string()),
        allergies: None,
        additional_info: None,
    };

    profiles.set(profile).await?;
    tracing::info!("Registered demo patient profile");
    Ok(())
}

async fn demo_feed(monitor: &Arc<GlucoseMonitor>) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Replaying demo day curve...");

    let feed = spawn_feed(
        Arc::clone(monitor),
        Box::new(demo_source(24)),
        Duration::from_millis(20),
    );
    let recorded = feed.await?;

    tracing::info!("Recorded {} demo readings", recorded);
    Ok(())
}

async fn demo_emergency(
    monitor: &Arc<GlucoseMonitor>,
    alerts: &AlertLog,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Replaying emergency sequence...");

    // A hypo dip, recovery, then a hyper spike
    let script = ScriptedSource::new("drill", vec![3.4, 2.2, 5.1, 21.6]);
    let feed = spawn_feed(Arc::clone(monitor), Box::new(script), Duration::from_millis(20));
    feed.await?;

    for alert in alerts.recent(5).await {
        let contact = alert
            .contact
            .as_ref()
            .map(|c| format!("{} ({})", c.name, c.phone))
            .unwrap_or_else(|| "none on file".to_string());

        tracing::info!(
            "Alert: {:.1} mmol/L ({}) - notify {}",
            alert.mmol,
            alert.status,
            contact
        );
    }

    Ok(())
}

async fn report_summary(monitor: &GlucoseMonitor) {
    let summary = monitor.summary(None).await;

    if let (Some(avg), Some(min), Some(max)) = (summary.average, summary.min, summary.max) {
        tracing::info!(
            "Glucose: {} readings, avg={:.1}, min={:.1}, max={:.1}",
            summary.count,
            avg,
            min,
            max
        );
    }

    tracing::info!(
        "Time in range: {:.0}%, alerts: {}, emergencies: {}",
        summary.time_in_range_pct,
        summary.alerts,
        summary.emergencies
    );

    if let Some(current) = monitor.current().await {
        tracing::info!(
            "Current: {:.1} mmol/L ({}) - {}",
            current.value(),
            current.status(),
            current.advisory()
        );
    }
}
