//! Glucowatch CLI
//!
//! Command-line client for a running Glucowatch API server:
//! - Log glucose readings
//! - Inspect history, stats, and alerts
//! - Check server status

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "glucowatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Continuous glucose monitoring client")]
#[command(long_about = "Glucowatch tracks blood glucose readings against fixed clinical bands.\nLog readings, watch the trend, and review emergency alerts.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log a glucose reading
    Reading {
        /// Glucose value in mmol/L
        value: f64,
        /// Timestamp (default: now). RFC 3339, e.g. 2026-08-23T07:30:00Z
        #[arg(short, long)]
        time: Option<String>,
    },

    /// Show the latest reading
    Current,

    /// Show retained readings
    History {
        /// Time window (e.g., 30m, 2h, 1d)
        #[arg(short, long)]
        last: Option<String>,
    },

    /// Show summary statistics
    Stats {
        /// Time window (e.g., 30m, 2h, 1d)
        #[arg(short, long)]
        last: Option<String>,
    },

    /// Show recent emergency alerts
    Alerts {
        /// Maximum number of alerts to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Patient profile operations
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProfileCommands {
    /// Show the registered patient profile
    Show,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Reading { value, time } => {
            // Parse timestamp
            let timestamp = match time.as_deref() {
                None | Some("now") => None,
                Some(s) => match chrono::DateTime::parse_from_rfc3339(s) {
                    Ok(dt) => Some(dt.with_timezone(&Utc)),
                    Err(_) => {
                        eprintln!("Invalid timestamp format: {} (expected RFC 3339)", s);
                        std::process::exit(1);
                    }
                },
            };

            let body = serde_json::json!({
                "mmol": value,
                "timestamp": timestamp,
            });

            let response = client
                .post(format!("{}/api/v1/readings", cli.api_url))
                .json(&body)
                .send()
                .await?;

            if response.status().is_success() {
                let reading: serde_json::Value = response.json().await?;
                print_reading(&reading);
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Current => {
            let response = client
                .get(format!("{}/api/v1/readings/current", cli.api_url))
                .send()
                .await?;

            if response.status() == reqwest::StatusCode::NOT_FOUND {
                println!("No readings recorded yet.");
                println!();
                println!("Log your first reading with:");
                println!("  glucowatch reading 5.4");
                return Ok(());
            }

            if !response.status().is_success() {
                eprintln!("Failed to fetch current reading: {}", response.status());
                std::process::exit(1);
            }

            let reading: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                print_reading(&reading);
            }
        }

        Commands::History { last } => {
            let mut url = format!("{}/api/v1/readings", cli.api_url);
            if let Some(window) = &last {
                parse_window(window)?;
                url.push_str(&format!("?last={}", window));
            }

            let response = client.get(&url).send().await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("History failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let data: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_history(&data);
            }
        }

        Commands::Stats { last } => {
            let mut url = format!("{}/api/v1/stats", cli.api_url);
            if let Some(window) = &last {
                parse_window(window)?;
                url.push_str(&format!("?last={}", window));
            }

            let response = client.get(&url).send().await?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Stats failed ({}): {}", status, text);
                std::process::exit(1);
            }

            let data: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_stats(&data);
            }
        }

        Commands::Alerts { limit } => {
            let response = client
                .get(format!("{}/api/v1/alerts?limit={}", cli.api_url, limit))
                .send()
                .await?;

            if !response.status().is_success() {
                eprintln!("Failed to fetch alerts: {}", response.status());
                std::process::exit(1);
            }

            let data: serde_json::Value = response.json().await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_alerts(&data);
            }
        }

        Commands::Profile { command } => match command {
            ProfileCommands::Show => {
                let response = client
                    .get(format!("{}/api/v1/profile", cli.api_url))
                    .send()
                    .await?;

                if response.status() == reqwest::StatusCode::NOT_FOUND {
                    println!("No patient profile registered yet.");
                    println!();
                    println!("Register one with a PUT to {}/api/v1/profile", cli.api_url);
                    return Ok(());
                }

                if !response.status().is_success() {
                    eprintln!("Failed to fetch profile: {}", response.status());
                    std::process::exit(1);
                }

                let profile: serde_json::Value = response.json().await?;

                if cli.format == "json" {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                } else {
                    print_profile(&profile);
                }
            }
        },

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Glucowatch v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Sensor: {}",
                        health["sensor"].as_str().unwrap_or("unknown")
                    );
                    println!("Readings held: {}", health["readings"].as_u64().unwrap_or(0));
                    println!(
                        "Stream clients: {}",
                        health["stream_clients"].as_u64().unwrap_or(0)
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Glucowatch API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the Glucowatch API server is running:");
                    eprintln!("  cargo run --bin glucowatch-api");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = glucowatch::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn parse_window(s: &str) -> Result<Duration, Box<dyn std::error::Error>> {
    let s = s.trim().to_lowercase();

    // Checked constructors: an absurd amount is a usage error, not a panic
    let window = if let Some(mins) = s.strip_suffix('m') {
        Duration::try_minutes(mins.parse()?)
    } else if let Some(hours) = s.strip_suffix('h') {
        Duration::try_hours(hours.parse()?)
    } else if let Some(days) = s.strip_suffix('d') {
        Duration::try_days(days.parse()?)
    } else {
        return Err(format!("Invalid window format: {}. Use: 30m, 2h, 1d", s).into());
    };

    window.ok_or_else(|| format!("Window too large: {}", s).into())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn print_reading(reading: &serde_json::Value) {
    let mmol = reading["mmol"].as_f64().unwrap_or(0.0);
    let status = reading["status"].as_str().unwrap_or("unknown");
    let ts = format_timestamp(reading["timestamp"].as_str().unwrap_or(""));

    println!("{:.1} mmol/L ({}) at {}", mmol, status, ts);

    if reading["emergency"].as_bool().unwrap_or(false) {
        println!("EMERGENCY: {}", reading["advisory"].as_str().unwrap_or(""));
    } else if let Some(advisory) = reading["advisory"].as_str() {
        println!("{}", advisory);
    }
}

fn print_history(data: &serde_json::Value) {
    let readings = match data["readings"].as_array() {
        Some(r) => r,
        None => {
            println!("No data");
            return;
        }
    };

    if readings.is_empty() {
        println!("No readings for the selected window");
        return;
    }

    println!("{:<20} {:>7}  {}", "Time (UTC)", "mmol/L", "Status");
    println!("{}", "-".repeat(45));

    for reading in readings {
        let ts = format_timestamp(reading["timestamp"].as_str().unwrap_or(""));
        let mmol = reading["mmol"].as_f64().unwrap_or(0.0);
        let status = reading["status"].as_str().unwrap_or("-");
        let marker = if reading["emergency"].as_bool().unwrap_or(false) {
            " !"
        } else {
            ""
        };

        println!("{:<20} {:>7.1}  {}{}", ts, mmol, status, marker);
    }
}

fn print_stats(data: &serde_json::Value) {
    let summary = &data["summary"];

    println!("Sensor: {}", data["sensor"].as_str().unwrap_or("unknown"));
    println!("Readings: {}", summary["count"].as_u64().unwrap_or(0));

    if let Some(avg) = summary["average"].as_f64() {
        println!("Average: {:.1} mmol/L", avg);
    }
    if let (Some(min), Some(max)) = (summary["min"].as_f64(), summary["max"].as_f64()) {
        println!("Range: {:.1} to {:.1} mmol/L", min, max);
    }

    println!(
        "Time in range: {:.0}%",
        summary["time_in_range_pct"].as_f64().unwrap_or(0.0)
    );
    println!(
        "Alerts: {} ({} emergencies)",
        summary["alerts"].as_u64().unwrap_or(0),
        summary["emergencies"].as_u64().unwrap_or(0)
    );
}

fn print_alerts(data: &serde_json::Value) {
    let alerts = match data["alerts"].as_array() {
        Some(a) => a,
        None => {
            println!("No data");
            return;
        }
    };

    if alerts.is_empty() {
        println!("No alerts raised.");
        return;
    }

    println!(
        "Showing {} of {} alerts raised",
        data["count"].as_u64().unwrap_or(0),
        data["total"].as_u64().unwrap_or(0)
    );
    println!();

    for alert in alerts {
        let ts = format_timestamp(alert["raised_at"].as_str().unwrap_or(""));
        let mmol = alert["mmol"].as_f64().unwrap_or(0.0);
        let status = alert["status"].as_str().unwrap_or("-");
        let contact = alert["contact"]["name"].as_str().unwrap_or("none on file");

        println!(
            "{}  {:>5.1} mmol/L  {:<14} notify: {}",
            ts, mmol, status, contact
        );
    }
}

fn print_profile(profile: &serde_json::Value) {
    println!(
        "{} {}, age {}",
        profile["first_name"].as_str().unwrap_or("-"),
        profile["last_name"].as_str().unwrap_or("-"),
        profile["age"].as_u64().unwrap_or(0)
    );
    println!("Phone: {}", profile["phone"].as_str().unwrap_or("-"));
    println!(
        "Emergency contact: {} ({})",
        profile["emergency_contact"]["name"].as_str().unwrap_or("-"),
        profile["emergency_contact"]["phone"]
            .as_str()
            .unwrap_or("-")
    );

    if let Some(medications) = profile["medications"].as_array() {
        if !medications.is_empty() {
            println!();
            println!("Medications:");
            for med in medications {
                println!(
                    "  {}: {} ({})",
                    med["name"].as_str().unwrap_or("-"),
                    med["dosage"].as_str().unwrap_or("-"),
                    med["frequency"].as_str().unwrap_or("-")
                );
            }
        }
    }

    if let Some(conditions) = profile["medical_conditions"].as_str() {
        println!("Conditions: {}", conditions);
    }
    if let Some(allergies) = profile["allergies"].as_str() {
        println!("Allergies: {}", allergies);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_units() {
        assert_eq!(parse_window("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_window("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_window("1d").unwrap(), Duration::days(1));
        assert_eq!(parse_window(" 2H ").unwrap(), Duration::hours(2));
    }

    #[test]
    fn test_parse_window_rejects_bad_input() {
        assert!(parse_window("2w").is_err());
        assert!(parse_window("abc").is_err());
        assert!(parse_window("m").is_err());
    }

    #[test]
    fn test_parse_window_rejects_oversized_window() {
        assert!(parse_window("9223372036854775807m").is_err());
        assert!(parse_window("99999999999999999999d").is_err());
    }

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(42), "42s");
        assert_eq!(format_duration(125), "2m 5s");
        assert_eq!(format_duration(3700), "1h 1m");
        assert_eq!(format_duration(90_000), "1d 1h");
    }
}
