use chrono::{NaiveDate, TimeZone, Utc};
use colored::Colorize;

use crate::adapters::audit::json_lines_sink::JsonLinesSink;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::AuditRecord;

/// Execute the `doctrail log` command.
///
/// Displays stored audit records with optional filters for actor, date,
/// and record count.
pub fn execute(actor: Option<&str>, since: Option<&str>, last: Option<usize>) -> Result<()> {
    let dir = context::doctrail_dir();
    let config = AppConfig::load(dir)?;
    let sink = JsonLinesSink::from_config(dir, config.audit.as_ref());

    // Parse the --since flag as a date
    let since_dt = since.map(parse_since).transpose()?;

    let records = sink.query(actor, since_dt)?;

    if records.is_empty() {
        output::header("doctrail log");
        output::warning("No audit records found");
        if actor.is_some() || since.is_some() {
            println!("  Try removing filters to see all records.");
        }
        return Ok(());
    }

    // Apply --last N (take from the end)
    let skip = last.map_or(0, |n| records.len().saturating_sub(n));
    let display = &records[skip..];

    output::header(&format!("doctrail log ({} records)", display.len()));
    println!();

    for record in display {
        print_record(record);
    }

    Ok(())
}

/// Parse a date string (ISO 8601: `YYYY-MM-DD`) into a UTC DateTime.
fn parse_since(s: &str) -> Result<chrono::DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| {
        DocTrailError::InvalidConfig {
            detail: format!(
                "Invalid date format: '{s}'. Expected ISO 8601 (YYYY-MM-DD), e.g. 2026-01-15"
            ),
        }
    })?;
    Ok(Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN)))
}

/// Print a single audit record as a formatted row, followed by its changes.
fn print_record(record: &AuditRecord) {
    let date = record.recorded_at.format("%Y-%m-%d %H:%M:%S");
    let action = record.action.as_deref().unwrap_or("-");
    let subject = format!(
        "{} {}",
        record.subject_type.as_deref().unwrap_or("document"),
        record.subject_id
    );

    println!(
        "  {} {} {:<18} {} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        action.cyan(),
        subject,
        format!("by {}", record.actor_label()).dimmed(),
    );

    for (key, change) in &record.changes {
        println!("      {} {}", output::change_type(change.change_type), key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_since_accepts_iso_dates() {
        let dt = parse_since("2026-01-15").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-01-15T00:00:00+00:00");
    }

    #[test]
    fn parse_since_rejects_other_formats() {
        let err = parse_since("15/01/2026").unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));
    }
}
