use colored::Colorize;
use serde_json::Value;

use crate::cli::commands::document_io::read_optional_document;
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::models::change_descriptor::{ChangeMap, ChangeType};
use crate::core::services::change_classifier::ChangeClassifier;

/// Execute the `doctrail diff` command.
///
/// Classifies the changes between two JSON documents and displays them
/// as a table. Nothing is recorded.
pub fn execute(before: &str, after: &str) -> Result<()> {
    let config = AppConfig::load_or_default(context::doctrail_dir())?;

    let original = read_optional_document(before)?;
    let current = read_optional_document(after)?;

    let adapter = config.diff_adapter();
    let operations = adapter.compute_changes(original.as_ref(), current.as_ref());
    let changes = ChangeClassifier.classify(&operations, original.as_ref(), current.as_ref());

    output::header("🔍 doctrail diff");

    if changes.is_empty() {
        output::success("No differences found");
        return Ok(());
    }

    print_change_table(&changes);
    print_change_summary(&changes);

    Ok(())
}

/// Print the change map as a formatted table.
fn print_change_table(changes: &ChangeMap) {
    let key_width = changes.keys().map(|k| k.len()).max().unwrap_or(8).max(8);

    let header = format!(
        "  {:<width$}   {:<6}   {:<24}   {}",
        "Field",
        "Type",
        "From",
        "To",
        width = key_width
    );
    println!("{}", header.bold());
    println!("  {}", "─".repeat(header.len()));

    for (key, change) in changes {
        println!(
            "  {:<width$}   {:<6}   {:<24}   {}",
            key,
            output::change_type(change.change_type),
            render(change.from.as_ref()),
            render(change.to.as_ref()),
            width = key_width
        );
    }
}

/// Print a summary line below the table.
fn print_change_summary(changes: &ChangeMap) {
    let count = |wanted: ChangeType| {
        changes
            .values()
            .filter(|c| c.change_type == wanted)
            .count()
    };

    let mut parts = Vec::new();
    for (change_type, label) in [
        (ChangeType::Add, "added"),
        (ChangeType::Edit, "edited"),
        (ChangeType::Delete, "deleted"),
    ] {
        let n = count(change_type);
        if n > 0 {
            parts.push(format!("{n} {label}"));
        }
    }

    println!();
    output::success(&parts.join(", "));
}

/// Compact single-line rendering of one side of a change.
fn render(value: Option<&Value>) -> String {
    match value {
        None => "—".to_string(),
        Some(Value::String(s)) => output::truncate(s, 24),
        Some(other) => output::truncate(&other.to_string(), 24),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn render_absent_side_as_dash() {
        assert_eq!(render(None), "—");
    }

    #[test]
    fn render_strings_without_quotes() {
        assert_eq!(render(Some(&json!("plain"))), "plain");
    }

    #[test]
    fn render_structures_compactly() {
        assert_eq!(render(Some(&json!(["x", "y"]))), r#"["x","y"]"#);
        assert_eq!(
            render(Some(&json!({"long": "abcdefghijklmnopqrstuvwxyz"}))),
            r#"{"long":"abcdefghijkl..."#
        );
    }
}
