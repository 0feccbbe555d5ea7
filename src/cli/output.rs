use colored::Colorize;

use crate::core::models::change_descriptor::ChangeType;

/// Print a success message.
pub fn success(msg: &str) {
    println!("  {} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    println!("  {} {}", "⚠".yellow(), msg);
}

/// Print an error message.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    println!("\n{}", msg.bold());
}

/// Format a change type as a colored label.
pub fn change_type(change_type: ChangeType) -> String {
    match change_type {
        ChangeType::Add => "add".green().to_string(),
        ChangeType::Edit => "edit".yellow().to_string(),
        ChangeType::Delete => "delete".red().to_string(),
    }
}

/// Truncate a string to `max_len` characters, appending "..." if needed.
/// Uses char boundaries to avoid panic on multibyte UTF-8 sequences.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let limit = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(limit).collect();
        format!("{truncated}...")
    }
}
