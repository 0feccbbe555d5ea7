use crate::cli::context;
use crate::cli::output;
use crate::core::errors::{DocTrailError, Result};

const DEFAULT_CONFIG: &str = r#"[doctrail]
version = "0.3.0"
format_version = 1

[audit]
enabled = true
log_file = "audit.log"

[diff]
ignored_fields = ["_id", "__v", "createdAt", "updatedAt"]
"#;

/// Execute the `doctrail init` command.
///
/// Creates the config directory with a default `config.toml` that stores
/// audit records in `audit.log`.
pub fn execute() -> Result<()> {
    let dir = context::doctrail_dir();

    if dir.join("config.toml").exists() {
        return Err(DocTrailError::InvalidConfig {
            detail: format!(
                "doctrail is already initialized ({} exists)",
                dir.join("config.toml").display()
            ),
        });
    }

    output::header("doctrail — Initializing project");

    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join("config.toml"), DEFAULT_CONFIG)?;
    output::success(&format!("Created {}", dir.join("config.toml").display()));
    output::success("Audit records will be stored in audit.log");

    Ok(())
}
