use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::core::errors::{DocTrailError, Result};
use crate::core::models::audit_record::AuditRecord;
use crate::core::traits::audit::AuditSink;

/// Audit sink that appends records as JSON lines to a file.
///
/// Each line in the log file is a self-contained JSON object representing
/// one `AuditRecord`. This format supports efficient append operations
/// and line-by-line streaming reads.
pub struct JsonLinesSink {
    log_path: PathBuf,
}

impl JsonLinesSink {
    /// Create a sink that writes to `{doctrail_dir}/{log_file}`.
    pub fn new(doctrail_dir: &Path, log_file: &str) -> Self {
        Self {
            log_path: doctrail_dir.join(log_file),
        }
    }

    /// Create a sink from the `[audit]` section, falling back to defaults
    /// if the section is missing.
    pub fn from_config(
        doctrail_dir: &Path,
        audit_section: Option<&crate::config::app_config::AuditSection>,
    ) -> Self {
        let log_file = audit_section
            .map(|a| a.log_file.as_str())
            .unwrap_or("audit.log");
        Self::new(doctrail_dir, log_file)
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.log_path
    }

    /// Read stored records, optionally filtered by actor and date.
    ///
    /// The actor filter is a case-insensitive substring match on the
    /// actor's text form. `since` keeps records created at or after it.
    pub fn query(
        &self,
        actor: Option<&str>,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<AuditRecord>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path).map_err(|e| DocTrailError::SinkFailure {
            detail: format!("Cannot read audit log: {e}"),
        })?;

        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| DocTrailError::SinkFailure {
                detail: format!("Error reading audit log line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: AuditRecord =
                serde_json::from_str(trimmed).map_err(|e| DocTrailError::SinkFailure {
                    detail: format!("Malformed audit record at line {}: {e}", line_num + 1),
                })?;

            if let Some(actor_filter) = actor
                && !record
                    .actor_label()
                    .to_lowercase()
                    .contains(&actor_filter.to_lowercase())
            {
                continue;
            }

            if let Some(since_date) = since
                && record.recorded_at < since_date
            {
                continue;
            }

            records.push(record);
        }

        Ok(records)
    }
}

impl AuditSink for JsonLinesSink {
    fn store(&self, record: &AuditRecord) -> Result<()> {
        let line = serde_json::to_string(record).map_err(|e| DocTrailError::SinkFailure {
            detail: format!("Failed to serialize audit record: {e}"),
        })?;

        if let Some(parent) = self.log_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| DocTrailError::SinkFailure {
                detail: format!("Cannot open audit log at {}: {e}", self.log_path.display()),
            })?;

        writeln!(file, "{line}").map_err(|e| DocTrailError::SinkFailure {
            detail: format!("Failed to write audit record: {e}"),
        })?;

        Ok(())
    }

    fn has_storage(&self) -> bool {
        true
    }
}
