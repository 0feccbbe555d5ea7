use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::audit::json_lines_sink::JsonLinesSink;
use crate::adapters::audit::log_sink::LogSink;
use crate::adapters::diff::deep_diff::DeepDiff;
use crate::core::errors::{DocTrailError, Result};
use crate::core::services::diff_adapter::{DEFAULT_IGNORED_FIELDS, DiffAdapter};
use crate::core::traits::audit::AuditSink;

/// Top-level doctrail configuration read from `.doctrail/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub doctrail: DocTrailSection,
    pub audit: Option<AuditSection>,
    pub diff: Option<DiffSection>,
}

impl AppConfig {
    /// Load the configuration from `{doctrail_dir}/config.toml`.
    ///
    /// After parsing, validates the audit log filename to prevent path
    /// traversal from a tampered config file.
    pub fn load(doctrail_dir: &Path) -> Result<Self> {
        let config_path = doctrail_dir.join("config.toml");
        if !config_path.exists() {
            return Err(DocTrailError::InvalidConfig {
                detail: "config.toml not found. Run 'doctrail init' first.".into(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        Self::parse(&content)
    }

    /// Like [`load`](Self::load), but falls back to defaults when no
    /// `config.toml` exists. A present but invalid file is still an error.
    pub fn load_or_default(doctrail_dir: &Path) -> Result<Self> {
        if doctrail_dir.join("config.toml").exists() {
            Self::load(doctrail_dir)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| DocTrailError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.doctrail.format_version > CURRENT_FORMAT_VERSION {
            return Err(DocTrailError::FormatVersionTooNew {
                project_version: config.doctrail.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        if let Some(audit) = &config.audit {
            validate_simple_filename(&audit.log_file, "audit log file")?;
        }

        Ok(config)
    }

    /// The sink records go to: the JSON lines log when `[audit]` is present
    /// and enabled, the log stream otherwise.
    pub fn sink(&self, doctrail_dir: &Path) -> Arc<dyn AuditSink> {
        match &self.audit {
            Some(audit) if audit.enabled => {
                Arc::new(JsonLinesSink::from_config(doctrail_dir, Some(audit)))
            }
            _ => Arc::new(LogSink),
        }
    }

    /// Diff adapter honouring `[diff] ignored_fields`.
    pub fn diff_adapter(&self) -> DiffAdapter {
        match &self.diff {
            Some(diff) => DiffAdapter::new(Box::new(DeepDiff), diff.ignored_fields.clone()),
            None => DiffAdapter::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            doctrail: DocTrailSection {
                version: env!("CARGO_PKG_VERSION").to_string(),
                format_version: CURRENT_FORMAT_VERSION,
            },
            audit: None,
            diff: None,
        }
    }
}

/// Current format version supported by this build of doctrail.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// The `[doctrail]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DocTrailSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
}

fn default_format_version() -> u32 {
    1
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    pub enabled: bool,
    pub log_file: String,
}

/// The `[diff]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DiffSection {
    #[serde(default = "default_ignored_fields")]
    pub ignored_fields: Vec<String>,
}

fn default_ignored_fields() -> Vec<String> {
    DEFAULT_IGNORED_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// Reject names that could escape the config directory.
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        return Err(DocTrailError::InvalidConfig {
            detail: format!("Invalid {what} name: '{name}'. Use a plain file name such as 'audit.log'"),
        });
    }
    Ok(())
}
