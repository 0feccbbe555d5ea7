use serde_json::Value;

use crate::cli::commands::document_io::{read_document, read_optional_document};
use crate::cli::{context, output};
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::change_auditor::ChangeAuditor;

/// Execute the `doctrail record` command.
///
/// Builds the audit record for the change from `before` to `after` and
/// hands it to the configured sink: the JSON lines log when auditing is
/// enabled, the log stream otherwise.
pub fn execute(
    before: &str,
    after: &str,
    actor: Option<&str>,
    action: &str,
    model: Option<&str>,
) -> Result<()> {
    let dir = context::doctrail_dir();
    let config = AppConfig::load_or_default(dir)?;

    let original = read_optional_document(before)?;
    let current = read_document(after)?;
    let actor = actor.map(|a| Value::String(a.to_string()));

    let auditor = ChangeAuditor::new(model.unwrap_or("document"), config.sink(dir))
        .with_diff_adapter(config.diff_adapter());

    let record = auditor.audit(original.as_ref(), Some(&current), action, actor.as_ref())?;

    output::header("📝 doctrail record");

    match record {
        Some(record) => {
            output::success(&format!(
                "{} change(s) recorded for {} {}",
                record.changes.len(),
                auditor.subject_type(),
                record.subject_id
            ));
            if !auditor.has_storage() {
                output::warning("Audit storage is not configured; record written to the log stream");
            }
        }
        None => output::warning("No changes to record"),
    }

    Ok(())
}
