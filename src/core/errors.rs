use std::path::PathBuf;

/// All domain errors for doctrail.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger.
#[derive(Debug, thiserror::Error)]
pub enum DocTrailError {
    #[error(
        "User missing in audit log\n\n  \
         Every audited operation must be attributable to an actor.\n\n  \
         Solutions:\n    \
         → Pass the actor explicitly: doctrail record <before> <after> --actor <id>\n    \
         → Or attach it to the document payload as a root-level \"__user\" field"
    )]
    MissingActor,

    #[error("Audit sink error: {detail}")]
    SinkFailure { detail: String },

    #[error("Invalid document: {detail}")]
    InvalidDocument { detail: String },

    #[error("Document store error: {detail}")]
    StoreFailure { detail: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "File not found: {path}\n\n  \
         Check that the path is correct and the file exists."
    )]
    FileNotFound { path: PathBuf },

    #[error(
        "This project uses format version {project_version}, but your doctrail \
         only supports up to version {supported_version}.\n\n  \
         Solutions:\n    \
         → Install latest: cargo install doctrail --force"
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DocTrailError>;
