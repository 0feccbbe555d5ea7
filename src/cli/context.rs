use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Config directory used when neither `--config` nor `DOCTRAIL_DIR` is set.
pub const DEFAULT_DIR: &str = ".doctrail";

static CONFIG_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Fix the config directory for the rest of the process.
/// Only the first call has an effect.
pub fn init(custom: Option<&str>) {
    let _ = CONFIG_DIR.set(PathBuf::from(custom.unwrap_or(DEFAULT_DIR)));
}

/// The config directory chosen at startup, [`DEFAULT_DIR`] before [`init`].
pub fn doctrail_dir() -> &'static Path {
    CONFIG_DIR
        .get()
        .map_or(Path::new(DEFAULT_DIR), PathBuf::as_path)
}
