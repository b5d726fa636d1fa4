//! Public engine surface: one `ChallengeSession` per challenge plus a few
//! process-wide configuration entry points.

mod session;
mod types;

pub use session::ChallengeSession;
pub use types::{EngineError, ExportResult, ExportTarget, SolutionRecord};

use std::path::Path;

pub fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Install custom settings from a TOML file. Must run before first use.
pub fn settings_load_config(path: &Path) -> Result<(), EngineError> {
    let content = std::fs::read_to_string(path).map_err(|e| EngineError::Io {
        msg: format!("{}: {e}", path.display()),
    })?;
    sol_core::settings::init_custom(content)?;
    Ok(())
}

pub fn settings_default_config() -> String {
    sol_core::settings::DEFAULT_SETTINGS_TOML.to_string()
}

pub fn trace_init(log_dir: &Path) {
    crate::trace_init::init_tracing(log_dir);
}
