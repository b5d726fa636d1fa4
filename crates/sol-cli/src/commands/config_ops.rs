use std::fs;
use std::path::Path;

use super::CliError;

pub fn settings_export() {
    print!("{}", sol_core::settings::default_toml());
}

pub fn settings_validate(file: &Path) -> Result<(), CliError> {
    let content = fs::read_to_string(file).map_err(|source| CliError::Io {
        path: file.to_path_buf(),
        source,
    })?;
    let s = sol_core::settings::parse_settings_toml(&content)?;
    println!(
        "OK: view.default_page_size={}, export.confirm_threshold={}, summary locales={}",
        s.view.default_page_size,
        s.export.confirm_threshold,
        s.locales.summary_based.len()
    );
    Ok(())
}
