//! JSON load/save for the persisted `Settings` record (spec §6), matching
//! the teacher's JSON-shaped config convention.

use std::path::Path;

use mqtt_inspect_types::Settings;

/// Load settings from `path`, falling back to defaults if the file does not
/// exist yet.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load(path: &Path) -> anyhow::Result<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Persist `settings` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, text)?;
    Ok(())
}
