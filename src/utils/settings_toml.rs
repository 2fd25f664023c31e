//! Load `.emlpush.toml` (CLI only). Lib callers build [`IngestConfig`] directly.

use serde::Deserialize;
use std::path::Path;

use crate::IngestConfig;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsToml {
    #[serde(default)]
    pub settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SettingsSection {
    pub tenant: Option<String>,
    pub source: Option<String>,
    pub labels: Option<Vec<String>>,
    pub concurrency: Option<usize>,
    pub server_url: Option<String>,
    pub exclude: Option<Vec<String>>,
    pub follow_links: Option<bool>,
    pub strict: Option<bool>,
    pub verbose: Option<bool>,
}

/// Read a settings file. `Ok(None)` when it is missing or unreadable.
pub fn read_settings_toml(path: &Path) -> Result<Option<SettingsToml>, toml::de::Error> {
    let Ok(s) = std::fs::read_to_string(path) else {
        return Ok(None);
    };
    toml::from_str(&s).map(Some)
}

/// Like [`read_settings_toml`], but a parse error is logged and ignored.
pub fn load_settings_toml(path: &Path) -> Option<SettingsToml> {
    read_settings_toml(path)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
        .flatten()
}

/// Overwrite config field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $config:expr, $sec_field:ident => $config_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $config.$config_field = v;
        }
    };
}

/// Apply file settings (only fields present in the file). Call before env and CLI.
/// dry_run, resume and job name are per-invocation and never read from the file.
pub fn apply_file_to_config(file: &SettingsToml, config: &mut IngestConfig) {
    let sec = &file.settings;
    apply_file_opt!(sec, config, tenant => tenant_id);
    apply_file_opt!(sec, config, source => source);
    apply_file_opt!(sec, config, labels => labels);
    apply_file_opt!(sec, config, concurrency => concurrency);
    apply_file_opt!(sec, config, exclude => exclude);
    apply_file_opt!(sec, config, follow_links => follow_links);
    apply_file_opt!(sec, config, strict => strict);
    apply_file_opt!(sec, config, verbose => verbose);
}
