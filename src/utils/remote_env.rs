//! Remote connection settings: process env → `.env` in the working directory.

use std::path::Path;

use crate::utils::config::PackagePaths;

/// Values read from `EMLPUSH_*` variables. Any of them may be absent.
#[derive(Clone, Debug, Default)]
pub struct RemoteEnv {
    pub server_url: Option<String>,
    pub api_token: Option<String>,
    pub tenant: Option<String>,
    pub timeout_secs: Option<u64>,
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Load `.env` from `dir` if present (existing process vars win), then read the `EMLPUSH_*` keys.
pub fn load_remote_env(dir: &Path) -> RemoteEnv {
    let env_path = dir.join(".env");
    if env_path.is_file() {
        let _ = dotenvy::from_path(&env_path);
    }
    let paths = PackagePaths::get();
    RemoteEnv {
        server_url: non_empty_var(&paths.env_var("SERVER_URL")),
        api_token: non_empty_var(&paths.env_var("API_TOKEN")),
        tenant: non_empty_var(&paths.env_var("TENANT")),
        timeout_secs: non_empty_var(&paths.env_var("API_TIMEOUT_SECS"))
            .and_then(|s| s.parse().ok()),
    }
}
