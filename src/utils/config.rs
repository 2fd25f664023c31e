//! Application configuration constants.
//! Defaults and thresholds in one place.

use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    settings_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                settings_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Settings file looked up in the working directory (e.g. `.emlpush.toml`).
    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    /// Full env var name for `key`, e.g. `env_var("API_TOKEN")` -> `EMLPUSH_API_TOKEN`.
    pub fn env_var(&self, key: &str) -> String {
        format!("{}_{}", self.env_prefix, key)
    }
}

// ---- Discovery ----

/// Extension (without dot, case-insensitive) of candidate files.
pub const EMAIL_EXTENSION: &str = "eml";

// ---- Ingestion ----

/// Type tag prefixed to locally minted content identifiers.
pub const CONTENT_TYPE_TAG: &str = "email";

/// Platform / source tag when none is configured.
pub const DEFAULT_SOURCE_TAG: &str = "email";

/// Worker count when none is configured. 1 means sequential.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Dry-run parses this many files per worker before recording the batch.
pub const PREVIEW_BATCH_PER_WORKER: usize = 8;

/// Worker count bounds.
#[derive(Clone, Copy, Debug)]
pub struct ConcurrencyLimits {
    /// Lower bound; 0 from config is treated as sequential.
    pub floor: usize,
    /// Upper bound regardless of what the user asks for.
    pub max: usize,
}

impl Default for ConcurrencyLimits {
    fn default() -> Self {
        Self {
            floor: Self::FLOOR,
            max: Self::MAX,
        }
    }
}

impl ConcurrencyLimits {
    pub const FLOOR: usize = 1;
    pub const MAX: usize = 64;
}

// ---- Progress ----

/// Progress bar and remote progress cadence.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Send an `UpdateProgress` call after this many processed items (plus once at the end).
    pub const REMOTE_REPORT_INTERVAL: usize = 10;
    /// Longest file name shown in the progress bar postfix.
    pub const POSTFIX_NAME_MAX: usize = 40;
}

// ---- Remote API ----

/// HTTP client defaults.
pub struct ApiConsts;

impl ApiConsts {
    /// Request timeout in seconds. Override with `EMLPUSH_API_TIMEOUT_SECS`.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 300;
    /// Server when neither config nor env provide one.
    pub const DEFAULT_SERVER_URL: &'static str = "http://localhost:8080";
}
