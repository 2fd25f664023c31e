use std::path::PathBuf;

use crate::IngestConfig;

/// Log paths the walk had to skip (permission errors, broken links). Lists each one in verbose mode.
pub fn report_skipped_paths(config: &IngestConfig, skipped_paths: &[(PathBuf, String)]) {
    if skipped_paths.is_empty() {
        return;
    }
    log::warn!(
        "Skipped {} paths due to permission errors or access issues",
        skipped_paths.len()
    );
    if config.verbose {
        for (p, msg) in skipped_paths {
            eprintln!("  skipped: {} ({})", p.display(), msg);
        }
    }
}
