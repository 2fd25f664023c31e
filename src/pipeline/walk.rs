//! File discovery: resolve the input path and walk it into an ordered list of candidate files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::IngestConfig;
use crate::engine::tools::{has_extension, should_include_in_walk};
use crate::error::DiscoveryError;
use crate::utils::config::EMAIL_EXTENSION;

/// One result from a directory walk: either an entry to consider or an error with optional path.
pub enum WalkOutcome {
    Ok { path: PathBuf, is_file: bool },
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`].
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) => {
            let is_file = entry.file_type().is_file();
            WalkOutcome::Ok {
                path: entry.into_path(),
                is_file,
            }
        }
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

/// Candidate files plus anything the walk had to skip.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Canonical input path (file or directory).
    pub root: PathBuf,
    /// Absolute candidate paths in lexical depth-first order.
    pub files: Vec<PathBuf>,
    /// Entries the walk could not read, with the error message. Empty in strict mode.
    pub skipped_paths: Vec<(PathBuf, String)>,
}

/// (candidate files, skipped paths with their error message).
pub type WalkLoopResult = (Vec<PathBuf>, Vec<(PathBuf, String)>);

/// Consume `iter`, keep regular files with the expected extension, and collect walk errors.
/// In strict mode the first error ends discovery.
pub fn run_walk_loop<I>(iter: I, strict: bool) -> Result<WalkLoopResult, DiscoveryError>
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut files = Vec::new();
    let mut skipped = Vec::new();
    let mut last_path: Option<PathBuf> = None;
    for outcome in iter {
        match outcome {
            WalkOutcome::Ok { path, is_file } => {
                if is_file && has_extension(&path, EMAIL_EXTENSION) {
                    last_path = Some(path.clone());
                    files.push(path);
                }
            }
            WalkOutcome::Err { msg, path } => {
                if strict {
                    return Err(DiscoveryError::Walk(msg));
                }
                // Errors without a path are recorded against the last good file for context.
                let to_push = path.unwrap_or_else(|| {
                    PathBuf::from(format!(
                        "<no-path, last was {}>",
                        last_path
                            .as_ref()
                            .map(|p| p.display().to_string())
                            .unwrap_or_else(|| "<none>".to_string())
                    ))
                });
                skipped.push((to_push, msg));
            }
        }
    }
    Ok((files, skipped))
}

/// Discover candidate files under `path`.
///
/// A single file must carry the `.eml` extension. A directory is walked recursively with
/// entries sorted by name, so the order is stable across runs. OS clutter files and
/// `config.exclude` matches are skipped; an excluded directory prunes its subtree.
pub fn discover(path: &Path, config: &IngestConfig) -> Result<Discovery, DiscoveryError> {
    if std::fs::symlink_metadata(path).is_err() {
        return Err(DiscoveryError::NotFound(path.to_path_buf()));
    }
    let root = path.canonicalize().map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if root.is_file() {
        if !has_extension(&root, EMAIL_EXTENSION) {
            return Err(DiscoveryError::UnsupportedFile {
                path: root,
                expected: EMAIL_EXTENSION.to_string(),
            });
        }
        return Ok(Discovery {
            files: vec![root.clone()],
            root,
            skipped_paths: Vec::new(),
        });
    }

    let exclude = config.exclude.clone();
    let walk_root = root.clone();
    let iter = WalkDir::new(&root)
        .follow_links(config.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |e| should_include_in_walk(e.path(), &walk_root, &exclude))
        .map(to_outcome_walkdir);
    let (files, skipped_paths) = run_walk_loop(iter, config.strict)?;

    if files.is_empty() {
        return Err(DiscoveryError::NoMatches {
            path: root,
            expected: EMAIL_EXTENSION.to_string(),
        });
    }
    Ok(Discovery {
        root,
        files,
        skipped_paths,
    })
}
