use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

/// Bulk email ingestion into a remote content service.
#[derive(Clone, Debug, Parser)]
#[command(name = "emlpush", version)]
#[command(about = "Ingest a directory of .eml files; use --dry-run to parse without submitting.")]
pub struct Cli {
    /// Email file or directory to ingest.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Tenant that owns the job. Falls back to EMLPUSH_TENANT or the settings file.
    #[arg(long, short = 't')]
    pub tenant: Option<String>,

    /// Platform / source tag sent with the job and each item.
    #[arg(long, short = 's')]
    pub source: Option<String>,

    /// Label attached to the job and every item. Repeatable: --label a --label b
    #[arg(long = "label", short = 'l', value_name = "LABEL")]
    pub labels: Vec<String>,

    /// Worker threads. 1 processes files strictly in order.
    #[arg(long, short = 'j')]
    pub concurrency: Option<usize>,

    /// Parse and report only; never create a job or submit.
    #[arg(long)]
    pub dry_run: bool,

    /// Resume an existing job instead of creating one. Every file is submitted again.
    #[arg(long, value_name = "JOB_ID")]
    pub resume: Option<String>,

    /// Job name. Default: "<source> import: <path>".
    #[arg(long, short = 'n')]
    pub name: Option<String>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Follow symbolic links.
    #[arg(long, short = 'f', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub follow_links: Option<bool>,

    /// Strict mode: fail on first permission error instead of skipping.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub strict: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Print the run result as JSON on stdout instead of the colored summary.
    #[arg(long)]
    pub json: bool,

    /// Settings file. Default: `.emlpush.toml` in the working directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Ingestion service base URL. Falls back to EMLPUSH_SERVER_URL, then the settings file.
    #[arg(long)]
    pub server_url: Option<String>,
}

impl Cli {
    /// Settings file path, defaulting to the package settings filename in the working directory.
    pub fn settings_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(PackagePaths::get().settings_filename()))
    }
}
