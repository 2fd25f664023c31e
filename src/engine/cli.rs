//! CLI command handler: build the run configuration, then ingest (or preview with --dry-run).

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};
use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::ingest::ingest_path;
use crate::parser::MailParser;
use crate::remote::HttpIngestService;
use crate::utils::config::{ApiConsts, PackagePaths};
use crate::utils::{
    Colors, RemoteEnv, SettingsToml, apply_file_to_config, load_remote_env, read_settings_toml,
    setup_logging,
};
use crate::{IngestConfig, RunResult};

/// Everything a run needs besides the path: the ingest config plus remote connection details.
#[derive(Clone, Debug)]
pub struct RunSettings {
    pub config: IngestConfig,
    pub server_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

/// Merge configuration sources: defaults < settings file < environment < CLI flags.
pub fn resolve_settings(cli: &Cli, file: Option<&SettingsToml>, env: &RemoteEnv) -> RunSettings {
    let mut config = IngestConfig::default();
    let mut server_url = ApiConsts::DEFAULT_SERVER_URL.to_string();

    if let Some(file) = file {
        apply_file_to_config(file, &mut config);
        if let Some(url) = &file.settings.server_url {
            server_url = url.clone();
        }
    }

    if let Some(tenant) = &env.tenant {
        config.tenant_id = tenant.clone();
    }
    if let Some(url) = &env.server_url {
        server_url = url.clone();
    }

    if let Some(tenant) = &cli.tenant {
        config.tenant_id = tenant.clone();
    }
    if let Some(source) = &cli.source {
        config.source = source.clone();
    }
    if !cli.labels.is_empty() {
        config.labels = cli.labels.clone();
    }
    if let Some(n) = cli.concurrency {
        config.concurrency = n;
    }
    if !cli.exclude.is_empty() {
        config.exclude = cli.exclude.clone();
    }
    if let Some(v) = cli.follow_links {
        config.follow_links = v;
    }
    if let Some(v) = cli.strict {
        config.strict = v;
    }
    if let Some(v) = cli.verbose {
        config.verbose = v;
    }
    if let Some(url) = &cli.server_url {
        server_url = url.clone();
    }
    config.dry_run = cli.dry_run;
    config.resume_job_id = cli.resume.clone();
    config.job_name = cli.name.clone();
    config.show_progress = !cli.json && std::io::stderr().is_terminal();

    RunSettings {
        config,
        server_url,
        api_token: env.api_token.clone(),
        timeout: Duration::from_secs(env.timeout_secs.unwrap_or(ApiConsts::DEFAULT_TIMEOUT_SECS)),
    }
}

/// Log the colored summary and every failed file.
fn print_summary(result: &RunResult) {
    if let Some(job_id) = &result.job_id {
        info!("Job {}", job_id);
    }
    info!(
        "{} files | {} | {} | {}",
        result.total,
        Colors::colorize(Colors::IMPORTED, &format!("Imported: {}", result.imported)),
        Colors::colorize(Colors::SKIPPED, &format!("Skipped: {}", result.skipped)),
        Colors::colorize(Colors::FAILED, &format!("Failed: {}", result.failed))
    );
    for err in &result.errors {
        warn!(
            "{} [{}{}]: {}",
            err.path.display(),
            err.kind,
            if err.retryable { ", retryable" } else { "" },
            err.message
        );
    }
    if result.cancelled {
        warn!("Run was cancelled before every file was processed");
    }
}

/// Run ingestion (default) or a parse-only preview when --dry-run.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let cwd = std::env::current_dir().context("resolve working directory")?;
    let env = load_remote_env(&cwd);
    let settings_path = cli.settings_path();
    let file = read_settings_toml(&settings_path);
    let settings = resolve_settings(cli, file.as_ref().ok().and_then(Option::as_ref), &env);
    // Logging depends on the merged verbose flag, so file errors are reported after setup.
    setup_logging(settings.config.verbose);
    if let Err(e) = &file {
        warn!("Ignoring {}: {}", settings_path.display(), e);
    }
    debug!(
        "{} CONFIG:{:#?}",
        PackagePaths::get().pkg_name().to_uppercase(),
        settings.config
    );

    if !settings.config.dry_run && settings.config.tenant_id.is_empty() {
        bail!(
            "no tenant configured; pass --tenant or set {}",
            PackagePaths::get().env_var("TENANT")
        );
    }

    let cancel = Arc::new(AtomicBool::new(false));
    let cancel_handler = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        cancel_handler.store(true, Ordering::Relaxed);
    })
    .context("set Ctrl+C handler")?;

    let service = HttpIngestService::new(
        settings.server_url.clone(),
        settings.api_token.clone(),
        settings.timeout,
    )?;
    debug!("Ingestion service at {}", service.base_url());

    let result = ingest_path(
        &cli.path,
        &settings.config,
        Arc::new(service),
        Arc::new(MailParser),
        cancel,
    )?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&result).context("serialize run result")?
        );
    } else {
        print_summary(&result);
    }
    if !result.success {
        bail!("{} of {} files failed", result.failed, result.total);
    }
    Ok(())
}
