//! Use cases behind the command-line subcommands.

use crate::config::cli::LocalStorage;
use crate::config::job_config::JobConfig;
use crate::config::request::{GenerationRequest, RequestOverrides};
use crate::config::settings::{AppDirs, Settings};
use crate::core::engine::GenerationEngine;
use crate::core::pipeline::NoticePipeline;
use crate::domain::model::{GenerationReport, HistoryEntry};
use crate::utils::error::Result;
use crate::utils::validation::validate_required_field;
use chrono::NaiveDateTime;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    /// Store the resolved values as the last-used settings after a successful run.
    pub remember: bool,
}

/// Merges saved settings, the optional job file and `cli`, in that order.
pub fn resolve_request(
    dirs: &AppDirs,
    job_file: Option<&Path>,
    cli: RequestOverrides,
    now: NaiveDateTime,
) -> Result<GenerationRequest> {
    let saved = dirs.settings().load();
    let mut layers = RequestOverrides::from_settings(&saved);

    if let Some(path) = job_file {
        tracing::info!("Loading job file {}", path.display());
        let job = JobConfig::from_file(path)?;
        layers = layers.merge(RequestOverrides::from_job(&job)?);
    }

    GenerationRequest::resolve(layers.merge(cli), now)
}

pub async fn generate(
    dirs: &AppDirs,
    job_file: Option<&Path>,
    cli: RequestOverrides,
    now: NaiveDateTime,
    options: RunOptions,
) -> Result<GenerationReport> {
    let request = resolve_request(dirs, job_file, cli, now)?;
    let settings = request.to_settings();

    tracing::debug!(
        "Dates {}..={}, times {}..={}, output {}",
        request.date_from,
        request.date_to,
        request.time_from,
        request.time_to,
        request.output_root.display()
    );

    let storage = LocalStorage::new(request.output_root.clone());
    let pipeline = NoticePipeline::new(storage, request);

    if options.dry_run {
        return GenerationEngine::new(pipeline).dry_run().await;
    }

    dirs.ensure()?;
    let engine = GenerationEngine::with_history(pipeline, dirs.history());
    let report = engine.run().await?;

    if options.remember {
        dirs.settings().save(&settings)?;
    }

    Ok(report)
}

/// Resolves like `generate` would and stores the result without rendering anything.
pub fn save_settings(
    dirs: &AppDirs,
    job_file: Option<&Path>,
    cli: RequestOverrides,
    now: NaiveDateTime,
) -> Result<Settings> {
    let settings = resolve_request(dirs, job_file, cli, now)?.to_settings();
    dirs.ensure()?;
    dirs.settings().save(&settings)?;
    Ok(settings)
}

pub fn export_template(dirs: &AppDirs, destination: &Path) -> Result<()> {
    let settings = dirs.settings().load();
    let template = validate_required_field("template", &settings.template)?;
    std::fs::write(destination, template)?;
    Ok(())
}

/// Most recent entries last, as stored.
pub fn history(dirs: &AppDirs, limit: Option<usize>) -> Vec<HistoryEntry> {
    let entries = dirs.history().load();
    match limit {
        Some(limit) if limit < entries.len() => entries[entries.len() - limit..].to_vec(),
        _ => entries,
    }
}
