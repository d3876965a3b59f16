use crate::config::settings::HistoryStore;
use crate::core::{GenerationReport, Pipeline};
use crate::domain::model::HistoryEntry;
use crate::utils::error::Result;

pub struct GenerationEngine<P: Pipeline> {
    pipeline: P,
    history: Option<HistoryStore>,
}

impl<P: Pipeline> GenerationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            history: None,
        }
    }

    /// Successful runs get appended to `history`.
    pub fn with_history(pipeline: P, history: HistoryStore) -> Self {
        Self {
            pipeline,
            history: Some(history),
        }
    }

    pub async fn run(&self) -> Result<GenerationReport> {
        tracing::info!("Starting notice generation");

        let batch = self.pipeline.extract().await?;
        tracing::info!("Found {} apartments", batch.apartments.len());

        let rendered = self.pipeline.transform(batch).await?;
        tracing::info!("Rendered {} notices", rendered.notices.len());

        let report = self.pipeline.load(rendered).await?;
        tracing::info!("Archive saved to: {}", report.archive_path.display());

        if let Some(history) = &self.history {
            let entry = HistoryEntry {
                timestamp: chrono::Local::now().naive_local(),
                count: report.count,
                archive: report.archive_path.display().to_string(),
            };
            // the archive is already on disk, so the run still counts
            if let Err(e) = history.append(entry) {
                tracing::warn!(
                    "Could not record the run in {}: {}",
                    history.path().display(),
                    e
                );
            }
        }

        Ok(report)
    }

    /// Renders everything in memory and reports what `run` would write.
    pub async fn dry_run(&self) -> Result<GenerationReport> {
        let batch = self.pipeline.extract().await?;
        let rendered = self.pipeline.transform(batch).await?;
        let report = self.pipeline.preview(&rendered);

        for doc in &report.documents {
            tracing::info!(
                "Would write {} ({} {})",
                report.output_dir.join(&doc.file_name).display(),
                doc.date,
                doc.time
            );
        }
        tracing::info!("Would archive into {}", report.archive_path.display());

        Ok(report)
    }
}
