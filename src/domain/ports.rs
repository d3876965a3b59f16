use crate::domain::model::{GenerationReport, NoticeBatch, RenderedBatch, Replacement};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::path::Path;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of the resolved inputs for one generation run.
pub trait RequestProvider: Send + Sync {
    fn template(&self) -> &str;
    fn apartments_text(&self) -> &str;
    fn date_range(&self) -> (NaiveDate, NaiveDate);
    fn time_range(&self) -> (NaiveTime, NaiveTime);
    fn replacements(&self) -> &[Replacement];
    fn archive_name(&self) -> &str;
    fn output_root(&self) -> &Path;
    fn started_at(&self) -> NaiveDateTime;
    fn seed(&self) -> Option<u64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<NoticeBatch>;
    async fn transform(&self, batch: NoticeBatch) -> Result<RenderedBatch>;
    async fn load(&self, rendered: RenderedBatch) -> Result<GenerationReport>;
    fn preview(&self, rendered: &RenderedBatch) -> GenerationReport;
}
