use crate::core::apartments::parse_apartments;
use crate::core::docx::{render_docx, DOCX_EXTENSION};
use crate::core::schedule::SlotPicker;
use crate::core::template::Template;
use crate::core::{
    DocumentSummary, GenerationReport, NoticeBatch, NoticeContext, Pipeline, RenderedBatch,
    RenderedNotice, RequestProvider, Storage,
};
use crate::utils::error::{NoticeError, Result};
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const DOCUMENT_PREFIX: &str = "Уведомление_кв_";
pub const OUTPUT_FOLDER_PREFIX: &str = "output_notifications_";
pub const DEFAULT_ARCHIVE_PREFIX: &str = "уведомления_";
pub const RUN_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

pub fn document_file_name(apartment: &str) -> String {
    format!("{}{}.{}", DOCUMENT_PREFIX, apartment, DOCX_EXTENSION)
}

pub struct NoticePipeline<S: Storage, C: RequestProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: RequestProvider> NoticePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn run_stamp(&self) -> String {
        self.config.started_at().format(RUN_STAMP_FORMAT).to_string()
    }

    fn archive_file(&self) -> String {
        let name = self.config.archive_name().trim();
        if name.is_empty() {
            format!("{}{}.zip", DEFAULT_ARCHIVE_PREFIX, self.run_stamp())
        } else {
            format!("{}.zip", name)
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: RequestProvider> Pipeline for NoticePipeline<S, C> {
    async fn extract(&self) -> Result<NoticeBatch> {
        let template = Template::new(self.config.template());
        if template.is_empty() {
            return Err(NoticeError::EmptyTemplate);
        }

        let apartments = parse_apartments(self.config.apartments_text());
        if apartments.is_empty() {
            return Err(NoticeError::NoApartments);
        }

        tracing::debug!("Parsed apartments: {}", apartments.join(", "));

        Ok(NoticeBatch {
            template: template.text().to_string(),
            apartments,
        })
    }

    async fn transform(&self, batch: NoticeBatch) -> Result<RenderedBatch> {
        let template =
            Template::new(&batch.template).with_replacements(self.config.replacements().to_vec());

        for token in template.unknown_placeholders() {
            tracing::warn!("Template contains unknown placeholder {}, it will be left as is", token);
        }

        let mut picker = SlotPicker::from_seed(
            self.config.date_range(),
            self.config.time_range(),
            self.config.seed(),
        );

        let mut notices = Vec::with_capacity(batch.apartments.len());
        for apartment in batch.apartments {
            let slot = picker.next_slot();
            let context = NoticeContext {
                flat: apartment.clone(),
                date: slot.date_string(),
                time: slot.time_string(),
            };

            let text = template.render(&context);
            let document = render_docx(&text).map_err(|e| NoticeError::DocumentError {
                apartment: apartment.clone(),
                message: e.to_string(),
            })?;

            tracing::debug!(
                "Rendered notice for apartment {} at {} {}",
                apartment,
                context.date,
                context.time
            );

            notices.push(RenderedNotice {
                file_name: document_file_name(&apartment),
                apartment,
                date: slot.date,
                time: slot.time,
                text,
                document,
            });
        }

        Ok(RenderedBatch {
            notices,
            output_folder: format!("{}{}", OUTPUT_FOLDER_PREFIX, self.run_stamp()),
            archive_file: self.archive_file(),
        })
    }

    async fn load(&self, rendered: RenderedBatch) -> Result<GenerationReport> {
        tracing::debug!(
            "Writing {} documents into {}",
            rendered.notices.len(),
            rendered.output_folder
        );

        for notice in &rendered.notices {
            let path = format!("{}/{}", rendered.output_folder, notice.file_name);
            self.storage
                .write_file(&path, &notice.document)
                .await
                .map_err(|e| NoticeError::DocumentError {
                    apartment: notice.apartment.clone(),
                    message: e.to_string(),
                })?;
        }

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            for notice in &rendered.notices {
                zip.start_file(notice.file_name.as_str(), SimpleFileOptions::default())?;
                zip.write_all(&notice.document)?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
        self.storage
            .write_file(&rendered.archive_file, &zip_data)
            .await?;

        Ok(self.preview(&rendered).into_written())
    }

    fn preview(&self, rendered: &RenderedBatch) -> GenerationReport {
        let root = self.config.output_root();
        GenerationReport {
            count: rendered.notices.len(),
            output_dir: root.join(&rendered.output_folder),
            archive_path: root.join(&rendered.archive_file),
            documents: rendered
                .notices
                .iter()
                .map(|notice| DocumentSummary {
                    apartment: notice.apartment.clone(),
                    date: notice.date.format(crate::core::schedule::DATE_FORMAT).to_string(),
                    time: notice.time.format(crate::core::schedule::TIME_FORMAT).to_string(),
                    file_name: notice.file_name.clone(),
                })
                .collect(),
            dry_run: true,
        }
    }
}

impl GenerationReport {
    fn into_written(mut self) -> Self {
        self.dry_run = false;
        self
    }
}
