pub mod apartments;
pub mod docx;
pub mod engine;
pub mod pipeline;
pub mod schedule;
pub mod template;

pub use crate::domain::model::{
    DocumentSummary, GenerationReport, NoticeBatch, NoticeContext, RenderedBatch, RenderedNotice,
};
pub use crate::domain::ports::{Pipeline, RequestProvider, Storage};
pub use crate::utils::error::Result;
