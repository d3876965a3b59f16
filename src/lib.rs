pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::cli::LocalStorage;
pub use crate::config::request::{GenerationRequest, RequestOverrides};
pub use crate::config::settings::{AppDirs, Settings};
pub use crate::core::{engine::GenerationEngine, pipeline::NoticePipeline};
pub use crate::domain::model::{GenerationReport, HistoryEntry};
pub use crate::utils::error::{NoticeError, Result};
