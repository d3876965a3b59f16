use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NoticeError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", path.display())]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Template is empty")]
    EmptyTemplate,

    #[error("No apartment numbers found in the apartment list")]
    NoApartments,

    #[error("Invalid date '{value}' for {field}, expected YYYY-MM-DD")]
    InvalidDate { field: String, value: String },

    #[error("Invalid time '{value}' for {field}, expected HH:MM or HH:MM:SS")]
    InvalidTime { field: String, value: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Failed to write document for apartment {apartment}: {message}")]
    DocumentError { apartment: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    FileSystem,
    Archive,
    Serialization,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl NoticeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NoticeError::EmptyTemplate
            | NoticeError::NoApartments
            | NoticeError::InvalidDate { .. }
            | NoticeError::InvalidTime { .. } => ErrorCategory::Input,
            NoticeError::ConfigError { .. }
            | NoticeError::InvalidConfigValueError { .. }
            | NoticeError::MissingConfigError { .. }
            | NoticeError::TomlError(_) => ErrorCategory::Configuration,
            NoticeError::IoError(_) | NoticeError::FileReadError { .. } => {
                ErrorCategory::FileSystem
            }
            NoticeError::ZipError(_) => ErrorCategory::Archive,
            NoticeError::SerializationError(_) => ErrorCategory::Serialization,
            NoticeError::DocumentError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing | ErrorCategory::Serialization => ErrorSeverity::High,
            ErrorCategory::FileSystem | ErrorCategory::Archive => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            NoticeError::EmptyTemplate => {
                "Provide a template with --template, --template-file or a job file"
            }
            NoticeError::NoApartments => {
                "Provide apartment numbers separated by spaces, commas or newlines"
            }
            NoticeError::InvalidDate { .. } => "Use dates like 2024-05-31",
            NoticeError::InvalidTime { .. } => "Use times like 09:30",
            NoticeError::FileReadError { .. } => "Check that the file exists and is UTF-8 text",
            NoticeError::TomlError(_) => "Fix the syntax of the job file",
            NoticeError::ConfigError { .. }
            | NoticeError::InvalidConfigValueError { .. }
            | NoticeError::MissingConfigError { .. } => "Check the command line flags and job file",
            NoticeError::IoError(_) | NoticeError::DocumentError { .. } => {
                "Check free disk space and write permissions for the output directory"
            }
            NoticeError::ZipError(_) => "Remove any partial archive and run again",
            NoticeError::SerializationError(_) => {
                "Delete the corrupted settings or history file and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::FileSystem => format!("File system problem: {}", self),
            ErrorCategory::Archive => format!("Could not build the archive: {}", self),
            ErrorCategory::Serialization => format!("Could not store data: {}", self),
            ErrorCategory::Processing => format!("Generation failed: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, NoticeError>;
