use crate::utils::error::{NoticeError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(NoticeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(NoticeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

/// A bare file name: no directory components, nothing a file system would reject outright.
pub fn validate_file_name(field_name: &str, name: &str) -> Result<()> {
    const FORBIDDEN: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

    if let Some(ch) = name.chars().find(|c| FORBIDDEN.contains(c) || c.is_control()) {
        return Err(NoticeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: format!("File name must not contain {:?}", ch),
        });
    }

    if name == "." || name == ".." {
        return Err(NoticeError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: name.to_string(),
            reason: "File name must not be a directory reference".to_string(),
        });
    }

    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| NoticeError::MissingConfigError {
        field: field_name.to_string(),
    })
}
