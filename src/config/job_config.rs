use crate::domain::model::Replacement;
use crate::utils::error::{NoticeError, Result};
use crate::utils::validation::{validate_file_name, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

/// A reusable generation job described in TOML. Every section is optional;
/// anything left out falls back to the saved settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobConfig {
    pub template: Option<TextSource>,
    pub apartments: Option<TextSource>,
    pub schedule: Option<ScheduleConfig>,
    pub output: Option<OutputConfig>,
    pub replacements: Option<Vec<Replacement>>,
    /// Directory relative `file` entries are resolved against.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Inline text or a UTF-8 file to read it from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextSource {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub time_from: Option<String>,
    pub time_to: Option<String>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub directory: Option<PathBuf>,
    pub archive_name: Option<String>,
}

impl JobConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| NoticeError::FileReadError {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_toml_str(&content)?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${NAME}` with the environment variable; unknown names are left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn template_text(&self) -> Result<Option<String>> {
        self.read_source(self.template.as_ref())
    }

    pub fn apartments_text(&self) -> Result<Option<String>> {
        self.read_source(self.apartments.as_ref())
    }

    fn read_source(&self, source: Option<&TextSource>) -> Result<Option<String>> {
        let Some(source) = source else {
            return Ok(None);
        };

        if let Some(text) = &source.text {
            return Ok(Some(text.clone()));
        }

        match &source.file {
            Some(file) => {
                let path = match &self.base_dir {
                    Some(base) if file.is_relative() => base.join(file),
                    _ => file.clone(),
                };
                read_text_file(&path).map(Some)
            }
            None => Ok(None),
        }
    }
}

impl Validate for JobConfig {
    fn validate(&self) -> Result<()> {
        for (field, source) in [("template", &self.template), ("apartments", &self.apartments)] {
            if let Some(source) = source {
                if source.text.is_some() && source.file.is_some() {
                    return Err(NoticeError::ConfigError {
                        message: format!("[{}] sets both text and file, pick one", field),
                    });
                }
            }
        }

        if let Some(output) = &self.output {
            if let Some(dir) = &output.directory {
                validate_path("output.directory", &dir.to_string_lossy())?;
            }
            if let Some(name) = &output.archive_name {
                validate_file_name("output.archive_name", name.trim())?;
            }
        }

        Ok(())
    }
}

pub fn read_text_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| NoticeError::FileReadError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_parse_full_job() {
        let toml_content = r#"
[template]
text = "Кв. {{flat}}: {{date}} {{time}}"

[apartments]
text = "1, 2, 3"

[schedule]
date_from = "2024-06-01"
date_to = "2024-06-05"
time_from = "09:00"
time_to = "18:00"
seed = 11

[output]
directory = "./out"
archive_name = "june"

[[replacements]]
from = "ЖК Салют"
to = "ЖК Красный Металлист"
"#;

        let config = JobConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let schedule = config.schedule.as_ref().unwrap();
        assert_eq!(schedule.date_from.as_deref(), Some("2024-06-01"));
        assert_eq!(schedule.seed, Some(11));
        assert_eq!(
            config.output.as_ref().unwrap().archive_name.as_deref(),
            Some("june")
        );
        assert_eq!(config.replacements.as_ref().unwrap().len(), 1);
        assert_eq!(
            config.apartments_text().unwrap().as_deref(),
            Some("1, 2, 3")
        );
    }

    #[test]
    fn test_empty_job_is_valid() {
        let config = JobConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert!(config.template_text().unwrap().is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("FLAT_NOTICES_TEST_ARCHIVE", "from-env");

        let config = JobConfig::from_toml_str(
            r#"
[output]
archive_name = "${FLAT_NOTICES_TEST_ARCHIVE}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.output.unwrap().archive_name.as_deref(),
            Some("from-env")
        );

        std::env::remove_var("FLAT_NOTICES_TEST_ARCHIVE");
    }

    #[test]
    fn test_unknown_env_var_is_kept() {
        let config = JobConfig::from_toml_str(
            r#"
[template]
text = "${FLAT_NOTICES_SURELY_UNSET}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.template_text().unwrap().as_deref(),
            Some("${FLAT_NOTICES_SURELY_UNSET}")
        );
    }

    #[test]
    fn test_text_and_file_together_is_rejected() {
        let config = JobConfig::from_toml_str(
            r#"
[template]
text = "inline"
file = "template.txt"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_archive_name_with_separator_is_rejected() {
        let config = JobConfig::from_toml_str(
            r#"
[output]
archive_name = "../elsewhere"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_relative_files_resolve_against_job_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("notice.txt"), "Кв. {{flat}}").unwrap();
        std::fs::write(temp_dir.path().join("flats.txt"), "10\n11\n").unwrap();
        let job_path = temp_dir.path().join("job.toml");
        std::fs::write(
            &job_path,
            "[template]\nfile = \"notice.txt\"\n\n[apartments]\nfile = \"flats.txt\"\n",
        )
        .unwrap();

        let config = JobConfig::from_file(&job_path).unwrap();
        assert_eq!(config.template_text().unwrap().as_deref(), Some("Кв. {{flat}}"));
        assert_eq!(config.apartments_text().unwrap().as_deref(), Some("10\n11\n"));
    }

    #[test]
    fn test_missing_source_file_reports_path() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[template]\nfile = \"/definitely/not/here.txt\"\n")
            .unwrap();

        let config = JobConfig::from_file(temp_file.path()).unwrap();
        let err = config.template_text().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            JobConfig::from_toml_str("[template\n"),
            Err(NoticeError::TomlError(_))
        ));
    }
}
