use crate::config::job_config::JobConfig;
use crate::config::settings::Settings;
use crate::core::RequestProvider;
use crate::domain::model::Replacement;
use crate::utils::error::{NoticeError, Result};
use crate::utils::validation::{validate_file_name, validate_path, Validate};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::path::{Path, PathBuf};

pub const DEFAULT_ARCHIVE_NAME: &str = "уведомления";
pub const DEFAULT_DAY_SPAN: i64 = 3;
pub const DEFAULT_TIME_FROM: (u32, u32) = (8, 0);
pub const DEFAULT_TIME_TO: (u32, u32) = (17, 0);

const SETTINGS_DATE_FORMAT: &str = "%Y-%m-%d";
const SETTINGS_TIME_FORMAT: &str = "%H:%M:%S";

pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), SETTINGS_DATE_FORMAT).map_err(|_| {
        NoticeError::InvalidDate {
            field: field.to_string(),
            value: value.to_string(),
        }
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(field: &str, value: &str) -> Result<NaiveTime> {
    let value_trimmed = value.trim();
    NaiveTime::parse_from_str(value_trimmed, SETTINGS_TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value_trimmed, "%H:%M"))
        .map_err(|_| NoticeError::InvalidTime {
            field: field.to_string(),
            value: value.to_string(),
        })
}

/// One layer of request values. Layers are merged from lowest to highest
/// precedence: saved settings, job file, command line.
#[derive(Debug, Clone, Default)]
pub struct RequestOverrides {
    pub template: Option<String>,
    pub apartments: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,
    pub archive_name: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub replacements: Option<Vec<Replacement>>,
    pub seed: Option<u64>,
}

impl RequestOverrides {
    /// Saved values that no longer parse are dropped so the defaults apply.
    pub fn from_settings(settings: &Settings) -> Self {
        fn lenient<T>(parsed: Option<Result<T>>) -> Option<T> {
            match parsed? {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!("Ignoring saved setting: {}", e);
                    None
                }
            }
        }

        Self {
            template: settings.template.clone(),
            apartments: settings.apartments.clone(),
            date_from: lenient(
                settings
                    .date_from
                    .as_deref()
                    .map(|v| parse_date("date_from", v)),
            ),
            date_to: lenient(settings.date_to.as_deref().map(|v| parse_date("date_to", v))),
            time_from: lenient(
                settings
                    .time_from
                    .as_deref()
                    .map(|v| parse_time("time_from", v)),
            ),
            time_to: lenient(settings.time_to.as_deref().map(|v| parse_time("time_to", v))),
            archive_name: settings.archive_name.clone(),
            output_dir: None,
            replacements: if settings.replacements.is_empty() {
                None
            } else {
                Some(settings.replacements.clone())
            },
            seed: None,
        }
    }

    pub fn from_job(job: &JobConfig) -> Result<Self> {
        job.validate()?;

        let schedule = job.schedule.clone().unwrap_or_default();
        let output = job.output.clone().unwrap_or_default();

        Ok(Self {
            template: job.template_text()?,
            apartments: job.apartments_text()?,
            date_from: schedule
                .date_from
                .as_deref()
                .map(|v| parse_date("schedule.date_from", v))
                .transpose()?,
            date_to: schedule
                .date_to
                .as_deref()
                .map(|v| parse_date("schedule.date_to", v))
                .transpose()?,
            time_from: schedule
                .time_from
                .as_deref()
                .map(|v| parse_time("schedule.time_from", v))
                .transpose()?,
            time_to: schedule
                .time_to
                .as_deref()
                .map(|v| parse_time("schedule.time_to", v))
                .transpose()?,
            archive_name: output.archive_name,
            output_dir: output.directory.map(|dir| match &job.base_dir {
                Some(base) if dir.is_relative() => base.join(dir),
                _ => dir,
            }),
            replacements: job.replacements.clone(),
            seed: schedule.seed,
        })
    }

    /// Values set in `higher` win.
    pub fn merge(self, higher: RequestOverrides) -> Self {
        Self {
            template: higher.template.or(self.template),
            apartments: higher.apartments.or(self.apartments),
            date_from: higher.date_from.or(self.date_from),
            date_to: higher.date_to.or(self.date_to),
            time_from: higher.time_from.or(self.time_from),
            time_to: higher.time_to.or(self.time_to),
            archive_name: higher.archive_name.or(self.archive_name),
            output_dir: higher.output_dir.or(self.output_dir),
            replacements: higher.replacements.or(self.replacements),
            seed: higher.seed.or(self.seed),
        }
    }
}

/// Fully resolved inputs of one run.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub template: String,
    pub apartments: String,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub time_from: NaiveTime,
    pub time_to: NaiveTime,
    pub replacements: Vec<Replacement>,
    pub archive_name: String,
    pub output_root: PathBuf,
    pub started_at: NaiveDateTime,
    pub seed: Option<u64>,
}

impl GenerationRequest {
    /// Fills the gaps left by `layers` with defaults relative to `now`.
    pub fn resolve(layers: RequestOverrides, now: NaiveDateTime) -> Result<Self> {
        let today = now.date();
        let (from_h, from_m) = DEFAULT_TIME_FROM;
        let (to_h, to_m) = DEFAULT_TIME_TO;
        let output_root = absolute_output_root(layers.output_dir)?;

        let request = Self {
            template: layers.template.unwrap_or_default(),
            apartments: layers.apartments.unwrap_or_default(),
            date_from: layers.date_from.unwrap_or(today),
            date_to: layers
                .date_to
                .unwrap_or(today + Duration::days(DEFAULT_DAY_SPAN)),
            time_from: layers
                .time_from
                .or_else(|| NaiveTime::from_hms_opt(from_h, from_m, 0))
                .unwrap_or_default(),
            time_to: layers
                .time_to
                .or_else(|| NaiveTime::from_hms_opt(to_h, to_m, 0))
                .unwrap_or_default(),
            replacements: layers.replacements.unwrap_or_default(),
            archive_name: layers
                .archive_name
                .unwrap_or_else(|| DEFAULT_ARCHIVE_NAME.to_string()),
            output_root,
            started_at: now,
            seed: layers.seed,
        };

        request.validate()?;

        if request.date_to < request.date_from {
            tracing::warn!(
                "date_to {} is before date_from {}, every notice gets {}",
                request.date_to,
                request.date_from,
                request.date_from
            );
        }
        if request.time_to < request.time_from {
            tracing::warn!(
                "time_to {} is before time_from {}, every notice gets {}",
                request.time_to,
                request.time_from,
                request.time_from
            );
        }

        Ok(request)
    }

    /// What gets remembered as the last-used settings.
    pub fn to_settings(&self) -> Settings {
        Settings {
            template: Some(self.template.clone()),
            apartments: Some(self.apartments.clone()),
            date_from: Some(self.date_from.format(SETTINGS_DATE_FORMAT).to_string()),
            date_to: Some(self.date_to.format(SETTINGS_DATE_FORMAT).to_string()),
            time_from: Some(self.time_from.format(SETTINGS_TIME_FORMAT).to_string()),
            time_to: Some(self.time_to.format(SETTINGS_TIME_FORMAT).to_string()),
            archive_name: Some(self.archive_name.clone()),
            replacements: self.replacements.clone(),
        }
    }
}

/// Relative directories are anchored to the current directory so the paths
/// recorded in the history stay valid from anywhere.
fn absolute_output_root(output_dir: Option<PathBuf>) -> Result<PathBuf> {
    let current = std::env::current_dir()?;
    match output_dir {
        Some(dir) => {
            validate_path("output_dir", &dir.to_string_lossy())?;
            if dir.is_absolute() {
                Ok(dir)
            } else {
                Ok(std::path::absolute(current.join(dir))?)
            }
        }
        None => Ok(current),
    }
}

impl Validate for GenerationRequest {
    fn validate(&self) -> Result<()> {
        validate_path("output_dir", &self.output_root.to_string_lossy())?;
        validate_file_name("archive_name", self.archive_name.trim())?;
        Ok(())
    }
}

impl RequestProvider for GenerationRequest {
    fn template(&self) -> &str {
        &self.template
    }

    fn apartments_text(&self) -> &str {
        &self.apartments
    }

    fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.date_from, self.date_to)
    }

    fn time_range(&self) -> (NaiveTime, NaiveTime) {
        (self.time_from, self.time_to)
    }

    fn replacements(&self) -> &[Replacement] {
        &self.replacements
    }

    fn archive_name(&self) -> &str {
        &self.archive_name
    }

    fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn started_at(&self) -> NaiveDateTime {
        self.started_at
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(9, 41, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_time_accepts_both_forms() {
        assert_eq!(parse_time("t", "09:30").unwrap(), time(9, 30));
        assert_eq!(parse_time("t", "09:30:00").unwrap(), time(9, 30));
        assert!(parse_time("t", "9.30").is_err());
        assert!(parse_date("d", "01.06.2024").is_err());
    }

    #[test]
    fn test_defaults() {
        let request = GenerationRequest::resolve(RequestOverrides::default(), now()).unwrap();

        assert_eq!(request.date_from, date(2024, 6, 1));
        assert_eq!(request.date_to, date(2024, 6, 4));
        assert_eq!(request.time_from, time(8, 0));
        assert_eq!(request.time_to, time(17, 0));
        assert_eq!(request.archive_name, "уведомления");
        assert_eq!(request.output_root, std::env::current_dir().unwrap());
        assert!(request.replacements.is_empty());
    }

    #[test]
    fn test_relative_output_dir_becomes_absolute() {
        let layers = RequestOverrides {
            output_dir: Some(PathBuf::from("./notices")),
            ..RequestOverrides::default()
        };
        let request = GenerationRequest::resolve(layers, now()).unwrap();

        assert!(request.output_root.is_absolute());
        assert_eq!(
            request.output_root,
            std::env::current_dir().unwrap().join("notices")
        );
    }

    #[test]
    fn test_empty_output_dir_is_rejected() {
        let layers = RequestOverrides {
            output_dir: Some(PathBuf::new()),
            ..RequestOverrides::default()
        };
        assert!(GenerationRequest::resolve(layers, now()).is_err());
    }

    #[test]
    fn test_layer_precedence() {
        let settings = Settings {
            template: Some("from settings".to_string()),
            apartments: Some("1 2".to_string()),
            archive_name: Some("saved".to_string()),
            time_to: Some("16:00:00".to_string()),
            ..Settings::default()
        };
        let job = JobConfig::from_toml_str(
            r#"
[template]
text = "from job"

[schedule]
time_to = "15:00"
"#,
        )
        .unwrap();
        let cli = RequestOverrides {
            archive_name: Some("cli".to_string()),
            ..RequestOverrides::default()
        };

        let layers = RequestOverrides::from_settings(&settings)
            .merge(RequestOverrides::from_job(&job).unwrap())
            .merge(cli);
        let request = GenerationRequest::resolve(layers, now()).unwrap();

        assert_eq!(request.template, "from job");
        assert_eq!(request.apartments, "1 2");
        assert_eq!(request.archive_name, "cli");
        assert_eq!(request.time_to, time(15, 0));
    }

    #[test]
    fn test_broken_saved_dates_fall_back_to_defaults() {
        let settings = Settings {
            date_from: Some("yesterday".to_string()),
            time_from: Some("25:99".to_string()),
            ..Settings::default()
        };

        let request =
            GenerationRequest::resolve(RequestOverrides::from_settings(&settings), now()).unwrap();

        assert_eq!(request.date_from, date(2024, 6, 1));
        assert_eq!(request.time_from, time(8, 0));
    }

    #[test]
    fn test_broken_job_dates_are_errors() {
        let job = JobConfig::from_toml_str("[schedule]\ndate_to = \"soon\"\n").unwrap();
        assert!(matches!(
            RequestOverrides::from_job(&job),
            Err(NoticeError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_archive_name_with_path_is_rejected() {
        let layers = RequestOverrides {
            archive_name: Some("out/notices".to_string()),
            ..RequestOverrides::default()
        };
        assert!(GenerationRequest::resolve(layers, now()).is_err());
    }

    #[test]
    fn test_settings_roundtrip() {
        let layers = RequestOverrides {
            template: Some("Кв. {{flat}}".to_string()),
            apartments: Some("5, 6".to_string()),
            date_from: Some(date(2024, 7, 1)),
            time_to: Some(time(12, 45)),
            ..RequestOverrides::default()
        };
        let request = GenerationRequest::resolve(layers, now()).unwrap();

        let settings = request.to_settings();
        assert_eq!(settings.date_from.as_deref(), Some("2024-07-01"));
        assert_eq!(settings.time_to.as_deref(), Some("12:45:00"));

        let restored =
            GenerationRequest::resolve(RequestOverrides::from_settings(&settings), now()).unwrap();
        assert_eq!(restored.template, request.template);
        assert_eq!(restored.date_range(), request.date_range());
        assert_eq!(restored.time_range(), request.time_range());
        assert_eq!(restored.archive_name, request.archive_name);
    }
}
