pub mod cli;
pub mod job_config;
pub mod request;
pub mod settings;

#[cfg(feature = "cli")]
pub use args::{
    Cli, Command, GenerateArgs, HistoryArgs, SettingsArgs, SettingsCommand, TemplateCommand,
};

#[cfg(feature = "cli")]
mod args {
    use super::job_config::read_text_file;
    use super::request::{parse_date, parse_time, RequestOverrides};
    use crate::utils::error::Result;
    use chrono::{NaiveDate, NaiveTime};
    use clap::{Args, Parser, Subcommand};
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    #[command(name = "flat-notices")]
    #[command(about = "Generates one notice per apartment from a template and zips them")]
    pub struct Cli {
        #[command(subcommand)]
        pub command: Command,

        /// Enable verbose output
        #[arg(short, long, global = true)]
        pub verbose: bool,

        /// Emit log lines as JSON
        #[arg(long, global = true)]
        pub log_json: bool,

        /// Directory for settings.json and history.json
        #[arg(long, global = true)]
        pub app_dir: Option<PathBuf>,
    }

    #[derive(Debug, Subcommand)]
    pub enum Command {
        /// Render the notices and write the archive
        Generate(GenerateArgs),
        /// Inspect or update the saved settings
        #[command(subcommand)]
        Settings(SettingsCommand),
        /// Work with the saved template
        #[command(subcommand)]
        Template(TemplateCommand),
        /// Show previous runs
        History(HistoryArgs),
    }

    #[derive(Debug, Subcommand)]
    pub enum SettingsCommand {
        /// Print the saved settings as JSON
        Show,
        /// Save the given values without generating anything
        Save(SettingsArgs),
        /// Print the settings file location
        Path,
    }

    #[derive(Debug, Subcommand)]
    pub enum TemplateCommand {
        /// Write the saved template to a file
        Export {
            /// Destination file
            #[arg(default_value = "template.txt")]
            file: PathBuf,
        },
    }

    #[derive(Debug, Args)]
    pub struct HistoryArgs {
        /// Show only the most recent entries
        #[arg(short, long)]
        pub limit: Option<usize>,
    }

    /// Values that can be remembered as the last-used settings.
    #[derive(Debug, Clone, Default, Args)]
    pub struct SettingsArgs {
        /// TOML job file
        #[arg(short, long)]
        pub config: Option<PathBuf>,

        /// Template text with {{flat}}, {{date}} and {{time}} placeholders
        #[arg(long, conflicts_with = "template_file")]
        pub template: Option<String>,

        /// Read the template from a UTF-8 file
        #[arg(long)]
        pub template_file: Option<PathBuf>,

        /// Apartment numbers separated by spaces, commas or newlines
        #[arg(long, conflicts_with = "apartments_file")]
        pub apartments: Option<String>,

        /// Read the apartment list from a UTF-8 file
        #[arg(long)]
        pub apartments_file: Option<PathBuf>,

        /// First possible date (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        pub date_from: Option<NaiveDate>,

        /// Last possible date (YYYY-MM-DD)
        #[arg(long, value_parser = date_arg)]
        pub date_to: Option<NaiveDate>,

        /// Earliest time of day (HH:MM)
        #[arg(long, value_parser = time_arg)]
        pub time_from: Option<NaiveTime>,

        /// Latest time of day (HH:MM)
        #[arg(long, value_parser = time_arg)]
        pub time_to: Option<NaiveTime>,

        /// Archive name without extension; empty means a timestamped name
        #[arg(long)]
        pub archive_name: Option<String>,
    }

    #[derive(Debug, Clone, Default, Args)]
    pub struct GenerateArgs {
        #[command(flatten)]
        pub inputs: SettingsArgs,

        /// Where the output folder and the archive are created
        #[arg(short, long)]
        pub output_dir: Option<PathBuf>,

        /// Seed for reproducible dates and times
        #[arg(long)]
        pub seed: Option<u64>,

        /// Show what would be written without touching the disk
        #[arg(long)]
        pub dry_run: bool,

        /// Do not remember these values as the last-used settings
        #[arg(long)]
        pub no_save: bool,
    }

    fn date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
        parse_date("date", value).map_err(|e| e.to_string())
    }

    fn time_arg(value: &str) -> std::result::Result<NaiveTime, String> {
        parse_time("time", value).map_err(|e| e.to_string())
    }

    impl SettingsArgs {
        /// Command-line layer; template and apartment files are read here.
        pub fn to_overrides(&self) -> Result<RequestOverrides> {
            let template = match (&self.template, &self.template_file) {
                (Some(text), _) => Some(text.clone()),
                (None, Some(path)) => Some(read_text_file(path)?),
                (None, None) => None,
            };
            let apartments = match (&self.apartments, &self.apartments_file) {
                (Some(text), _) => Some(text.clone()),
                (None, Some(path)) => Some(read_text_file(path)?),
                (None, None) => None,
            };

            Ok(RequestOverrides {
                template,
                apartments,
                date_from: self.date_from,
                date_to: self.date_to,
                time_from: self.time_from,
                time_to: self.time_to,
                archive_name: self.archive_name.clone(),
                output_dir: None,
                replacements: None,
                seed: None,
            })
        }
    }

    impl GenerateArgs {
        pub fn config(&self) -> Option<&std::path::Path> {
            self.inputs.config.as_deref()
        }

        pub fn to_overrides(&self) -> Result<RequestOverrides> {
            Ok(RequestOverrides {
                output_dir: self.output_dir.clone(),
                seed: self.seed,
                ..self.inputs.to_overrides()?
            })
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_parse_generate_flags() {
            let cli = Cli::parse_from([
                "flat-notices",
                "generate",
                "--template",
                "Кв. {{flat}}",
                "--apartments",
                "1,2",
                "--date-from",
                "2024-06-01",
                "--time-to",
                "18:30",
                "--seed",
                "9",
                "--dry-run",
            ]);

            let Command::Generate(args) = cli.command else {
                panic!("expected generate");
            };
            assert!(args.dry_run);

            let overrides = args.to_overrides().unwrap();
            assert_eq!(overrides.template.as_deref(), Some("Кв. {{flat}}"));
            assert_eq!(overrides.apartments.as_deref(), Some("1,2"));
            assert_eq!(overrides.date_from, NaiveDate::from_ymd_opt(2024, 6, 1));
            assert_eq!(overrides.time_to, NaiveTime::from_hms_opt(18, 30, 0));
            assert_eq!(overrides.seed, Some(9));
        }

        #[test]
        fn test_bad_date_is_rejected_by_parser() {
            let result = Cli::try_parse_from([
                "flat-notices",
                "generate",
                "--date-from",
                "01.06.2024",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_template_and_template_file_conflict() {
            let result = Cli::try_parse_from([
                "flat-notices",
                "generate",
                "--template",
                "x",
                "--template-file",
                "t.txt",
            ]);
            assert!(result.is_err());
        }

        #[test]
        fn test_settings_save_rejects_run_only_flags() {
            for flag in ["--dry-run", "--no-save"] {
                let result = Cli::try_parse_from(["flat-notices", "settings", "save", flag]);
                assert!(result.is_err(), "{} should be rejected", flag);
            }
            let result =
                Cli::try_parse_from(["flat-notices", "settings", "save", "--seed", "3"]);
            assert!(result.is_err());
        }

        #[test]
        fn test_settings_save_takes_form_values() {
            let cli = Cli::parse_from([
                "flat-notices",
                "settings",
                "save",
                "--template",
                "Кв. {{flat}}",
                "--archive-name",
                "june",
            ]);

            let Command::Settings(SettingsCommand::Save(args)) = cli.command else {
                panic!("expected settings save");
            };
            let overrides = args.to_overrides().unwrap();
            assert_eq!(overrides.template.as_deref(), Some("Кв. {{flat}}"));
            assert_eq!(overrides.archive_name.as_deref(), Some("june"));
            assert!(overrides.seed.is_none());
        }

        #[test]
        fn test_global_flags_after_subcommand() {
            let cli = Cli::parse_from(["flat-notices", "history", "--limit", "3", "-v"]);
            assert!(cli.verbose);
            assert!(matches!(cli.command, Command::History(HistoryArgs { limit: Some(3) })));
        }
    }
}
