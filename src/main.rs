use clap::Parser;
use flat_notices::app::{self, RunOptions};
use flat_notices::config::{Cli, Command, SettingsCommand, TemplateCommand};
use flat_notices::utils::logger;
use flat_notices::{AppDirs, NoticeError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = e.exit_code();
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: Cli) -> Result<(), NoticeError> {
    let dirs = AppDirs::resolve(cli.app_dir.as_deref())?;
    let now = chrono::Local::now().naive_local();

    match cli.command {
        Command::Generate(args) => {
            let overrides = args.to_overrides()?;
            let options = RunOptions {
                dry_run: args.dry_run,
                remember: !args.no_save,
            };
            let report =
                app::generate(&dirs, args.config(), overrides, now, options).await?;

            if report.dry_run {
                println!(
                    "🔍 Dry run: {} notices would be written to {}",
                    report.count,
                    report.output_dir.display()
                );
                for doc in &report.documents {
                    println!("  {}  {} {}", doc.file_name, doc.date, doc.time);
                }
                println!("📦 Archive would be: {}", report.archive_path.display());
            } else {
                println!("✅ Generated {} notices", report.count);
                println!("📁 Documents: {}", report.output_dir.display());
                println!("📦 Archive: {}", report.archive_path.display());
            }
        }
        Command::Settings(SettingsCommand::Show) => {
            let settings = dirs.settings().load();
            if settings.is_empty() {
                println!("No saved settings in {}", dirs.settings().path().display());
            } else {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            }
        }
        Command::Settings(SettingsCommand::Save(args)) => {
            let overrides = args.to_overrides()?;
            app::save_settings(&dirs, args.config.as_deref(), overrides, now)?;
            println!("✅ Settings saved to {}", dirs.settings().path().display());
        }
        Command::Settings(SettingsCommand::Path) => {
            println!("{}", dirs.settings().path().display());
        }
        Command::Template(TemplateCommand::Export { file }) => {
            app::export_template(&dirs, &file)?;
            println!("✅ Template saved to {}", file.display());
        }
        Command::History(args) => {
            let entries = app::history(&dirs, args.limit);
            if entries.is_empty() {
                println!("No runs recorded yet");
            }
            for entry in entries {
                println!(
                    "{}  {:>4} notices  {}",
                    entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    entry.count,
                    entry.archive
                );
            }
        }
    }

    Ok(())
}
