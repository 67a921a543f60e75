use anyhow::{Context as _, bail};
use clap::{Args, Parser, Subcommand};
use engine::apps::AppId;
use log::LevelFilter;
use matyou::commands::{Context, apply, store};
use matyou::config::{self, ConfigLoadResult};
use matyou::logger::setup_logger;
use matyou::output::{self, OutputFormat};
use matyou::palette::PaletteSource;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "matyou")]
#[command(about = "Apply Material You palettes to desktop application configs")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ~/.config/matyou/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply a palette, backing up every file first
    Apply(ApplyCommand),
    /// Show what `apply` would change without touching any file
    Preview(ApplyCommand),
    /// Show which configuration files were found for each app
    Detect {
        /// Comma-separated apps (default: all)
        #[arg(long, value_delimiter = ',')]
        apps: Option<Vec<String>>,
    },
    /// Check a palette without applying it
    Validate {
        #[arg(long, value_name = "PATH")]
        palette: PathBuf,
        /// Report missing required roles as warnings
        #[arg(long)]
        lenient: bool,
    },
    /// Theme snapshots: whole applies that can be rolled back together
    #[command(subcommand)]
    Snapshots(SnapshotCommand),
    /// Individual file backups
    #[command(subcommand)]
    Backups(BackupCommand),
}

#[derive(Args, Debug)]
struct ApplyCommand {
    /// Palette JSON file
    #[arg(long, value_name = "PATH", conflicts_with = "default", required_unless_present = "default")]
    palette: Option<PathBuf>,
    /// Use the built-in Material You baseline palette
    #[arg(long)]
    default: bool,
    /// Comma-separated apps (default: `apply.apps` or all)
    #[arg(long, value_delimiter = ',')]
    apps: Option<Vec<String>>,
    /// Theme name recorded in the snapshot
    #[arg(long)]
    name: Option<String>,
    /// Report missing required roles as warnings
    #[arg(long)]
    lenient: bool,
}

impl ApplyCommand {
    fn into_args(self, preview: bool) -> apply::ApplyArgs {
        let palette = match (self.default, self.palette) {
            (false, Some(path)) => PaletteSource::File(path),
            _ => PaletteSource::Default,
        };
        apply::ApplyArgs {
            palette,
            apps: self.apps,
            theme_name: self.name,
            lenient: self.lenient,
            preview,
        }
    }
}

#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// List snapshots, newest first
    List,
    /// Show the current theme
    Current,
    /// Roll back every file of a snapshot
    Restore { snapshot_id: String },
}

#[derive(Subcommand, Debug)]
enum BackupCommand {
    /// List backups, newest first
    List {
        #[arg(long)]
        app: Option<AppId>,
    },
    /// Copy a backup over its original file
    Restore {
        backup_id: String,
        /// Do not back up the file's current content first
        #[arg(long)]
        no_backup_current: bool,
    },
    /// Check backup copies against their recorded hashes
    Verify { backup_id: Option<String> },
    /// Delete backups beyond the retention policy
    Cleanup {
        #[arg(long)]
        keep_count: Option<usize>,
        #[arg(long)]
        keep_days: Option<i64>,
    },
    /// Backup store statistics
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let app_config = match config::load_config(cli.config.as_deref()) {
        ConfigLoadResult::Success(config) => *config,
        ConfigLoadResult::LoadError(msg) | ConfigLoadResult::DeserializeError(msg) => {
            bail!(matyou::AppError::Config(msg))
        }
    };

    let level_override = match cli.verbose {
        0 => None,
        1 => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Err(e) = setup_logger(app_config.logging(), level_override) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }

    let ctx = Context::from_env(app_config)?;
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let code = dispatch(&ctx, cli.command, &mut out, format)?;
    out.flush().context("Failed to write output")?;
    Ok(code)
}

fn dispatch(
    ctx: &Context,
    command: Command,
    out: &mut dyn Write,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    match command {
        Command::Apply(args) => apply_or_preview(ctx, args.into_args(false), out, format),
        Command::Preview(args) => apply_or_preview(ctx, args.into_args(true), out, format),
        Command::Detect { apps } => {
            let results = apply::run_detect(ctx, apps.as_deref())?;
            output::write_detections(out, &results, format)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Validate { palette, lenient } => {
            let report = apply::run_validate(&PaletteSource::File(palette), lenient)?;
            output::write_palette_report(out, &report, format)?;
            Ok(exit_code(report.is_valid()))
        }
        Command::Snapshots(command) => {
            match command {
                SnapshotCommand::List => {
                    output::write_snapshots(out, &store::list_snapshots(ctx)?, format)?
                }
                SnapshotCommand::Current => {
                    let current = store::current_snapshot(ctx)?;
                    output::write_current_snapshot(out, current.as_ref(), format)?
                }
                SnapshotCommand::Restore { snapshot_id } => {
                    let restore = store::restore_snapshot(ctx, &snapshot_id)?;
                    output::write_snapshot_restore(out, &restore, format)?
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Backups(command) => {
            match command {
                BackupCommand::List { app } => {
                    output::write_backups(out, &store::list_backups(ctx, app)?, format)?
                }
                BackupCommand::Restore {
                    backup_id,
                    no_backup_current,
                } => {
                    let restore = store::restore_backup(ctx, &backup_id, !no_backup_current)?;
                    output::write_backup_restore(out, &restore, format)?
                }
                BackupCommand::Verify { backup_id } => {
                    let results = store::verify_backups(ctx, backup_id.as_deref())?;
                    output::write_verify_results(out, &results, format)?;
                    let intact = results.iter().all(|result| result.integrity.is_intact());
                    return Ok(exit_code(intact));
                }
                BackupCommand::Cleanup {
                    keep_count,
                    keep_days,
                } => {
                    let cleanup = store::cleanup_backups(ctx, keep_count, keep_days)?;
                    output::write_cleanup(out, &cleanup, format)?
                }
                BackupCommand::Stats => output::write_stats(out, &store::backup_stats(ctx)?, format)?,
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn apply_or_preview(
    ctx: &Context,
    args: apply::ApplyArgs,
    out: &mut dyn Write,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let report = apply::run_apply(ctx, &args)?;
    output::write_apply_report(out, &report, format)?;
    Ok(exit_code(report.success))
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
