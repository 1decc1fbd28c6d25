#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;

use vosync::app_config::{self, Config};
use vosync::app_controller::Controller;
use vosync::language_utils::Language;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a voiceover CSV table, or every table in a directory, to JSON
    Convert {
        /// CSV file or directory of CSV files
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Output directory (defaults to json_dir from the config)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// List the voiceover lines of a scene
    Inspect {
        /// Scene name, e.g. 'forest' for voiceovers_forest.json
        scene: String,
    },

    /// Play a line's subtitles in the terminal in real time
    Preview {
        /// Scene name
        scene: String,

        /// Voiceover line key
        key: String,

        /// Subtitle language (e.g. 'en', 'jp', 'ja', 'japanese')
        #[arg(short = 'L', long)]
        language: Option<String>,

        /// Length of the simulated clip in seconds
        #[arg(short, long, default_value_t = 5.0)]
        clip_length: f32,
    },

    /// Generate shell completions for vosync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// vosync - voiceover subtitle synchronization
///
/// Converts voiceover tables into per-scene subtitle collections and previews
/// their timed playback.
#[derive(Parser, Debug)]
#[command(name = "vosync")]
#[command(version)]
#[command(about = "Voiceover subtitle conversion and playback preview")]
#[command(long_about = "vosync converts voiceover CSV tables into per-scene JSON collections and previews
subtitle playback timed against a clip.

EXAMPLES:
    vosync convert voiceovers_forest.csv            # Convert one table
    vosync convert tables/ -o json/                 # Convert every table in a directory
    vosync inspect forest                           # List lines of voiceovers_forest.json
    vosync preview forest intro -L jp -c 4.0        # Play 'intro' in Japanese over 4 seconds
    vosync completions bash > vosync.bash           # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short = 'C', long = "config", default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Max level is narrowed once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "vosync", &mut std::io::stdout());
        return Ok(());
    }

    let mut config = Config::load_or_create(&cli.config_path)?;
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    }
    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Convert { input_path, output_dir } => {
            if !input_path.exists() {
                return Err(anyhow!("Input path does not exist: {:?}", input_path));
            }

            let summary = controller.convert_path(&input_path, output_dir.as_deref())?;
            for path in &summary.converted {
                info!("Success: {:?}", path);
            }
            if !summary.is_success() {
                return Err(anyhow!("{} table(s) failed to convert", summary.failed.len()));
            }
        }
        Commands::Inspect { scene } => {
            let rows = controller.describe_scene(&scene)?;
            if rows.is_empty() {
                warn!("Scene '{}' has no voiceover lines", scene);
            }
            for row in rows {
                println!("{}", row);
            }
        }
        Commands::Preview { scene, key, language, clip_length } => {
            let language = language.as_deref().map(Language::from_code).transpose()?;
            controller.preview(&scene, &key, language, clip_length).await?;
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}
