//! Binary entry point for the Cadenza command-script runner.
#![forbid(unsafe_code)]

#[path = "cli/config.rs"]
mod config;

use std::error::Error;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

use cadenza::cli::{read_script, OutputFormat, ScriptRunner};
use cadenza::{RelationalStore, StoreOptions};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::CliConfig;

const LOG_ENV: &str = "CADENZA_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "cadenza",
    version,
    about = "Artist/song relation store driven by command scripts",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "CADENZA_CONFIG",
        value_name = "PATH",
        help = "Path to the CLI config file"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_enum,
        help = "Output format (overrides the config file)"
    )]
    format: Option<FormatArg>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Executes a command script against a fresh store.
    Run {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        #[arg(long, value_name = "SLOTS", help = "Initial slots per name table")]
        table_size: Option<usize>,

        #[arg(long, value_name = "NODES", help = "Initial graph node capacity")]
        graph_size: Option<usize>,
    },
    /// Inspects the CLI configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Prints the resolved config path and effective values.
    Show,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Serialize)]
struct ConfigReport {
    path: Option<PathBuf>,
    exists: bool,
    store: StoreOptions,
    format: OutputFormat,
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let config = CliConfig::load(cli.config.clone())?;
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| config.output_format());

    match cli.command {
        Command::Run {
            script,
            table_size,
            graph_size,
        } => {
            let mut options = config.store_options();
            if let Some(slots) = table_size {
                options = options.table_capacity(slots);
            }
            if let Some(nodes) = graph_size {
                options = options.graph_capacity(nodes);
            }
            let commands = read_script(&script)?;
            let store = RelationalStore::open(options)?;
            let mut runner = ScriptRunner::new(store, format);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            let summary = runner.run(&commands, &mut out)?;
            out.flush()?;
            info!(
                script = %script.display(),
                commands = summary.commands,
                events = summary.events,
                "cli.run.done"
            );
        }
        Command::Config {
            action: ConfigAction::Show,
        } => {
            let report = ConfigReport {
                path: config.path().map(PathBuf::from),
                exists: config.exists(),
                store: config.store_options(),
                format,
            };
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => print_config_text(&report),
            }
        }
    }

    Ok(())
}

fn print_config_text(report: &ConfigReport) {
    match &report.path {
        Some(path) if report.exists => println!("config: {}", path.display()),
        Some(path) => println!("config: {} (not found, using defaults)", path.display()),
        None => println!("config: none"),
    }
    println!("table_capacity: {}", report.store.table_capacity);
    println!("graph_capacity: {}", report.store.graph_capacity);
    let format = match report.format {
        OutputFormat::Text => "text",
        OutputFormat::Json => "json",
    };
    println!("format: {format}");
}
