//! Cellgrid - run spreadsheet command scripts against a reactive sheet

mod config;
mod error;
mod script;

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use cellgrid_core::{Sheet, SheetOptions};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::{Config, PrintMode, load_config};
use script::{PrintTarget, parse_script, print_sheet, run_script};

#[derive(Debug, Parser)]
#[command(name = "cellgrid", version, about)]
struct Cli {
    /// Command script to run (reads stdin when omitted)
    script: Option<PathBuf>,

    /// Config file to use instead of the user config
    #[arg(long, value_name = "FILE", conflicts_with = "no_config")]
    config: Option<PathBuf>,

    /// Ignore any config file
    #[arg(long)]
    no_config: bool,

    /// Print the sheet after the script has run
    #[arg(short, long, value_enum)]
    print: Option<PrintMode>,

    /// Column separator for printed rows
    #[arg(long)]
    separator: Option<String>,

    /// Ignore `clear` of out-of-range cells instead of failing
    #[arg(long)]
    lenient: bool,
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .try_init();
}

fn read_script(path: Option<&PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut content = String::new();
            io::stdin()
                .read_to_string(&mut content)
                .context("Failed to read script from stdin")?;
            Ok(content)
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let (mut config, warnings) = if cli.no_config {
        (Config::default(), Vec::new())
    } else {
        load_config(cli.config.as_deref())
    };
    init_logging(&config);
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Some(print) = cli.print {
        config.print = print;
    }
    if let Some(separator) = cli.separator {
        config.separator = separator;
    }
    if cli.lenient {
        config.strict_positions = false;
    }

    let content = read_script(cli.script.as_ref())?;
    let statements = parse_script(&content)?;

    let mut sheet = Sheet::with_options(SheetOptions {
        strict_positions: config.strict_positions,
    });
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let failures = run_script(&mut sheet, &statements, &mut out, &config.separator)?;

    let targets: &[PrintTarget] = match config.print {
        PrintMode::None => &[],
        PrintMode::Values => &[PrintTarget::Values],
        PrintMode::Texts => &[PrintTarget::Texts],
        PrintMode::Both => &[PrintTarget::Texts, PrintTarget::Values],
    };
    for target in targets {
        print_sheet(&sheet, *target, &mut out, &config.separator)?;
    }
    out.flush()?;

    for failure in &failures {
        eprintln!("Error: {}", failure);
    }
    Ok(failures.is_empty())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
