use std::{
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{LevelFilter, info};
use munge::{
    config::Config,
    diff::{munged_path, unified_diff},
    munge_file,
};

/// Filter a CircuitPython library module for release
#[derive(Parser, Debug)]
#[command(name = "munge", version, about, long_about = None)]
struct Cli {
    /// Module to munge
    input: PathBuf,

    /// Where to write the result, `-` for stdout
    #[arg(default_value = "-")]
    output: PathBuf,

    /// Write a unified diff against the input instead of the munged module
    #[arg(long, overrides_with = "no_diff")]
    diff: bool,

    /// Write the munged module (default)
    #[arg(long, overrides_with = "diff")]
    no_diff: bool,

    /// Version stamped into `__version__` [default: munged-version]
    #[arg(long)]
    munged_version: Option<String>,

    /// Keep the original text of every rewritten line as a trailing comment
    #[arg(long)]
    annotate: bool,

    /// TOML file with defaults for the options above
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Merge command line flags over the config file
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        if let Some(version) = &self.munged_version {
            config.munged_version.clone_from(version);
        }
        if self.annotate {
            config.annotate = true;
        }
        if self.diff {
            config.diff = true;
        } else if self.no_diff {
            config.diff = false;
        }

        Ok(config)
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn write_output(output: &Path, content: &str) -> Result<()> {
    if output == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .context("Failed to write to stdout")?;
        stdout.flush().context("Failed to flush stdout")
    } else {
        std::fs::write(output, content)
            .with_context(|| format!("Failed to write {}", output.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    anyhow::ensure!(
        cli.input.exists(),
        "Input file {} does not exist",
        cli.input.display()
    );

    info!(
        "Munging {} with version {}",
        cli.input.display(),
        config.munged_version
    );
    let munged = munge_file(&cli.input, &config.munged_version, &config.munge_options())?;

    let content = if config.diff {
        let original = std::fs::read_to_string(&cli.input)
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        unified_diff(
            &original,
            &munged,
            &cli.input.display().to_string(),
            &munged_path(&cli.input).display().to_string(),
        )
    } else {
        munged
    };

    write_output(&cli.output, &content)
}
