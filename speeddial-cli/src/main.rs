use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use speeddial::{LoadOptions, PresetBank};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod report;

/// Inspect and normalize speed dial preset files.
#[derive(Parser, Debug)]
#[command(name = "speeddial-cli", version, about)]
struct Cli {
    /// Reject non-numeric or out-of-range numbers instead of reading them as 0.
    #[arg(long, global = true)]
    strict: bool,

    /// Name of the element wrapping the presets when writing.
    #[arg(long, global = true, default_value = speeddial::bank::DEFAULT_CONTAINER_TAG)]
    container: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a preset file and list its presets.
    Check {
        file: PathBuf,
    },
    /// Load a preset file and write it back sorted, with normalized shortcuts.
    Normalize {
        file: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the presets of a file as JSON.
    Json {
        file: PathBuf,
    },
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            strict_numbers: self.strict,
        }
    }
}

fn load_bank(path: &Path, options: &LoadOptions) -> Result<PresetBank> {
    let xml = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let bank = PresetBank::from_xml_str(&xml, options)
        .with_context(|| format!("Failed to load presets from {}", path.display()))?;
    debug!(path = %path.display(), presets = bank.len(), "Loaded preset bank");
    Ok(bank)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .finish()
        .init();

    let cli = Cli::parse();
    let options = cli.load_options();

    match &cli.command {
        Command::Check { file } => {
            let bank = load_bank(file, &options)?;
            print!("{}", report::table(&bank));
        },
        Command::Normalize { file, output } => {
            let bank = load_bank(file, &options)?;
            let mut xml = bank.to_xml_string(&cli.container)?;
            xml.push('\n');
            match output {
                Some(output) => {
                    std::fs::write(output, xml)
                        .with_context(|| format!("Failed to write {}", output.display()))?;
                    info!(path = %output.display(), presets = bank.len(), "Wrote normalized presets");
                },
                None => print!("{xml}"),
            }
        },
        Command::Json { file } => {
            let bank = load_bank(file, &options)?;
            println!("{}", serde_json::to_string_pretty(&bank)?);
        },
    }

    Ok(())
}
