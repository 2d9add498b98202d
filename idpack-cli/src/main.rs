use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use clap::ValueEnum;
use idpack::IdPacker;

use crate::commands::CodecOverrides;
use crate::commands::Command;
use crate::settings::Settings;

mod commands;
mod logging;
mod settings;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogOutputFormat {
    Json,
    Pretty,
}

/// Command line arguments for the idpack tool.
#[derive(Debug, Parser)]
#[clap(name = "idpack", version, about = "Compact encoding of identifier sets")]
struct IdpackArgs {
    /// Optional path to the configuration file. If not provided, the
    /// defaults are used, overlaid with any `IDPACK_` environment variables.
    #[clap(short = 'c', long, required = false, global = true)]
    config: Option<PathBuf>,

    #[clap(short = 'o', long = "output-format", default_value = "pretty", global = true)]
    output_format: Option<LogOutputFormat>,

    #[clap(flatten)]
    overrides: CodecOverrides,

    #[clap(subcommand)]
    command: Command,
}

fn main() -> anyhow::Result<()> {
    // Parse the command line arguments.
    let args = IdpackArgs::parse();

    // Configure the binary's stderr output based on the provided output format.
    let pretty = matches!(args.output_format, Some(LogOutputFormat::Pretty));
    logging::setup_logging("info,idpack=debug", pretty);

    // Load the configuration file and/or environment variables.
    let settings = Settings::new(args.config.as_ref()).context("failed to load settings")?;
    let config = args.overrides.apply(idpack::Config::from(&settings.codec));
    tracing::debug!(
        window_size = config.window_size.get(),
        alphabet = %config.alphabet,
        exclude_null = config.exclude_null,
        value_limit = ?config.value_limit,
        "loaded codec configuration"
    );

    let input = match args.command.input() {
        Some(input) => input.to_string(),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read input from stdin")?;
            input
        }
    };

    let output = commands::run(&args.command, &IdPacker::new(config), &input)?;
    println!("{output}");

    Ok(())
}
