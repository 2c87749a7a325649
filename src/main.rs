use anyhow::Result;
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use landquote::cli::args::QuoteArgs;
use landquote::core::log::init_logging;
use landquote::core::writer::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List packages, their services and the add-ons
    Packages,
    /// Display the cost breakdown for a quote
    Quote(QuoteArgs),
    /// Generate the client proposal document
    Proposal {
        #[command(flatten)]
        quote: QuoteArgs,

        /// Document format (text, html, json); defaults to the configured one
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Where to write the proposal; defaults to the configured location
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let today = Local::now().date_naive();
    let result = match cli.command {
        Some(Commands::Setup) => landquote::cli::setup::setup().map(|path| {
            println!("Created default configuration at {}", path.display());
        }),
        Some(Commands::Packages) => {
            landquote::run_command(landquote::AppCommand::Packages, config_path)
        }
        Some(Commands::Quote(args)) => args.into_request(today).and_then(|request| {
            landquote::run_command(landquote::AppCommand::Quote(request), config_path)
        }),
        Some(Commands::Proposal {
            quote,
            format,
            output,
        }) => quote.into_request(today).and_then(|request| {
            landquote::run_command(
                landquote::AppCommand::Proposal {
                    request,
                    format,
                    output,
                },
                config_path,
            )
        }),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
