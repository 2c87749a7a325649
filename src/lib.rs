pub mod cli;
pub mod core;

use crate::core::config::AppConfig;
use crate::core::request::QuoteRequest;
use crate::core::writer::OutputFormat;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, info};

pub enum AppCommand {
    Packages,
    Quote(QuoteRequest),
    Proposal {
        request: QuoteRequest,
        format: Option<OutputFormat>,
        output: Option<PathBuf>,
    },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Land planning quote starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Packages => cli::packages::run(&config),
        AppCommand::Quote(request) => cli::quote::run(&request, &config).map(|_| ()),
        AppCommand::Proposal {
            request,
            format,
            output,
        } => cli::proposal::run(&request, format, output, &config).map(|_| ()),
    }
}
