use super::ui;
use crate::core::config::AppConfig;
use crate::core::money::format_currency;
use crate::core::proposal::render_proposal;
use crate::core::request::QuoteRequest;
use crate::core::writer::{OutputFormat, save_document};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, info};

/// Prices the request, renders the proposal and writes it to disk.
///
/// `format` and `output` override the configured format and location.
pub fn run(
    request: &QuoteRequest,
    format: Option<OutputFormat>,
    output: Option<PathBuf>,
    config: &AppConfig,
) -> Result<PathBuf> {
    let book = config.price_book()?;
    let result = book.compute_quote(&request.quote_input())?;

    let document = render_proposal(&request.client, &result, &config.proposal_options());
    debug!(?document, "Rendered proposal");

    let format = format.unwrap_or(config.proposal.format);
    let path = match output {
        Some(path) => path,
        None => config.proposal_path(format)?,
    };
    let writer = format.writer()?;
    let saved = save_document(&document, writer.as_ref(), &path)
        .with_context(|| format!("Failed to save {format} proposal"))?;
    info!(path = %saved.display(), %format, "Proposal saved");

    println!(
        "{}: {}",
        ui::style_text("Total Cost", ui::StyleType::TotalLabel),
        ui::style_text(
            &format_currency(result.total_cost, &config.currency_symbol),
            ui::StyleType::TotalValue
        )
    );
    println!(
        "{}: {}",
        ui::style_text("Retainer Fee (50% of Total)", ui::StyleType::TotalLabel),
        ui::style_text(
            &format_currency(result.retainer_fee, &config.currency_symbol),
            ui::StyleType::TotalValue
        )
    );
    println!("Proposal saved as {}", saved.display());
    Ok(saved)
}
