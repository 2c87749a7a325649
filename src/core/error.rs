//! Error kinds surfaced by the pricing engine and the document writers.

use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

/// Rejected quote input. Reported to the user as-is, never retried.
#[derive(Debug, Error, PartialEq)]
pub enum InvalidInputError {
    #[error("no package selected")]
    NoPackageSelected,

    #[error("acreage must be greater than zero, got {acres}")]
    NonPositiveAcreage { acres: Decimal },

    #[error("acreage {acres} is too large to price")]
    AcreageTooLarge { acres: Decimal },

    #[error("unknown package: {0}")]
    UnknownPackage(String),

    #[error("unknown add-on: {0}")]
    UnknownAddOn(String),

    #[error("fixed cost for {service} cannot be negative, got {amount}")]
    NegativeFixedCost { service: String, amount: Decimal },
}

/// Failure while serializing or saving a rendered document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write proposal to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize proposal")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid proposal template")]
    TemplateSyntax(#[from] handlebars::TemplateError),

    #[error("failed to render proposal template")]
    Template(#[from] handlebars::RenderError),
}
