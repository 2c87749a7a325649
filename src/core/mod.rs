//! Core business logic: pricing, proposal assembly and document output

pub mod config;
pub mod error;
pub mod log;
pub mod money;
pub mod pricing;
pub mod proposal;
pub mod request;
pub mod writer;

// Re-export main types for cleaner imports
pub use error::{InvalidInputError, RenderError};
pub use pricing::{AddOn, Package, PriceBook, QuoteInput, QuoteResult, ServiceName, compute_quote};
pub use proposal::{Document, ProposalOptions, render_proposal};
pub use request::{ClientInfo, QuoteRequest};
pub use writer::{DocumentWriter, OutputFormat, save_document};
