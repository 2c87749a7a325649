//! Command-line arguments shared by `quote` and `proposal`.

use crate::core::pricing::{AddOn, Package};
use crate::core::request::{ClientInfo, QuoteRequest};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Read the whole request from a YAML or JSON file
    #[arg(long, conflicts_with_all = ["acres", "package", "add_ons"])]
    pub request: Option<PathBuf>,

    /// Approximate developable area in acres
    #[arg(short, long, required_unless_present = "request")]
    pub acres: Option<Decimal>,

    /// Package key or name, e.g. "comprehensive-cad"
    #[arg(short, long)]
    pub package: Option<Package>,

    /// Add-on key or name; repeat for several
    #[arg(long = "add-on")]
    pub add_ons: Vec<AddOn>,

    #[arg(long, default_value = "")]
    pub client_name: String,

    #[arg(long, default_value = "")]
    pub email: String,

    #[arg(long, default_value = "")]
    pub address: String,

    #[arg(long, default_value = "")]
    pub contact: String,

    #[arg(long, default_value = "")]
    pub location: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Proposal date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
}

impl QuoteArgs {
    /// Builds the request from a request file or the individual flags.
    /// A missing proposal date becomes `today`.
    pub fn into_request(self, today: NaiveDate) -> Result<QuoteRequest> {
        if let Some(path) = self.request {
            let mut request = QuoteRequest::load_from_path(&path)?;
            request.client.proposal_date = request.client.proposal_date.or(Some(today));
            return Ok(request);
        }

        let acres = self
            .acres
            .context("--acres is required unless --request is given")?;
        let request = QuoteRequest {
            acres,
            package: self.package,
            add_ons: self.add_ons,
            client: ClientInfo {
                name: self.client_name,
                email: self.email,
                address: self.address,
                contact_no: self.contact,
                property_location: self.location,
                property_description: self.description,
                proposal_date: self.date.or(Some(today)),
            },
        };
        debug!(?request, "Built request from arguments");
        Ok(request)
    }
}
