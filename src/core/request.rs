//! A single quote submission: pricing inputs plus the client details that
//! only the proposal needs.

use crate::core::pricing::{AddOn, Package, QuoteInput};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;

/// Free-text client fields. Empty strings are valid and rendered as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub contact_no: String,
    pub property_location: String,
    pub property_description: String,
    pub proposal_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub acres: Decimal,
    #[serde(default)]
    pub package: Option<Package>,
    #[serde(default)]
    pub add_ons: Vec<AddOn>,
    #[serde(default)]
    pub client: ClientInfo,
}

impl QuoteRequest {
    /// Reads a request file. `.json` files are parsed as JSON, anything else
    /// as YAML.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file: {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let request: Self = if is_json {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse request file: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse request file: {}", path.display()))?
        };
        debug!(?request, "Loaded quote request");
        Ok(request)
    }

    pub fn quote_input(&self) -> QuoteInput {
        QuoteInput {
            acreage: self.acres,
            package: self.package,
            add_ons: self.add_ons.clone(),
        }
    }
}
