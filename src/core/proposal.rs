//! Assembles the client-facing proposal from a computed quote.
//!
//! The result is a format-agnostic [`Document`]; turning it into bytes is the
//! job of a [`DocumentWriter`](crate::core::writer::DocumentWriter).

use crate::core::money::{format_acres, format_currency};
use crate::core::pricing::QuoteResult;
use crate::core::request::ClientInfo;
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_TITLE: &str = "PROPOSAL DOCUMENT";
pub const ADD_ONS_HEADING: &str = "Additional Services Requested:";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Field { label: String, value: String },
    Spacer,
    Heading { text: String },
    Bullet { text: String },
}

impl Block {
    fn field(label: &str, value: impl Into<String>) -> Self {
        Block::Field {
            label: label.to_string(),
            value: value.into(),
        }
    }
}

/// A rendered proposal, laid out top to bottom.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    pub date: Option<NaiveDate>,
    pub blocks: Vec<Block>,
}

impl Document {
    /// Value of the first field with `label`.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.blocks.iter().find_map(|block| match block {
            Block::Field { label: l, value } if l == label => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn bullets(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Bullet { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProposalOptions {
    pub title: String,
    pub currency_symbol: String,
}

impl Default for ProposalOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

/// Lays out the proposal. The field order is fixed and empty client fields
/// still get a row.
pub fn render_proposal(
    client: &ClientInfo,
    result: &QuoteResult,
    options: &ProposalOptions,
) -> Document {
    let money = |amount| format_currency(amount, &options.currency_symbol);

    let mut blocks = vec![
        Block::Spacer,
        Block::field("Client Name", client.name.as_str()),
        Block::field("Email", client.email.as_str()),
        Block::field("Address", client.address.as_str()),
        Block::field("Contact No", client.contact_no.as_str()),
        Block::field("Property Location", client.property_location.as_str()),
        Block::field("Property Description", client.property_description.as_str()),
        Block::field(
            "Approx. Developable Area",
            format!("{} acres", format_acres(result.acreage)),
        ),
        Block::field("Selected Package", result.package.name()),
        Block::field("Total Cost", money(result.total_cost)),
        Block::field("Retainer Fee (50% of Total)", money(result.retainer_fee)),
    ];

    if !result.add_ons.is_empty() {
        blocks.push(Block::Spacer);
        blocks.push(Block::Heading {
            text: ADD_ONS_HEADING.to_string(),
        });
        blocks.extend(result.add_ons.iter().map(|add_on| Block::Bullet {
            text: add_on.name().to_string(),
        }));
    }

    Document {
        title: options.title.clone(),
        date: client.proposal_date,
        blocks,
    }
}
