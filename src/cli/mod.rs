//! Terminal front-end for the quote commands

pub mod args;
pub mod packages;
pub mod proposal;
pub mod quote;
pub mod setup;
pub mod ui;
