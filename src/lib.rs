//! ean-pricer - Enrich EAN lists with live PriceRunner offers
//!
//! Reads a CSV with an `EAN` column, resolves each EAN to a PriceRunner
//! product, and appends the current merchants and prices to every row.

pub mod commands;
pub mod config;
pub mod format;
pub mod pacing;
pub mod pricerunner;
pub mod table;

pub use config::Config;
pub use pricerunner::{Offer, OfferSet, OfferSummary, Price, PriceLookup, PriceRunnerClient};
