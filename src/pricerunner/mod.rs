//! PriceRunner integration: HTTP client, response models, and offer handling.

pub mod client;
pub mod models;
pub mod offers;

pub use client::{PriceLookup, PriceRunnerClient};
pub use models::ProductId;
pub use offers::{Offer, OfferSet, OfferSummary, Price};
