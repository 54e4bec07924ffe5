//! Single-EAN lookup command.

use crate::config::Config;
use crate::format::Formatter;
use crate::pricerunner::{Offer, OfferSummary, PriceLookup, PriceRunnerClient};
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

/// Everything known about one EAN.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupReport {
    pub ean: String,
    pub product_id: Option<String>,
    pub offers: Vec<Offer>,
    pub summary: OfferSummary,
}

/// Looks up one EAN and prints its offers.
pub struct LookupCommand {
    config: Config,
}

impl LookupCommand {
    /// Creates a new lookup command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Looks up an EAN against PriceRunner and returns formatted output.
    pub async fn execute(&self, ean: &str) -> Result<String> {
        self.config.validate()?;
        let client = PriceRunnerClient::new(&self.config).context("Failed to create HTTP client")?;

        self.execute_with_client(&client, ean).await
    }

    /// Looks up an EAN with a provided client (for testing).
    pub async fn execute_with_client(&self, client: &impl PriceLookup, ean: &str) -> Result<String> {
        let report = lookup(client, ean).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_lookup(&report))
    }
}

/// Resolves an EAN and collects its offers.
pub async fn lookup(client: &impl PriceLookup, ean: &str) -> Result<LookupReport> {
    let ean = ean.trim();
    if ean.is_empty() {
        anyhow::bail!("EAN must not be empty");
    }

    info!("Looking up EAN: {}", ean);

    let Some(product_id) = client.resolve(ean).await? else {
        return Ok(LookupReport {
            ean: ean.to_string(),
            product_id: None,
            offers: Vec::new(),
            summary: OfferSummary::not_found(),
        });
    };

    let offers = client.offers(&product_id).await?;

    Ok(LookupReport {
        ean: ean.to_string(),
        product_id: Some(product_id.to_string()),
        offers: offers.offers().to_vec(),
        summary: OfferSummary::from_offers(&offers),
    })
}
