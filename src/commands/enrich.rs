//! CSV enrichment command: resolve each row's EAN, fetch offers, append the summary.

use crate::config::Config;
use crate::pacing::{Pacer, RandomDelay};
use crate::pricerunner::{OfferSet, OfferSummary, PriceLookup, PriceRunnerClient};
use crate::table::{EnrichedWriter, InputTable};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{Read, Write};
use tracing::{info, warn};

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Rows read and written
    pub rows: usize,
    /// Rows with at least one purchasable offer
    pub priced: usize,
    /// Rows marked "No Product Found"
    pub not_found: usize,
    /// Distinct offers written across all priced rows
    pub offers: usize,
}

/// Enriches the configured input file into the configured output file.
pub struct EnrichCommand {
    config: Config,
}

impl EnrichCommand {
    /// Creates a new enrich command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the enrichment against PriceRunner with the random pacer.
    pub async fn execute(&self) -> Result<RunSummary> {
        self.config.validate()?;

        let client = PriceRunnerClient::new(&self.config).context("Failed to create HTTP client")?;
        let pacer = RandomDelay::from_config(&self.config)?;

        let input = InputTable::open(&self.config.input).with_context(|| {
            format!("Failed to open input file: {}", self.config.input.display())
        })?;
        let mut output = EnrichedWriter::create(&self.config.output).with_context(|| {
            format!("Failed to create output file: {}", self.config.output.display())
        })?;

        info!(
            "Enriching {} into {}",
            self.config.input.display(),
            self.config.output.display()
        );

        enrich_rows(&client, &pacer, input, &mut output).await
    }
}

/// Processes every input row in order, writing each enriched row before the
/// next one starts. The pacer runs between rows, not after the last one.
pub async fn enrich_rows<R: Read, W: Write>(
    client: &impl PriceLookup,
    pacer: &impl Pacer,
    mut input: InputTable<R>,
    output: &mut EnrichedWriter<W>,
) -> Result<RunSummary> {
    output.write_header(input.headers()).context("Failed to write output header")?;

    let mut summary = RunSummary::default();

    for (index, row) in input.rows().enumerate() {
        let row = row.context("Failed to read input row")?;

        if index > 0 {
            pacer.pause().await;
        }

        let offers = fetch_offers(client, row.ean()).await?;
        let outcome = OfferSummary::from_offers(&offers);
        output.write_row(&row, &outcome).context("Failed to write output row")?;

        summary.rows += 1;
        summary.offers += offers.len();
        if outcome.is_found() {
            summary.priced += 1;
        } else {
            summary.not_found += 1;
        }
    }

    info!(
        "Done: {} rows, {} priced, {} without offers, {} offers written",
        summary.rows, summary.priced, summary.not_found, summary.offers
    );

    Ok(summary)
}

/// Looks up one EAN and summarizes its offers.
pub async fn summarize_ean(client: &impl PriceLookup, ean: &str) -> Result<OfferSummary> {
    let offers = fetch_offers(client, ean).await?;
    Ok(OfferSummary::from_offers(&offers))
}

/// Resolves an EAN and fetches its offers. Empty when nothing matched.
async fn fetch_offers(client: &impl PriceLookup, ean: &str) -> Result<OfferSet> {
    info!("Fetching offers for EAN: {}", ean);

    if ean.trim().is_empty() {
        warn!("Row has an empty EAN, skipping lookup");
        return Ok(OfferSet::new());
    }

    let Some(product_id) = client.resolve(ean).await? else {
        return Ok(OfferSet::new());
    };

    client.offers(&product_id).await
}
