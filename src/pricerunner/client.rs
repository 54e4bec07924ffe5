//! HTTP client for the PriceRunner search and offer endpoints.

use super::models::{OffersResponse, ProductId, SearchResponse};
use super::offers::OfferSet;
use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Restricts offers to domestic shops selling new (or unspecified) items, cheapest first.
const OFFER_FILTERS: &str = "af_ORIGIN=NATIONAL&af_ITEM_CONDITION=NEW,UNKNOWN&sortByPreset=PRICE";

/// Trait for resolving EANs and fetching offers - enables mocking for tests.
#[async_trait]
pub trait PriceLookup: Send + Sync {
    /// Resolves an EAN to a product id. `None` if nothing matched or the
    /// search request was rejected.
    async fn resolve(&self, ean: &str) -> Result<Option<ProductId>>;

    /// Fetches the purchasable offers for a product, deduplicated.
    async fn offers(&self, product_id: &ProductId) -> Result<OfferSet>;
}

/// Outcome of a GET: the body on 200, otherwise just the status.
enum Reply {
    Body(String),
    Status(u16),
}

/// PriceRunner HTTP client with browser impersonation.
pub struct PriceRunnerClient {
    client: Client,
    base_url: String,
    market: String,
}

impl PriceRunnerClient {
    /// Creates a client for the configured base URL and market.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            market: config.market.clone(),
        })
    }

    fn search_url(&self, ean: &str) -> String {
        format!(
            "{}/{}/api/search-compare-gateway/public/search/v5/{}?q={}",
            self.base_url,
            self.market.to_lowercase(),
            self.market.to_uppercase(),
            urlencoding::encode(ean)
        )
    }

    fn offers_url(&self, product_id: &ProductId) -> String {
        format!(
            "{}/{}/api/search-compare-gateway/public/product-detail/v0/offers/{}/{}?{}",
            self.base_url,
            self.market.to_lowercase(),
            self.market.to_uppercase(),
            urlencoding::encode(product_id.as_str()),
            OFFER_FILTERS
        )
    }

    async fn get(&self, url: &str) -> Result<Reply> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "application/json")
            .header("User-Agent", USER_AGENT)
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        if status != 200 {
            return Ok(Reply::Status(status));
        }

        let body = response.text().await.context("Failed to read response body")?;
        Ok(Reply::Body(body))
    }
}

#[async_trait]
impl PriceLookup for PriceRunnerClient {
    async fn resolve(&self, ean: &str) -> Result<Option<ProductId>> {
        let url = self.search_url(ean);

        let body = match self.get(&url).await? {
            Reply::Body(body) => body,
            Reply::Status(status) => {
                warn!("Failed to retrieve product ID for EAN: {}. Status code: {}", ean, status);
                return Ok(None);
            }
        };

        let response: SearchResponse = serde_json::from_str(&body)
            .with_context(|| format!("Malformed search response for EAN {}", ean))?;

        let product_id = response.first_product_id()?;
        match &product_id {
            Some(id) => info!("EAN {} resolved to product {}", ean, id),
            None => info!("No product found for EAN {}", ean),
        }

        Ok(product_id)
    }

    async fn offers(&self, product_id: &ProductId) -> Result<OfferSet> {
        let url = self.offers_url(product_id);

        let body = match self.get(&url).await? {
            Reply::Body(body) => body,
            Reply::Status(status) => {
                warn!(
                    "Failed to retrieve details for Product ID {}. Status code: {}",
                    product_id, status
                );
                return Ok(OfferSet::new());
            }
        };

        let response: OffersResponse = serde_json::from_str(&body)
            .with_context(|| format!("Malformed offers response for product {}", product_id))?;

        let offers = response
            .into_offer_set()
            .with_context(|| format!("Unexpected offer data for product {}", product_id))?;
        debug!("Product {} has {} distinct offers", product_id, offers.len());

        Ok(offers)
    }
}
