//! Data models for PriceRunner search and offer responses.

use super::offers::{Offer, OfferSet, Price, UNKNOWN_MERCHANT};
use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

const AVAILABLE: &str = "AVAILABLE";
const IN_STOCK: &str = "IN_STOCK";

/// PriceRunner's internal product id, as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProductId(String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads an id from a JSON value. `null`, `""` and `0` mean no product.
    fn from_value(value: &Value) -> Result<Option<Self>> {
        match value {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::Number(n) if n.as_f64() == Some(0.0) => Ok(None),
            Value::String(s) => Ok(Some(Self(s.clone()))),
            Value::Number(n) => Ok(Some(Self(n.to_string()))),
            other => anyhow::bail!("Unexpected product id in search response: {}", other),
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub products: Option<Vec<Value>>,
}

impl SearchResponse {
    /// Returns the id of the first product, if any.
    pub fn first_product_id(&self) -> Result<Option<ProductId>> {
        let Some(first) = self.products.as_deref().and_then(<[Value]>::first) else {
            return Ok(None);
        };

        let id = first.get("id").context("First search result has no `id` field")?;
        ProductId::from_value(id)
    }
}

/// Body of the product offers endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OffersResponse {
    #[serde(default)]
    pub offers: Option<Vec<RawOffer>>,
    #[serde(default)]
    pub merchants: Option<HashMap<String, Merchant>>,
}

/// A single offer as sent by the API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOffer {
    pub availability: Option<String>,
    pub stock_status: Option<String>,
    pub price: Option<RawPrice>,
    /// `None` when the key is absent; an explicit `null` is `Some(Value::Null)`.
    #[serde(default, deserialize_with = "present")]
    pub merchant_id: Option<Value>,
}

fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

impl RawOffer {
    /// Returns true if the offer can be bought right now.
    pub fn is_purchasable(&self) -> bool {
        self.availability.as_deref() == Some(AVAILABLE)
            && self.stock_status.as_deref() == Some(IN_STOCK)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrice {
    pub amount: Option<Amount>,
}

/// Price amount, sent either as a decimal string (`"99.00"`) or a number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    pub fn value(&self) -> Result<f64> {
        match self {
            Amount::Number(n) => Ok(*n),
            Amount::Text(s) => {
                s.trim().parse().with_context(|| format!("Invalid price amount: {:?}", s))
            }
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Merchant {
    pub name: Option<String>,
}

/// Merchant ids are keyed by their string form in the `merchants` map.
fn merchant_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl OffersResponse {
    /// Keeps purchasable offers, resolves merchant names, and drops
    /// duplicate (merchant, price) pairs.
    pub fn into_offer_set(self) -> Result<OfferSet> {
        let mut set = OfferSet::new();

        for raw in self.offers.iter().flatten() {
            if !raw.is_purchasable() {
                continue;
            }

            let amount = raw
                .price
                .as_ref()
                .and_then(|p| p.amount.as_ref())
                .context("Purchasable offer has no `price.amount`")?;
            let price = Price::new(amount.value()?);

            let merchant_id =
                raw.merchant_id.as_ref().context("Purchasable offer has no `merchantId`")?;
            let merchants =
                self.merchants.as_ref().context("Offers response has no `merchants` map")?;

            let merchant_name = if merchant_id.is_null() {
                UNKNOWN_MERCHANT.to_string()
            } else {
                merchants
                    .get(&merchant_key(merchant_id))
                    .and_then(|m| m.name.clone())
                    .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string())
            };

            set.insert(Offer::new(merchant_name, price));
        }

        Ok(set)
    }
}
