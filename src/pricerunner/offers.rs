//! Offer values, deduplication, and the per-row summary written to the output.

use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Merchant name used when an offer's merchant id is missing from the response.
pub const UNKNOWN_MERCHANT: &str = "Unknown Merchant";

/// `BrandName` value for rows without a product or without offers.
pub const NO_PRODUCT_FOUND: &str = "No Product Found";

/// Separator between merchant names and between prices in the output columns.
const LIST_SEPARATOR: &str = ", ";

/// An offer price.
///
/// Whole numbers render without a fractional part (`10.0` becomes `10`), so
/// the output matches what the marketplace shows for round prices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Price(f64);

impl Price {
    pub fn new(amount: f64) -> Self {
        Self(amount)
    }

    /// Returns true if the price has no fractional part.
    pub fn is_whole(&self) -> bool {
        self.0.is_finite() && self.0.fract() == 0.0
    }

    /// Bit pattern used as the dedup key. `-0.0` folds into `0.0`.
    fn key(&self) -> u64 {
        if self.0 == 0.0 {
            0.0_f64.to_bits()
        } else {
            self.0.to_bits()
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_whole() {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_whole() && self.0.abs() < i64::MAX as f64 {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

/// A purchasable offer from a single merchant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub price: Price,
    pub merchant_name: String,
}

impl Offer {
    pub fn new(merchant_name: impl Into<String>, price: Price) -> Self {
        Self { price, merchant_name: merchant_name.into() }
    }
}

/// Offers deduplicated by (merchant name, price), in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct OfferSet {
    offers: Vec<Offer>,
    seen: HashSet<(String, u64)>,
}

impl OfferSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an offer unless the same merchant already has the same price.
    /// Returns true if the offer was added.
    pub fn insert(&mut self, offer: Offer) -> bool {
        let key = (offer.merchant_name.clone(), offer.price.key());
        if !self.seen.insert(key) {
            return false;
        }
        self.offers.push(offer);
        true
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Offers in first-seen order.
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn iter(&self) -> impl Iterator<Item = &Offer> {
        self.offers.iter()
    }

    /// Distinct merchant names in alphabetical order.
    pub fn merchant_names(&self) -> Vec<&str> {
        self.offers
            .iter()
            .map(|o| o.merchant_name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Prices in first-seen order, one per offer.
    pub fn prices(&self) -> Vec<Price> {
        self.offers.iter().map(|o| o.price).collect()
    }
}

impl FromIterator<Offer> for OfferSet {
    fn from_iter<I: IntoIterator<Item = Offer>>(iter: I) -> Self {
        let mut set = Self::new();
        for offer in iter {
            set.insert(offer);
        }
        set
    }
}

/// The two columns appended to every output row.
///
/// Brand names are sorted while prices keep offer order, so the two lists
/// do not line up position by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub brand_name: String,
    pub sell_price: String,
}

impl OfferSummary {
    /// Summary for a row with no product or no purchasable offers.
    pub fn not_found() -> Self {
        Self { brand_name: NO_PRODUCT_FOUND.to_string(), sell_price: String::new() }
    }

    pub fn from_offers(offers: &OfferSet) -> Self {
        if offers.is_empty() {
            return Self::not_found();
        }

        let brand_name = offers.merchant_names().join(LIST_SEPARATOR);
        let sell_price = offers
            .prices()
            .iter()
            .map(Price::to_string)
            .collect::<Vec<_>>()
            .join(LIST_SEPARATOR);

        Self { brand_name, sell_price }
    }

    /// Returns true if the row was matched to at least one offer.
    pub fn is_found(&self) -> bool {
        !(self.brand_name == NO_PRODUCT_FOUND && self.sell_price.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer(merchant: &str, price: f64) -> Offer {
        Offer::new(merchant, Price::new(price))
    }

    #[test]
    fn test_whole_price_renders_as_integer() {
        assert_eq!(Price::new(10.0).to_string(), "10");
        assert_eq!(Price::new(99.0).to_string(), "99");
        assert_eq!(Price::new(0.0).to_string(), "0");
        assert_eq!(Price::new(12999.0).to_string(), "12999");
    }

    #[test]
    fn test_fractional_price_keeps_decimals() {
        assert_eq!(Price::new(10.5).to_string(), "10.5");
        assert_eq!(Price::new(99.95).to_string(), "99.95");
        assert_eq!(Price::new(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_price_serializes_whole_as_integer() {
        assert_eq!(serde_json::to_string(&Price::new(10.0)).unwrap(), "10");
        assert_eq!(serde_json::to_string(&Price::new(10.5)).unwrap(), "10.5");
    }

    #[test]
    fn test_dedup_by_merchant_and_price() {
        let mut set = OfferSet::new();
        assert!(set.insert(offer("A", 10.0)));
        assert!(set.insert(offer("B", 10.0)));
        assert!(!set.insert(offer("A", 10.0)));

        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_same_merchant_different_price_kept() {
        let set: OfferSet = vec![offer("A", 10.0), offer("A", 10.5)].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_negative_zero_is_same_price() {
        let set: OfferSet = vec![offer("A", 0.0), offer("A", -0.0)].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_first_seen_order_preserved() {
        let set: OfferSet =
            vec![offer("Zeta", 5.0), offer("Alpha", 7.0), offer("Zeta", 5.0), offer("Mid", 6.0)]
                .into_iter()
                .collect();

        let names: Vec<&str> = set.iter().map(|o| o.merchant_name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mid"]);
    }

    #[test]
    fn test_merchant_names_sorted_and_unique() {
        let set: OfferSet =
            vec![offer("Webhallen", 100.0), offer("Elgiganten", 99.0), offer("Webhallen", 101.0)]
                .into_iter()
                .collect();

        assert_eq!(set.merchant_names(), vec!["Elgiganten", "Webhallen"]);
    }

    #[test]
    fn test_summary_orders_are_independent() {
        let set: OfferSet =
            vec![offer("Zeta", 5.0), offer("Alpha", 7.5), offer("Zeta", 8.0)].into_iter().collect();

        let summary = OfferSummary::from_offers(&set);
        assert_eq!(summary.brand_name, "Alpha, Zeta");
        assert_eq!(summary.sell_price, "5, 7.5, 8");
        assert!(summary.is_found());
    }

    #[test]
    fn test_summary_single_offer() {
        let set: OfferSet = vec![offer("ShopX", 99.0)].into_iter().collect();

        let summary = OfferSummary::from_offers(&set);
        assert_eq!(summary.brand_name, "ShopX");
        assert_eq!(summary.sell_price, "99");
    }

    #[test]
    fn test_summary_empty_set_is_not_found() {
        let summary = OfferSummary::from_offers(&OfferSet::new());
        assert_eq!(summary, OfferSummary::not_found());
        assert_eq!(summary.brand_name, "No Product Found");
        assert_eq!(summary.sell_price, "");
        assert!(!summary.is_found());
    }

    #[test]
    fn test_offer_serializes_camel_case() {
        let json = serde_json::to_string(&offer("ShopX", 99.0)).unwrap();
        assert_eq!(json, r#"{"price":99,"merchantName":"ShopX"}"#);
    }
}
