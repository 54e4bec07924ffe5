//! Output formatting for lookups and run summaries (table, JSON, markdown).

use crate::commands::{LookupReport, RunSummary};
use crate::config::OutputFormat;

/// Formats command results for the terminal.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a single-EAN lookup.
    pub fn format_lookup(&self, report: &LookupReport) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_lookup(report),
            OutputFormat::Markdown => self.markdown_lookup(report),
        }
    }

    /// Formats the totals of an enrichment run.
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(summary).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => format!(
                "Rows:       {}\nPriced:     {}\nNot found:  {}\nOffers:     {}",
                summary.rows, summary.priced, summary.not_found, summary.offers
            ),
            OutputFormat::Markdown => format!(
                "| Rows | Priced | Not found | Offers |\n|------|--------|-----------|--------|\n| {} | {} | {} | {} |",
                summary.rows, summary.priced, summary.not_found, summary.offers
            ),
        }
    }

    // Table formatting

    fn table_lookup(&self, report: &LookupReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("EAN:      {}", report.ean));
        lines.push(format!("Product:  {}", report.product_id.as_deref().unwrap_or("N/A")));

        if report.offers.is_empty() {
            lines.push(String::new());
            lines.push(report.summary.brand_name.clone());
            return lines.join("\n");
        }

        let price_width = 12;
        let merchant_width = 30;

        lines.push(String::new());
        lines.push(format!("{:>price_width$}  {}", "Price", "Merchant"));
        lines.push(format!("{:->price_width$}  {:-<merchant_width$}", "", ""));

        for offer in &report.offers {
            lines.push(format!(
                "{:>price_width$}  {}",
                offer.price.to_string(),
                offer.merchant_name
            ));
        }

        lines.push(String::new());
        lines.push(format!("BrandName:   {}", report.summary.brand_name));
        lines.push(format!("Sell Price:  {}", report.summary.sell_price));
        lines.push(format!("Total: {} offers", report.offers.len()));

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_lookup(&self, report: &LookupReport) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## EAN {}", report.ean));
        lines.push(String::new());

        match &report.product_id {
            Some(id) => lines.push(format!("- **Product:** {}", id)),
            None => {
                lines.push(format!("*{}*", report.summary.brand_name));
                return lines.join("\n");
            }
        }

        if report.offers.is_empty() {
            lines.push(String::new());
            lines.push(format!("*{}*", report.summary.brand_name));
            return lines.join("\n");
        }

        lines.push(String::new());
        lines.push("| Price | Merchant |".to_string());
        lines.push("|-------|----------|".to_string());

        for offer in &report.offers {
            lines.push(format!("| {} | {} |", offer.price, offer.merchant_name));
        }

        lines.push(String::new());
        lines.push(format!("*{} offers found*", report.offers.len()));

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricerunner::{Offer, OfferSet, OfferSummary, Price};

    fn make_report() -> LookupReport {
        let offers: OfferSet =
            vec![Offer::new("Webhallen", Price::new(249.0)), Offer::new("CDON", Price::new(259.5))]
                .into_iter()
                .collect();

        LookupReport {
            ean: "7350000000001".to_string(),
            product_id: Some("3200123".to_string()),
            offers: offers.offers().to_vec(),
            summary: OfferSummary::from_offers(&offers),
        }
    }

    fn make_missing_report() -> LookupReport {
        LookupReport {
            ean: "0000000000000".to_string(),
            product_id: None,
            offers: Vec::new(),
            summary: OfferSummary::not_found(),
        }
    }

    #[test]
    fn test_json_lookup() {
        let output = Formatter::new(OutputFormat::Json).format_lookup(&make_report());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["ean"], "7350000000001");
        assert_eq!(json["offers"][1]["price"], 259.5);
        assert_eq!(json["summary"]["brandName"], "CDON, Webhallen");
    }

    #[test]
    fn test_json_lookup_missing() {
        let output = Formatter::new(OutputFormat::Json).format_lookup(&make_missing_report());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert!(json["productId"].is_null());
        assert_eq!(json["summary"]["brandName"], "No Product Found");
        assert_eq!(json["summary"]["sellPrice"], "");
    }

    #[test]
    fn test_table_lookup() {
        let output = Formatter::new(OutputFormat::Table).format_lookup(&make_report());

        assert!(output.contains("EAN:      7350000000001"));
        assert!(output.contains("Product:  3200123"));
        assert!(output.contains("Webhallen"));
        assert!(output.contains("249"));
        assert!(!output.contains("249.0"));
        assert!(output.contains("Sell Price:  249, 259.5"));
        assert!(output.contains("Total: 2 offers"));
    }

    #[test]
    fn test_table_lookup_missing() {
        let output = Formatter::new(OutputFormat::Table).format_lookup(&make_missing_report());

        assert!(output.contains("Product:  N/A"));
        assert!(output.contains("No Product Found"));
    }

    #[test]
    fn test_markdown_lookup() {
        let output = Formatter::new(OutputFormat::Markdown).format_lookup(&make_report());

        assert!(output.starts_with("## EAN 7350000000001"));
        assert!(output.contains("| Price | Merchant |"));
        assert!(output.contains("| 259.5 | CDON |"));
        assert!(output.contains("*2 offers found*"));
    }

    #[test]
    fn test_markdown_lookup_missing() {
        let output = Formatter::new(OutputFormat::Markdown).format_lookup(&make_missing_report());
        assert!(output.contains("*No Product Found*"));
    }

    #[test]
    fn test_summary_formats() {
        let summary = RunSummary { rows: 5, priced: 3, not_found: 2, offers: 8 };

        let table = Formatter::new(OutputFormat::Table).format_summary(&summary);
        assert!(table.contains("Rows:       5"));
        assert!(table.contains("Not found:  2"));
        assert!(table.contains("Offers:     8"));

        let json = Formatter::new(OutputFormat::Json).format_summary(&summary);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["priced"], 3);
        assert_eq!(value["offers"], 8);

        let md = Formatter::new(OutputFormat::Markdown).format_summary(&summary);
        assert!(md.contains("| 5 | 3 | 2 | 8 |"));
    }
}
