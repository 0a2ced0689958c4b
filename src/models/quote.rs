use serde::{Deserialize, Serialize};

use crate::models::TokenRef;
use crate::units::{format_efficiency, to_usd, to_whole_units};

/// Estimated settlement time for providers that do not report one.
pub const DEFAULT_SWAP_TIME_SECONDS: u64 = 15;

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteRequest {
    pub origin_token: TokenRef,
    pub destination_token: TokenRef,
    /// Smallest-unit amount of `origin_token`, always > 0.
    pub raw_source_amount: u128,
}

impl QuoteRequest {
    pub fn is_same_chain(&self) -> bool {
        self.origin_token.chain_id() == self.destination_token.chain_id()
    }

    pub fn source_amount(&self) -> f64 {
        to_whole_units(self.raw_source_amount, self.origin_token.decimals)
    }

    pub fn source_amount_usd(&self) -> f64 {
        to_usd(self.source_amount(), self.origin_token.usd_unit_price)
    }
}

/// One provider's answer, normalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalQuote {
    pub provider_name: String,
    /// Whole units of the destination token.
    pub destination_amount: f64,
    /// USD value retained, usually slightly below 1. Values above 1 are legal.
    pub efficiency_ratio: f64,
    pub estimated_time_seconds: u64,
    /// Worst-case destination amount after slippage, when the provider reports one.
    #[serde(default)]
    pub min_destination_amount: Option<f64>,
}

impl CanonicalQuote {
    /// A quote can be ranked only with a positive, finite amount and ratio.
    pub fn is_usable(&self) -> bool {
        self.destination_amount.is_finite()
            && self.destination_amount > 0.0
            && self.efficiency_ratio.is_finite()
            && self.efficiency_ratio > 0.0
    }
}

/// Quotes ordered by `destination_amount`, best first. Equal amounts keep the
/// order the providers were registered in.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedQuoteList {
    quotes: Vec<CanonicalQuote>,
}

impl RankedQuoteList {
    /// `quotes` must be in provider registration order.
    pub fn from_unordered(mut quotes: Vec<CanonicalQuote>) -> Self {
        // sort_by is stable
        quotes.sort_by(|a, b| b.destination_amount.total_cmp(&a.destination_amount));
        Self { quotes }
    }

    pub fn quotes(&self) -> &[CanonicalQuote] {
        &self.quotes
    }

    pub fn best(&self) -> Option<&CanonicalQuote> {
        self.quotes.first()
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn into_records(self) -> Vec<QuoteRecord> {
        self.quotes.iter().map(QuoteRecord::from).collect()
    }
}

impl IntoIterator for RankedQuoteList {
    type Item = CanonicalQuote;
    type IntoIter = std::vec::IntoIter<CanonicalQuote>;

    fn into_iter(self) -> Self::IntoIter {
        self.quotes.into_iter()
    }
}

/// Wire shape returned by the endpoint and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    pub project: String,
    pub expected_amount: f64,
    pub efficiency: String,
    pub time: u64,
    #[serde(rename = "minAmount", default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<f64>,
}

impl From<&CanonicalQuote> for QuoteRecord {
    fn from(quote: &CanonicalQuote) -> Self {
        Self {
            project: quote.provider_name.clone(),
            expected_amount: quote.destination_amount,
            efficiency: format_efficiency(quote.efficiency_ratio),
            time: quote.estimated_time_seconds,
            min_amount: quote.min_destination_amount,
        }
    }
}
