use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest};
use crate::units::efficiency_from_impact_percent;
use crate::utils::{deserialize_f64_lenient, deserialize_u64_lenient, remove_trailing_slash};

const NAME: &str = "Relay";
const RELAY_API_URL: &str = "https://api.relay.link";

/// Relay bridge. Quotes same-chain and cross-chain routes; returns an already
/// formatted output amount and a total price impact in percent.
pub struct Relay {
    client: Client,
    api_url: String,
    user_address: String,
}

impl Relay {
    pub fn new(client: Client, user_address: &str) -> Self {
        Self {
            client,
            api_url: RELAY_API_URL.to_string(),
            user_address: user_address.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn body(&self, request: &QuoteRequest) -> serde_json::Value {
        json!({
            "user": self.user_address,
            "originChainId": request.origin_token.chain_id(),
            "destinationChainId": request.destination_token.chain_id(),
            "originCurrency": request.origin_token.contract_address,
            "destinationCurrency": request.destination_token.contract_address,
            "amount": request.raw_source_amount.to_string(),
            "tradeType": "EXACT_INPUT",
        })
    }
}

#[derive(Debug, Deserialize)]
struct RelayPriceResponse {
    details: RelayDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayDetails {
    currency_out: RelayCurrencyOut,
    total_impact: RelayImpact,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    time_estimate: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayCurrencyOut {
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    amount_formatted: f64,
}

#[derive(Debug, Deserialize)]
struct RelayImpact {
    #[serde(deserialize_with = "deserialize_f64_lenient")]
    percent: f64,
}

fn to_quote(response: RelayPriceResponse) -> Result<CanonicalQuote, ProviderError> {
    let details = response.details;
    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount: details.currency_out.amount_formatted,
        efficiency_ratio: efficiency_from_impact_percent(details.total_impact.percent)?,
        estimated_time_seconds: details.time_estimate,
        min_destination_amount: None,
    })
}

#[async_trait]
impl QuoteProvider for Relay {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::Any
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let response: RelayPriceResponse = send_json(
            self.client
                .post(format!("{}/price", self.api_url))
                .header("Content-Type", "application/json")
                .json(&self.body(request)),
        )
        .await?;
        to_quote(response)
    }
}
