use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest, DEFAULT_SWAP_TIME_SECONDS};
use crate::units::{parse_raw_amount, to_whole_units, usd_efficiency};
use crate::utils::remove_trailing_slash;

const NAME: &str = "1inch";
const ONE_INCH_API_URL: &str = "https://api.1inch.dev/swap/v6.0";

pub struct OneInch {
    client: Client,
    api_url: String,
    api_key: String,
}

impl OneInch {
    pub fn new(client: Client, api_key: &str) -> Self {
        Self {
            client,
            api_url: ONE_INCH_API_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OneInchQuoteResponse {
    dst_amount: String,
}

fn to_quote(response: OneInchQuoteResponse, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
    let raw_out = parse_raw_amount(&response.dst_amount)?;
    let destination_amount = to_whole_units(raw_out, request.destination_token.decimals);

    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount,
        efficiency_ratio: usd_efficiency(request, request.raw_source_amount, destination_amount)?,
        estimated_time_seconds: DEFAULT_SWAP_TIME_SECONDS,
        min_destination_amount: None,
    })
}

#[async_trait]
impl QuoteProvider for OneInch {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::SameChain
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let url = format!("{}/{}/quote", self.api_url, request.origin_token.chain_id());
        let amount = request.raw_source_amount.to_string();
        let response: OneInchQuoteResponse = send_json(
            self.client
                .get(url)
                .bearer_auth(&self.api_key)
                .header("accept", "application/json")
                .query(&[
                    ("src", request.origin_token.contract_address.as_str()),
                    ("dst", request.destination_token.contract_address.as_str()),
                    ("amount", amount.as_str()),
                    ("fee", "0"),
                ]),
        )
        .await?;
        to_quote(response, request)
    }
}
