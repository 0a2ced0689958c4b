use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest};
use crate::resolver::lifi::LIFI_API_URL;
use crate::units::{parse_optional_whole, parse_raw_amount, to_whole_units, usd_efficiency};
use crate::utils::remove_trailing_slash;

const NAME: &str = "Jumper";

/// LI.FI advanced routing, as used by the Jumper bridge UI. Cross-chain only.
pub struct Jumper {
    client: Client,
    api_url: String,
    api_key: Option<String>,
    user_address: String,
}

impl Jumper {
    pub fn new(client: Client, api_key: Option<String>, user_address: &str) -> Self {
        Self {
            client,
            api_url: LIFI_API_URL.to_string(),
            api_key,
            user_address: user_address.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn body(&self, request: &QuoteRequest) -> serde_json::Value {
        json!({
            "fromChainId": request.origin_token.chain_id(),
            "toChainId": request.destination_token.chain_id(),
            "fromTokenAddress": request.origin_token.contract_address,
            "toTokenAddress": request.destination_token.contract_address,
            "fromAmount": request.raw_source_amount.to_string(),
            "fromAddress": self.user_address,
            "options": {"order": "CHEAPEST"},
        })
    }
}

#[derive(Debug, Deserialize)]
struct RoutesResponse {
    routes: Vec<LifiRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiRoute {
    from_amount: String,
    to_amount: String,
    #[serde(default)]
    to_amount_min: Option<String>,
    #[serde(default)]
    steps: Vec<LifiStep>,
}

#[derive(Debug, Deserialize)]
struct LifiStep {
    estimate: LifiEstimate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LifiEstimate {
    #[serde(default)]
    execution_duration: f64,
}

fn to_quote(response: RoutesResponse, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
    let route = response
        .routes
        .first()
        .ok_or_else(|| ProviderError::malformed("routes[0]"))?;
    let from_raw = parse_raw_amount(&route.from_amount)?;
    let to_raw = parse_raw_amount(&route.to_amount)?;
    let decimals = request.destination_token.decimals;
    let destination_amount = to_whole_units(to_raw, decimals);
    let seconds: f64 = route.steps.iter().map(|s| s.estimate.execution_duration).sum();

    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount,
        efficiency_ratio: usd_efficiency(request, from_raw, destination_amount)?,
        estimated_time_seconds: seconds.max(0.0).round() as u64,
        min_destination_amount: parse_optional_whole(route.to_amount_min.as_deref(), decimals)?,
    })
}

#[async_trait]
impl QuoteProvider for Jumper {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::CrossChain
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let mut builder = self
            .client
            .post(format!("{}/advanced/routes", self.api_url))
            .header("accept", "application/json")
            .json(&self.body(request));
        if let Some(key) = &self.api_key {
            builder = builder.header("x-lifi-api-key", key);
        }
        let response: RoutesResponse = send_json(builder).await?;
        to_quote(response, request)
    }
}
