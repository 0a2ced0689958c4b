use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest, DEFAULT_SWAP_TIME_SECONDS};
use crate::units::{parse_optional_whole, parse_raw_amount, to_whole_units, usd_efficiency};
use crate::utils::remove_trailing_slash;

const NAME: &str = "0x";
const ZERO_X_API_URL: &str = "https://api.0x.org";
const API_VERSION: &str = "v2";

/// 0x Swap API (permit2 flavour). Same-chain only; efficiency is priced from
/// the buy and sell amounts with resolver USD prices.
pub struct ZeroX {
    client: Client,
    api_url: String,
    api_key: String,
    taker_address: String,
}

impl ZeroX {
    pub fn new(client: Client, api_key: &str, taker_address: &str) -> Self {
        Self {
            client,
            api_url: ZERO_X_API_URL.to_string(),
            api_key: api_key.to_string(),
            taker_address: taker_address.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn params(&self, request: &QuoteRequest) -> Vec<(&'static str, String)> {
        vec![
            ("chainId", request.origin_token.chain_id().to_string()),
            ("sellToken", request.origin_token.contract_address.clone()),
            ("buyToken", request.destination_token.contract_address.clone()),
            ("sellAmount", request.raw_source_amount.to_string()),
            ("taker", self.taker_address.clone()),
        ]
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ZeroXQuoteResponse {
    buy_amount: String,
    #[serde(default)]
    sell_amount: Option<String>,
    #[serde(default)]
    min_buy_amount: Option<String>,
}

fn to_quote(response: ZeroXQuoteResponse, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
    let buy_raw = parse_raw_amount(&response.buy_amount)?;
    let sell_raw = match &response.sell_amount {
        Some(sell) => parse_raw_amount(sell)?,
        None => request.raw_source_amount,
    };
    let decimals = request.destination_token.decimals;
    let destination_amount = to_whole_units(buy_raw, decimals);
    let min_destination_amount = parse_optional_whole(response.min_buy_amount.as_deref(), decimals)?;

    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount,
        efficiency_ratio: usd_efficiency(request, sell_raw, destination_amount)?,
        estimated_time_seconds: DEFAULT_SWAP_TIME_SECONDS,
        min_destination_amount,
    })
}

#[async_trait]
impl QuoteProvider for ZeroX {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::SameChain
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let response: ZeroXQuoteResponse = send_json(
            self.client
                .get(format!("{}/swap/permit2/quote", self.api_url))
                .header("0x-api-key", &self.api_key)
                .header("0x-version", API_VERSION)
                .query(&self.params(request)),
        )
        .await?;
        to_quote(response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::serve_locally;
    use crate::models::fixtures::same_chain_request;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn parse(value: serde_json::Value) -> Result<CanonicalQuote, ProviderError> {
        let response: ZeroXQuoteResponse =
            serde_json::from_value(value).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        to_quote(response, &same_chain_request())
    }

    #[test]
    fn test_parse_quote() {
        // 0.396 WETH at $2500 = $990 for $1000 of USDC
        let quote = parse(json!({
            "blockNumber": "21000000",
            "buyAmount": "396000000000000000",
            "sellAmount": "1000000000",
            "minBuyAmount": "394000000000000000",
            "liquidityAvailable": true
        }))
        .unwrap();
        assert_eq!(quote.provider_name, "0x");
        assert!((quote.destination_amount - 0.396).abs() < 1e-12);
        assert!((quote.efficiency_ratio - 0.99).abs() < 1e-9);
        assert!((quote.min_destination_amount.unwrap() - 0.394).abs() < 1e-12);
    }

    #[test]
    fn test_sell_amount_defaults_to_request() {
        let quote = parse(json!({"buyAmount": "400000000000000000"})).unwrap();
        assert!((quote.efficiency_ratio - 1.0).abs() < 1e-9);
        assert_eq!(quote.min_destination_amount, None);
    }

    #[test]
    fn test_zero_sell_amount_is_rejected() {
        let err = parse(json!({"buyAmount": "1", "sellAmount": "0"})).unwrap_err();
        assert!(matches!(err, ProviderError::Numeric(_)));
    }

    #[test]
    fn test_missing_buy_amount_is_malformed() {
        assert!(parse(json!({"liquidityAvailable": false})).is_err());
    }

    #[test]
    fn test_query_params() {
        let zero_x = ZeroX::new(Client::new(), "key", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
        let params = zero_x.params(&same_chain_request());
        assert!(params.contains(&("chainId", "8453".to_string())));
        assert!(params.contains(&("sellAmount", "1000000000".to_string())));
    }

    async fn zero_x_quote(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<serde_json::Value>) {
        let authorized = headers.get("0x-api-key").is_some_and(|v| v == "key")
            && headers.get("0x-version").is_some_and(|v| v == API_VERSION);
        if !authorized || params.get("chainId").map(String::as_str) != Some("8453") {
            return (StatusCode::FORBIDDEN, Json(json!({"name": "UNAUTHORIZED"})));
        }
        (
            StatusCode::OK,
            Json(json!({
                "buyAmount": "396000000000000000",
                "sellAmount": params["sellAmount"],
                "minBuyAmount": "394000000000000000"
            })),
        )
    }

    #[tokio::test]
    async fn test_http_quote_with_headers() {
        let url = serve_locally(Router::new().route("/swap/permit2/quote", get(zero_x_quote))).await;
        let zero_x = ZeroX::new(Client::new(), "key", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045").with_base_url(&url);
        let quote = zero_x.quote(&same_chain_request()).await.unwrap();
        assert!((quote.efficiency_ratio - 0.99).abs() < 1e-9);
        assert!((quote.min_destination_amount.unwrap() - 0.394).abs() < 1e-12);

        let wrong_key = ZeroX::new(Client::new(), "other", "0x").with_base_url(&url);
        assert!(wrong_key.quote(&same_chain_request()).await.is_none());
    }
}
