use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest, DEFAULT_SWAP_TIME_SECONDS};
use crate::units::{efficiency_from_impact_percent, parse_raw_amount, to_whole_units};
use crate::utils::remove_trailing_slash;

const NAME: &str = "Odos";
const ODOS_API_URL: &str = "https://api.odos.xyz";
const SLIPPAGE_LIMIT_PERCENT: f64 = 0.3;

/// Odos smart order router. Same-chain only; efficiency comes from the
/// router's own `percentDiff`.
pub struct Odos {
    client: Client,
    api_url: String,
    user_address: String,
}

impl Odos {
    pub fn new(client: Client, user_address: &str) -> Self {
        Self {
            client,
            api_url: ODOS_API_URL.to_string(),
            user_address: user_address.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn body(&self, request: &QuoteRequest) -> serde_json::Value {
        json!({
            "chainId": request.origin_token.chain_id(),
            "compact": true,
            "gasPrice": 20,
            "inputTokens": [{
                "amount": request.raw_source_amount.to_string(),
                "tokenAddress": request.origin_token.contract_address,
            }],
            "outputTokens": [{
                "proportion": 1,
                "tokenAddress": request.destination_token.contract_address,
            }],
            "referralCode": 0,
            "slippageLimitPercent": SLIPPAGE_LIMIT_PERCENT,
            "sourceBlacklist": [],
            "sourceWhitelist": [],
            "userAddr": self.user_address,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OdosQuoteResponse {
    out_amounts: Vec<String>,
    percent_diff: f64,
}

fn to_quote(response: OdosQuoteResponse, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
    let raw_out = response
        .out_amounts
        .first()
        .ok_or_else(|| ProviderError::malformed("outAmounts[0]"))?;
    let raw_out = parse_raw_amount(raw_out)?;

    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount: to_whole_units(raw_out, request.destination_token.decimals),
        efficiency_ratio: efficiency_from_impact_percent(response.percent_diff)?,
        estimated_time_seconds: DEFAULT_SWAP_TIME_SECONDS,
        min_destination_amount: None,
    })
}

#[async_trait]
impl QuoteProvider for Odos {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::SameChain
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let response: OdosQuoteResponse = send_json(
            self.client
                .post(format!("{}/sor/quote/v2", self.api_url))
                .header("Content-Type", "application/json")
                .json(&self.body(request)),
        )
        .await?;
        to_quote(response, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::serve_locally;
    use crate::models::fixtures::{cross_chain_request, same_chain_request};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn parse(value: serde_json::Value) -> Result<CanonicalQuote, ProviderError> {
        let response: OdosQuoteResponse =
            serde_json::from_value(value).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        to_quote(response, &same_chain_request())
    }

    #[test]
    fn test_parse_quote() {
        let quote = parse(json!({
            "inTokens": ["0x833589fcd6edb6e08f4c7c32d4f71b54bda02913"],
            "outTokens": ["0x4200000000000000000000000000000000000006"],
            "inAmounts": ["1000000000"],
            "outAmounts": ["399200000000000000"],
            "gasEstimate": 183000,
            "percentDiff": -0.2,
            "priceImpact": -0.01
        }))
        .unwrap();
        assert_eq!(quote.provider_name, "Odos");
        assert!((quote.destination_amount - 0.3992).abs() < 1e-12);
        assert!((quote.efficiency_ratio - 0.998).abs() < 1e-12);
        assert_eq!(quote.estimated_time_seconds, 15);
    }

    #[test]
    fn test_empty_out_amounts_is_malformed() {
        let err = parse(json!({"outAmounts": [], "percentDiff": 0.0})).unwrap_err();
        assert!(matches!(err, ProviderError::Malformed(_)));
    }

    #[test]
    fn test_missing_percent_diff_is_malformed() {
        assert!(parse(json!({"outAmounts": ["1"]})).is_err());
    }

    #[test]
    fn test_request_body() {
        let odos = Odos::new(Client::new(), "0xb29601eB52a052042FB6c68C69a442BD0AE90082");
        let body = odos.body(&same_chain_request());
        assert_eq!(body["chainId"], 8453);
        assert_eq!(body["inputTokens"][0]["amount"], "1000000000");
        assert_eq!(body["outputTokens"][0]["tokenAddress"], "0x4200000000000000000000000000000000000006");
        assert_eq!(body["slippageLimitPercent"], 0.3);
    }

    async fn odos_at(router: Router) -> Odos {
        let url = serve_locally(router).await;
        Odos::new(Client::new(), "0xb29601eB52a052042FB6c68C69a442BD0AE90082").with_base_url(&format!("{}/", url))
    }

    #[tokio::test]
    async fn test_http_success() {
        let odos = odos_at(Router::new().route(
            "/sor/quote/v2",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["chainId"], 8453);
                Json(json!({"outAmounts": ["399200000000000000"], "percentDiff": -0.2}))
            }),
        ))
        .await;
        let quote = odos.quote(&same_chain_request()).await.unwrap();
        assert!((quote.destination_amount - 0.3992).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_http_server_error_is_absent() {
        let odos = odos_at(Router::new().route(
            "/sor/quote/v2",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        ))
        .await;
        assert!(odos.quote(&same_chain_request()).await.is_none());
        let err = odos.fetch_quote(&same_chain_request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Status(500)));
    }

    #[tokio::test]
    async fn test_http_non_json_is_absent() {
        let odos = odos_at(Router::new().route("/sor/quote/v2", post(|| async { "not json" }))).await;
        assert!(odos.quote(&same_chain_request()).await.is_none());
    }

    #[tokio::test]
    async fn test_http_zero_output_is_absent() {
        let odos = odos_at(Router::new().route(
            "/sor/quote/v2",
            post(|| async { Json(json!({"outAmounts": ["0"], "percentDiff": -0.1})) }),
        ))
        .await;
        assert!(odos.quote(&same_chain_request()).await.is_none());
    }

    #[tokio::test]
    async fn test_cross_chain_request_sends_nothing() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let odos = odos_at(Router::new().route(
            "/sor/quote/v2",
            post(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "{}"
                }
            }),
        ))
        .await;
        assert!(odos.quote(&cross_chain_request()).await.is_none());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }
}
