use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::{MetadataSource, TokenMetadata};
use crate::error::ResolutionError;
use crate::models::ChainRef;
use crate::utils::{deserialize_f64_lenient, remove_trailing_slash};

pub const LIFI_API_URL: &str = "https://li.quest/v1";

/// Chain and token metadata from the LI.FI public API.
pub struct LifiMetadata {
    api_url: String,
    api_key: Option<String>,
    client: Client,
}

impl LifiMetadata {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            api_url: LIFI_API_URL.to_string(),
            api_key,
            client,
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        let mut request = self
            .client
            .get(format!("{}{}", self.api_url, path))
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-lifi-api-key", key);
        }
        request
    }
}

#[derive(Deserialize)]
struct ChainsResponse {
    chains: Vec<ChainEntry>,
}

#[derive(Deserialize)]
struct ChainEntry {
    id: u64,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    address: String,
    decimals: u8,
    #[serde(rename = "priceUSD", deserialize_with = "deserialize_f64_lenient")]
    price_usd: f64,
}

fn parse_chains(body: &str) -> Result<HashMap<String, u64>, ResolutionError> {
    let parsed: ChainsResponse = serde_json::from_str(body).map_err(|e| ResolutionError::InvalidMetadata {
        token: "<chains>".to_string(),
        reason: e.to_string(),
    })?;
    Ok(parsed.chains.into_iter().map(|c| (c.name, c.id)).collect())
}

fn parse_token(body: &str, symbol: &str) -> Result<TokenMetadata, ResolutionError> {
    let parsed: TokenResponse = serde_json::from_str(body).map_err(|e| ResolutionError::InvalidMetadata {
        token: symbol.to_string(),
        reason: e.to_string(),
    })?;
    Ok(TokenMetadata {
        address: parsed.address,
        decimals: parsed.decimals,
        price_usd: parsed.price_usd,
    })
}

#[async_trait]
impl MetadataSource for LifiMetadata {
    async fn chain_ids(&self) -> Result<HashMap<String, u64>, ResolutionError> {
        let response = self.get("/chains").query(&[("chainTypes", "EVM")]).send().await?;
        if !response.status().is_success() {
            return Err(ResolutionError::Status(response.status().as_u16()));
        }
        parse_chains(&response.text().await?)
    }

    async fn token(&self, chain: &ChainRef, symbol: &str) -> Result<TokenMetadata, ResolutionError> {
        let chain_id = chain.provider_chain_id.to_string();
        let response = self
            .get("/token")
            .query(&[("chain", chain_id.as_str()), ("token", symbol)])
            .send()
            .await?;
        match response.status() {
            s if s.is_success() => parse_token(&response.text().await?, symbol),
            StatusCode::NOT_FOUND | StatusCode::BAD_REQUEST => Err(ResolutionError::UnknownToken {
                chain: chain.symbol.clone(),
                token: symbol.to_string(),
            }),
            s => Err(ResolutionError::Status(s.as_u16())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::serve_locally;
    use crate::resolver::Resolver;
    use axum::extract::Query;
    use axum::http::{HeaderMap, StatusCode as Status};
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::Router;
    use std::sync::Arc;

    async fn chains() -> &'static str {
        r#"{"chains":[{"name":"Ethereum","id":1},{"name":"Base","id":8453}]}"#
    }

    async fn token(headers: HeaderMap, Query(params): Query<HashMap<String, String>>) -> axum::response::Response {
        if headers.get("x-lifi-api-key").and_then(|v| v.to_str().ok()) != Some("secret") {
            return Status::UNAUTHORIZED.into_response();
        }
        match params.get("token").map(String::as_str) {
            Some("WETH") => {
                r#"{"address":"0x4200000000000000000000000000000000000006","decimals":18,"priceUSD":"2500.5"}"#
                    .into_response()
            }
            Some("NOPE") => Status::NOT_FOUND.into_response(),
            Some("BAD") => Status::BAD_REQUEST.into_response(),
            _ => Status::SERVICE_UNAVAILABLE.into_response(),
        }
    }

    async fn metadata() -> LifiMetadata {
        let url = serve_locally(Router::new().route("/chains", get(chains)).route("/token", get(token))).await;
        LifiMetadata::new(Client::new(), Some("secret".to_string())).with_base_url(&url)
    }

    #[tokio::test]
    async fn test_http_resolve_through_lifi() {
        let resolver = Resolver::new(Arc::new(metadata().await));
        let weth = resolver.resolve("mainnet", "ETH").await.unwrap();
        assert_eq!(weth.symbol, "WETH");
        assert_eq!(weth.chain_id(), 1);
        assert_eq!(weth.decimals, 18);
        assert_eq!(weth.usd_unit_price, 2500.5);
    }

    #[tokio::test]
    async fn test_http_unknown_token_statuses() {
        let lifi = metadata().await;
        let base = ChainRef::new("Base", 8453);
        for symbol in ["NOPE", "BAD"] {
            let err = lifi.token(&base, symbol).await.unwrap_err();
            assert!(
                matches!(err, ResolutionError::UnknownToken { ref token, .. } if token == symbol),
                "{symbol}: {err}"
            );
        }
    }

    #[tokio::test]
    async fn test_http_other_status_is_status_error() {
        let lifi = metadata().await;
        let err = lifi.token(&ChainRef::new("Base", 8453), "FLAKY").await.unwrap_err();
        assert!(matches!(err, ResolutionError::Status(503)));
    }

    #[tokio::test]
    async fn test_http_missing_key_is_status_error() {
        let url = serve_locally(Router::new().route("/token", get(token))).await;
        let lifi = LifiMetadata::new(Client::new(), None).with_base_url(&url);
        let err = lifi.token(&ChainRef::new("Base", 8453), "WETH").await.unwrap_err();
        assert!(matches!(err, ResolutionError::Status(401)));
    }

    #[test]
    fn test_parse_chains() {
        let body = r#"{"chains":[
            {"key":"eth","chainType":"EVM","name":"Ethereum","coin":"ETH","id":1},
            {"key":"bas","chainType":"EVM","name":"Base","coin":"ETH","id":8453}
        ]}"#;
        let table = parse_chains(body).unwrap();
        assert_eq!(table.get("Ethereum"), Some(&1));
        assert_eq!(table.get("Base"), Some(&8453));
    }

    #[test]
    fn test_parse_token() {
        let body = r#"{"address":"0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913","chainId":8453,
            "symbol":"USDC","decimals":6,"name":"USD Coin","priceUSD":"0.9998"}"#;
        let meta = parse_token(body, "USDC").unwrap();
        assert_eq!(meta.decimals, 6);
        assert_eq!(meta.price_usd, 0.9998);
        assert_eq!(meta.address, "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913");
    }

    #[test]
    fn test_parse_token_missing_price() {
        let body = r#"{"address":"0x01","decimals":6}"#;
        assert!(matches!(
            parse_token(body, "USDC"),
            Err(ResolutionError::InvalidMetadata { .. })
        ));
    }
}
