use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use reqwest::{Client, Url};
use serde::Deserialize;
use sha2::Sha256;

use super::{ChainScope, QuoteProvider};
use crate::error::ProviderError;
use crate::http::send_json;
use crate::models::{CanonicalQuote, QuoteRequest};
use crate::units::{parse_optional_whole, parse_raw_amount, to_whole_units, usd_efficiency};
use crate::utils::{deserialize_u64_lenient, remove_trailing_slash};

type HmacSha256 = Hmac<Sha256>;

const NAME: &str = "OKX";
const OKX_API_URL: &str = "https://www.okx.com";
const QUOTE_PATH: &str = "/api/v5/dex/cross-chain/quote";
/// Fractional slippage tolerance, 1%.
const SLIPPAGE: &str = "0.01";

/// OKX cross-chain aggregator. Every request carries an HMAC-SHA256 signature
/// over `timestamp + method + path?query + body`.
pub struct OkxBridge {
    client: Client,
    api_url: String,
    api_key: String,
    secret_key: String,
    passphrase: String,
}

impl OkxBridge {
    pub fn new(client: Client, api_key: &str, secret_key: &str, passphrase: &str) -> Self {
        Self {
            client,
            api_url: OKX_API_URL.to_string(),
            api_key: api_key.to_string(),
            secret_key: secret_key.to_string(),
            passphrase: passphrase.to_string(),
        }
    }

    pub fn with_base_url(mut self, api_url: &str) -> Self {
        self.api_url = remove_trailing_slash(api_url);
        self
    }

    fn quote_url(&self, request: &QuoteRequest) -> Result<Url, ProviderError> {
        let mut url = Url::parse(&format!("{}{}", self.api_url, QUOTE_PATH))
            .map_err(|e| ProviderError::Malformed(format!("bad base url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("fromChainId", &request.origin_token.chain_id().to_string())
            .append_pair("toChainId", &request.destination_token.chain_id().to_string())
            .append_pair("fromTokenAddress", &request.origin_token.contract_address)
            .append_pair("toTokenAddress", &request.destination_token.contract_address)
            .append_pair("amount", &request.raw_source_amount.to_string())
            .append_pair("slippage", SLIPPAGE);
        Ok(url)
    }
}

/// Base64 HMAC-SHA256 of the prehash string OKX expects.
pub fn sign(secret: &str, timestamp: &str, method: &str, request_path: &str, body: &str) -> Result<String, ProviderError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|e| ProviderError::Signing(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct OkxResponse {
    code: String,
    #[serde(default)]
    msg: String,
    #[serde(default)]
    data: Vec<OkxQuoteData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OkxQuoteData {
    router_list: Vec<OkxRoute>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OkxRoute {
    to_token_amount: String,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    estimate_time: u64,
    #[serde(default)]
    minimum_received: Option<String>,
}

fn to_quote(response: OkxResponse, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
    if response.code != "0" {
        return Err(ProviderError::Malformed(format!(
            "error code {}: {}",
            response.code, response.msg
        )));
    }
    let route = response
        .data
        .first()
        .and_then(|d| d.router_list.first())
        .ok_or_else(|| ProviderError::malformed("data[0].routerList[0]"))?;
    let raw_out = parse_raw_amount(&route.to_token_amount)?;
    let decimals = request.destination_token.decimals;
    let destination_amount = to_whole_units(raw_out, decimals);

    Ok(CanonicalQuote {
        provider_name: NAME.to_string(),
        destination_amount,
        efficiency_ratio: usd_efficiency(request, request.raw_source_amount, destination_amount)?,
        estimated_time_seconds: route.estimate_time,
        min_destination_amount: parse_optional_whole(route.minimum_received.as_deref(), decimals)?,
    })
}

#[async_trait]
impl QuoteProvider for OkxBridge {
    fn name(&self) -> &str {
        NAME
    }

    fn scope(&self) -> ChainScope {
        ChainScope::CrossChain
    }

    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError> {
        let url = self.quote_url(request)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        let signature = sign(&self.secret_key, &timestamp, "GET", &path_and_query(&url), "")?;

        let response: OkxResponse = send_json(
            self.client
                .get(url)
                .header("OK-ACCESS-KEY", &self.api_key)
                .header("OK-ACCESS-SIGN", signature)
                .header("OK-ACCESS-TIMESTAMP", timestamp)
                .header("OK-ACCESS-PASSPHRASE", &self.passphrase),
        )
        .await?;
        to_quote(response, request)
    }
}
