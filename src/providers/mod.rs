use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{CanonicalQuote, QuoteRequest};

pub mod jumper;
pub mod odos;
pub mod okx;
pub mod one_inch;
pub mod relay;
pub mod zero_x;

pub use jumper::Jumper;
pub use odos::Odos;
pub use okx::OkxBridge;
pub use one_inch::OneInch;
pub use relay::Relay;
pub use zero_x::ZeroX;

/// Which (origin, destination) chain combinations a provider can quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainScope {
    SameChain,
    CrossChain,
    Any,
}

impl ChainScope {
    pub fn applies(self, request: &QuoteRequest) -> bool {
        match self {
            ChainScope::SameChain => request.is_same_chain(),
            ChainScope::CrossChain => !request.is_same_chain(),
            ChainScope::Any => true,
        }
    }
}

/// A third-party swap or bridge pricing API.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &str;

    fn scope(&self) -> ChainScope;

    /// One request to the provider. Implementations assume `scope()` applies.
    async fn fetch_quote(&self, request: &QuoteRequest) -> Result<CanonicalQuote, ProviderError>;

    /// Best-effort quote: `None` when the provider does not cover this chain
    /// combination or fails in any way. Inapplicable providers make no call.
    async fn quote(&self, request: &QuoteRequest) -> Option<CanonicalQuote> {
        if !self.scope().applies(request) {
            debug!(provider = self.name(), "not applicable to this chain pair");
            return None;
        }
        match self.fetch_quote(request).await {
            Ok(quote) if quote.is_usable() => Some(quote),
            Ok(quote) => {
                warn!(
                    provider = self.name(),
                    amount = quote.destination_amount,
                    efficiency = quote.efficiency_ratio,
                    "discarding quote without a positive finite amount"
                );
                None
            }
            Err(e) => {
                warn!(provider = self.name(), error = %e, "quote unavailable");
                None
            }
        }
    }
}

/// Providers partitioned by the kind of route they serve, each list in
/// ranking tie-break order.
#[derive(Clone, Default)]
pub struct ProviderSet {
    pub same_chain: Vec<Arc<dyn QuoteProvider>>,
    pub cross_chain: Vec<Arc<dyn QuoteProvider>>,
}

impl ProviderSet {
    pub fn new(same_chain: Vec<Arc<dyn QuoteProvider>>, cross_chain: Vec<Arc<dyn QuoteProvider>>) -> Self {
        Self { same_chain, cross_chain }
    }

    /// Every provider the configuration has credentials for.
    pub fn from_config(config: &Config, client: &Client) -> Self {
        let mut same_chain: Vec<Arc<dyn QuoteProvider>> = vec![Arc::new(Odos::new(client.clone(), &config.user_address))];

        match &config.zero_x_api_key {
            Some(key) => same_chain.push(Arc::new(ZeroX::new(client.clone(), key, &config.taker_address))),
            None => info!("ZERO_X_API_KEY not set, 0x disabled"),
        }
        match &config.oneinch_api_key {
            Some(key) => same_chain.push(Arc::new(OneInch::new(client.clone(), key))),
            None => info!("ONEINCH_API_KEY not set, 1inch disabled"),
        }

        let mut cross_chain: Vec<Arc<dyn QuoteProvider>> = vec![Arc::new(Relay::new(client.clone(), &config.user_address))];

        match (&config.okx_api_key, &config.okx_secret_key, &config.okx_passphrase) {
            (Some(key), Some(secret), Some(passphrase)) => {
                cross_chain.push(Arc::new(OkxBridge::new(client.clone(), key, secret, passphrase)))
            }
            _ => info!("OKX credentials incomplete, OKX bridge disabled"),
        }
        cross_chain.push(Arc::new(Jumper::new(
            client.clone(),
            config.lifi_api_key.clone(),
            &config.user_address,
        )));

        Self { same_chain, cross_chain }
    }

    pub fn select(&self, request: &QuoteRequest) -> &[Arc<dyn QuoteProvider>] {
        if request.is_same_chain() {
            &self.same_chain
        } else {
            &self.cross_chain
        }
    }
}
