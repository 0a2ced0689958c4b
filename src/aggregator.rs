use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::DEFAULT_TIMEOUT_MS;
use crate::error::{ProviderError, QuoteError};
use crate::models::{CanonicalQuote, QuoteRequest, RankedQuoteList};
use crate::providers::{ProviderSet, QuoteProvider};
use crate::resolver::Resolver;
use crate::units::to_raw_units;

/// Resolves symbols, fans a request out to every applicable provider and
/// ranks whatever comes back.
#[derive(Clone)]
pub struct Aggregator {
    resolver: Resolver,
    providers: ProviderSet,
    timeout: Duration,
}

impl Aggregator {
    pub fn new(resolver: Resolver, providers: ProviderSet) -> Self {
        Self {
            resolver,
            providers,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Quote `raw_amount` smallest units of the origin token.
    ///
    /// Fails only when the symbols cannot be resolved or the amount is zero.
    /// Provider failures just shrink the list, which may end up empty.
    pub async fn get_quotes(
        &self,
        origin_chain: &str,
        destination_chain: &str,
        origin_token: &str,
        destination_token: &str,
        raw_amount: u128,
    ) -> Result<RankedQuoteList, QuoteError> {
        if raw_amount == 0 {
            return Err(QuoteError::InvalidAmount);
        }
        let (origin_token, destination_token) = self
            .resolver
            .resolve_pair(origin_chain, origin_token, destination_chain, destination_token)
            .await?;

        let request = QuoteRequest {
            origin_token,
            destination_token,
            raw_source_amount: raw_amount,
        };
        Ok(self.quote_request(request).await)
    }

    /// Like [`Aggregator::get_quotes`] with `amount` in whole origin tokens,
    /// scaled by the origin token's decimals once it is resolved.
    pub async fn get_quotes_for_amount(
        &self,
        origin_chain: &str,
        destination_chain: &str,
        origin_token: &str,
        destination_token: &str,
        amount: f64,
    ) -> Result<RankedQuoteList, QuoteError> {
        if !(amount.is_finite() && amount > 0.0) {
            return Err(QuoteError::InvalidAmount);
        }
        let (origin_token, destination_token) = self
            .resolver
            .resolve_pair(origin_chain, origin_token, destination_chain, destination_token)
            .await?;

        let raw_source_amount = to_raw_units(amount, origin_token.decimals).map_err(|_| QuoteError::InvalidAmount)?;
        if raw_source_amount == 0 {
            return Err(QuoteError::InvalidAmount);
        }
        let request = QuoteRequest {
            origin_token,
            destination_token,
            raw_source_amount,
        };
        Ok(self.quote_request(request).await)
    }

    /// Fan out an already resolved request.
    ///
    /// Each provider runs as its own task under `timeout`. Dropping the
    /// returned future aborts all of them.
    pub async fn quote_request(&self, request: QuoteRequest) -> RankedQuoteList {
        let request = Arc::new(request);
        let providers = self.providers.select(&request);

        let mut tasks = JoinSet::new();
        for (index, provider) in providers.iter().enumerate() {
            let provider: Arc<dyn QuoteProvider> = Arc::clone(provider);
            let request = Arc::clone(&request);
            let timeout = self.timeout;
            tasks.spawn(async move {
                match tokio::time::timeout(timeout, provider.quote(&request)).await {
                    Ok(quote) => (index, quote),
                    Err(_) => {
                        let error = ProviderError::Timeout(timeout.as_millis() as u64);
                        warn!(provider = provider.name(), error = %error, "quote unavailable");
                        (index, None)
                    }
                }
            });
        }

        let mut collected: Vec<(usize, CanonicalQuote)> = Vec::with_capacity(providers.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(quote))) => collected.push((index, quote)),
                Ok((_, None)) => {}
                Err(e) => warn!(error = %e, "provider task failed"),
            }
        }
        // registration order first, so the stable ranking breaks ties by it
        collected.sort_by_key(|(index, _)| *index);

        let ranked = RankedQuoteList::from_unordered(collected.into_iter().map(|(_, q)| q).collect());
        info!(
            origin = %request.origin_token.symbol,
            destination = %request.destination_token.symbol,
            origin_chain = request.origin_token.chain_id(),
            destination_chain = request.destination_token.chain_id(),
            providers = providers.len(),
            quotes = ranked.len(),
            "aggregated quotes"
        );
        ranked
    }
}
