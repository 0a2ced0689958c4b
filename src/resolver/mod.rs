use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::ResolutionError;
use crate::models::{ChainRef, TokenRef};

pub mod lifi;

pub use lifi::LifiMetadata;

/// Native assets rewritten to their wrapped ERC-20 before lookup. Provider
/// APIs quote contract addresses, which native assets do not have.
const NATIVE_WRAPPERS: &[(&str, &str)] = &[
    ("ETH", "WETH"),
    ("POL", "WPOL"),
    ("MATIC", "WMATIC"),
    ("BNB", "WBNB"),
    ("AVAX", "WAVAX"),
];

/// Names accepted in addition to the metadata source's own chain names.
const CHAIN_ALIASES: &[(&str, &str)] = &[("Mainnet", "Ethereum")];

/// Token metadata as reported by the backing source.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetadata {
    pub address: String,
    pub decimals: u8,
    pub price_usd: f64,
}

/// Backing store for chain ids, token addresses, decimals and prices.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Full chain-name to chain-id table.
    async fn chain_ids(&self) -> Result<HashMap<String, u64>, ResolutionError>;

    async fn token(&self, chain: &ChainRef, symbol: &str) -> Result<TokenMetadata, ResolutionError>;
}

pub fn wrapped_symbol(token_symbol: &str) -> &str {
    NATIVE_WRAPPERS
        .iter()
        .find(|(native, _)| native.eq_ignore_ascii_case(token_symbol))
        .map(|(_, wrapped)| *wrapped)
        .unwrap_or(token_symbol)
}

/// Maps human-readable chain and token symbols to [`TokenRef`]s.
#[derive(Clone)]
pub struct Resolver {
    source: Arc<dyn MetadataSource>,
}

impl Resolver {
    pub fn new(source: Arc<dyn MetadataSource>) -> Self {
        Self { source }
    }

    pub async fn resolve_chain(&self, chain_symbol: &str) -> Result<ChainRef, ResolutionError> {
        let table = self.source.chain_ids().await?;
        chain_from_table(&table, chain_symbol)
    }

    pub async fn resolve(&self, chain_symbol: &str, token_symbol: &str) -> Result<TokenRef, ResolutionError> {
        let chain = self.resolve_chain(chain_symbol).await?;
        self.resolve_on(chain, token_symbol).await
    }

    /// Resolves origin and destination with a single chain-table fetch and
    /// both token lookups in flight at once.
    pub async fn resolve_pair(
        &self,
        origin_chain: &str,
        origin_token: &str,
        destination_chain: &str,
        destination_token: &str,
    ) -> Result<(TokenRef, TokenRef), ResolutionError> {
        let table = self.source.chain_ids().await?;
        let origin = chain_from_table(&table, origin_chain)?;
        let destination = chain_from_table(&table, destination_chain)?;
        tokio::try_join!(
            self.resolve_on(origin, origin_token),
            self.resolve_on(destination, destination_token)
        )
    }

    async fn resolve_on(&self, chain: ChainRef, token_symbol: &str) -> Result<TokenRef, ResolutionError> {
        let symbol = wrapped_symbol(token_symbol);
        if symbol != token_symbol {
            debug!(from = token_symbol, to = symbol, "rewrote native asset");
        }
        let meta = self.source.token(&chain, symbol).await?;
        if !(meta.price_usd.is_finite() && meta.price_usd > 0.0) {
            return Err(ResolutionError::InvalidMetadata {
                token: symbol.to_string(),
                reason: format!("non-positive USD price {}", meta.price_usd),
            });
        }
        if meta.address.is_empty() {
            return Err(ResolutionError::InvalidMetadata {
                token: symbol.to_string(),
                reason: "empty contract address".to_string(),
            });
        }
        Ok(TokenRef {
            symbol: symbol.to_string(),
            chain,
            contract_address: meta.address,
            decimals: meta.decimals,
            usd_unit_price: meta.price_usd,
        })
    }
}

fn chain_from_table(table: &HashMap<String, u64>, chain_symbol: &str) -> Result<ChainRef, ResolutionError> {
    let name = CHAIN_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(chain_symbol))
        .map(|(_, name)| *name)
        .unwrap_or(chain_symbol);

    table
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, id)| ChainRef::new(chain_symbol, *id))
        .ok_or_else(|| ResolutionError::UnknownChain(chain_symbol.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory metadata source recording every token lookup.
    pub(crate) struct StaticMetadata {
        pub chains: HashMap<String, u64>,
        pub tokens: HashMap<(u64, String), TokenMetadata>,
        pub lookups: Mutex<Vec<String>>,
    }

    impl StaticMetadata {
        pub fn evm() -> Self {
            let chains = [("Ethereum", 1), ("Base", 8453), ("Arbitrum", 42161), ("Optimism", 10)]
                .into_iter()
                .map(|(n, id)| (n.to_string(), id))
                .collect();
            let mut tokens = HashMap::new();
            for (chain, usdc, weth) in [
                (1, "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"),
                (8453, "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913", "0x4200000000000000000000000000000000000006"),
                (42161, "0xaf88d065e77c8cc2239327c5edb3a432268e5831", "0x82af49447d8a07e3bd95bd0d56f35241523fbab1"),
            ] {
                tokens.insert(
                    (chain, "USDC".to_string()),
                    TokenMetadata { address: usdc.to_string(), decimals: 6, price_usd: 1.0 },
                );
                tokens.insert(
                    (chain, "WETH".to_string()),
                    TokenMetadata { address: weth.to_string(), decimals: 18, price_usd: 2500.0 },
                );
            }
            Self { chains, tokens, lookups: Mutex::new(Vec::new()) }
        }

        pub fn lookups(&self) -> Vec<String> {
            self.lookups.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MetadataSource for StaticMetadata {
        async fn chain_ids(&self) -> Result<HashMap<String, u64>, ResolutionError> {
            Ok(self.chains.clone())
        }

        async fn token(&self, chain: &ChainRef, symbol: &str) -> Result<TokenMetadata, ResolutionError> {
            self.lookups.lock().unwrap().push(symbol.to_string());
            self.tokens
                .get(&(chain.provider_chain_id, symbol.to_string()))
                .cloned()
                .ok_or_else(|| ResolutionError::UnknownToken {
                    chain: chain.symbol.clone(),
                    token: symbol.to_string(),
                })
        }
    }

    fn resolver() -> (Arc<StaticMetadata>, Resolver) {
        let source = Arc::new(StaticMetadata::evm());
        (source.clone(), Resolver::new(source))
    }

    #[test]
    fn test_wrapped_symbol() {
        assert_eq!(wrapped_symbol("ETH"), "WETH");
        assert_eq!(wrapped_symbol("eth"), "WETH");
        assert_eq!(wrapped_symbol("USDC"), "USDC");
        assert_eq!(wrapped_symbol("WETH"), "WETH");
    }

    #[tokio::test]
    async fn test_resolve_known_token() {
        let (_, resolver) = resolver();
        let token = resolver.resolve("Base", "USDC").await.unwrap();
        assert_eq!(token.chain, ChainRef::new("Base", 8453));
        assert_eq!(token.decimals, 6);
        assert_eq!(token.contract_address, "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913");
    }

    #[tokio::test]
    async fn test_native_asset_is_looked_up_wrapped() {
        let (source, resolver) = resolver();
        let token = resolver.resolve("Arbitrum", "ETH").await.unwrap();
        assert_eq!(token.symbol, "WETH");
        assert_eq!(source.lookups(), vec!["WETH".to_string()]);
    }

    #[tokio::test]
    async fn test_mainnet_alias() {
        let (_, resolver) = resolver();
        let token = resolver.resolve("Mainnet", "USDC").await.unwrap();
        assert_eq!(token.chain_id(), 1);
        assert_eq!(token.chain.symbol, "Mainnet");
    }

    #[tokio::test]
    async fn test_unknown_chain_is_an_error() {
        let (source, resolver) = resolver();
        let err = resolver.resolve("Atlantis", "USDC").await.unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownChain(ref c) if c == "Atlantis"));
        assert!(source.lookups().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_token_is_an_error() {
        let (_, resolver) = resolver();
        let err = resolver.resolve("Base", "DOGE").await.unwrap_err();
        assert!(matches!(err, ResolutionError::UnknownToken { .. }));
    }

    #[tokio::test]
    async fn test_non_positive_price_is_rejected() {
        let mut source = StaticMetadata::evm();
        source.tokens.insert(
            (8453, "ZERO".to_string()),
            TokenMetadata { address: "0x01".to_string(), decimals: 18, price_usd: 0.0 },
        );
        let resolver = Resolver::new(Arc::new(source));
        let err = resolver.resolve("Base", "ZERO").await.unwrap_err();
        assert!(matches!(err, ResolutionError::InvalidMetadata { .. }));
    }

    #[tokio::test]
    async fn test_resolve_pair() {
        let (source, resolver) = resolver();
        let (origin, destination) = resolver
            .resolve_pair("Arbitrum", "USDC", "Mainnet", "ETH")
            .await
            .unwrap();
        assert_eq!(origin.chain_id(), 42161);
        assert_eq!(destination.chain_id(), 1);
        assert_eq!(destination.symbol, "WETH");
        let mut lookups = source.lookups();
        lookups.sort();
        assert_eq!(lookups, vec!["USDC".to_string(), "WETH".to_string()]);
    }
}
