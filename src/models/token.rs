use serde::{Deserialize, Serialize};

/// A blockchain network as provider APIs know it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChainRef {
    pub symbol: String,
    pub provider_chain_id: u64,
}

impl ChainRef {
    pub fn new(symbol: &str, provider_chain_id: u64) -> Self {
        Self {
            symbol: symbol.to_string(),
            provider_chain_id,
        }
    }
}

/// A token on a specific chain, priced at resolution time.
///
/// Built fresh for every quote request; holding on to one across requests
/// means quoting against a stale `usd_unit_price`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRef {
    pub symbol: String,
    pub chain: ChainRef,
    pub contract_address: String,
    pub decimals: u8,
    /// Price of one whole token in USD, always positive.
    pub usd_unit_price: f64,
}

impl TokenRef {
    pub fn chain_id(&self) -> u64 {
        self.chain.provider_chain_id
    }
}
