//! Tokens and requests shared by unit tests.

use super::{ChainRef, QuoteRequest, TokenRef};

pub fn base() -> ChainRef {
    ChainRef::new("Base", 8453)
}

pub fn arbitrum() -> ChainRef {
    ChainRef::new("Arbitrum", 42161)
}

pub fn usdc(chain: ChainRef) -> TokenRef {
    TokenRef {
        symbol: "USDC".to_string(),
        chain,
        contract_address: "0x833589fcd6edb6e08f4c7c32d4f71b54bda02913".to_string(),
        decimals: 6,
        usd_unit_price: 1.0,
    }
}

pub fn weth(chain: ChainRef) -> TokenRef {
    TokenRef {
        symbol: "WETH".to_string(),
        chain,
        contract_address: "0x4200000000000000000000000000000000000006".to_string(),
        decimals: 18,
        usd_unit_price: 2500.0,
    }
}

/// 1000 USDC -> WETH on Base.
pub fn same_chain_request() -> QuoteRequest {
    QuoteRequest {
        origin_token: usdc(base()),
        destination_token: weth(base()),
        raw_source_amount: 1_000_000_000,
    }
}

/// 1000 USDC on Arbitrum -> USDC on Base.
pub fn cross_chain_request() -> QuoteRequest {
    QuoteRequest {
        origin_token: usdc(arbitrum()),
        destination_token: usdc(base()),
        raw_source_amount: 1_000_000_000,
    }
}
