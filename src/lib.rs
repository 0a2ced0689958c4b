//! # route-quotes
//!
//! Compares swap and bridge prices across several third-party routing APIs.
//! A request names a source/destination chain, a token pair and an amount;
//! every applicable provider is asked concurrently and the answers are
//! normalized into [`CanonicalQuote`]s ranked by expected output.
//!
//! ## Providers
//!
//! | Provider | Scope | Efficiency from |
//! |----------|-------|-----------------|
//! | Odos | same chain | reported `percentDiff` |
//! | 0x | same chain | USD prices of buy/sell amounts |
//! | 1inch | same chain | USD prices of output/input |
//! | Relay | same or cross chain | reported total impact |
//! | OKX | cross chain | USD prices of first route |
//! | Jumper (LI.FI) | cross chain | USD prices of first route |
//!
//! Same-chain requests go to the same-chain set, everything else to the
//! bridge set. A provider that fails, times out or returns something
//! unparsable is simply missing from the result.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use route_quotes::{Aggregator, Config, LifiMetadata, ProviderSet, Resolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let client = route_quotes::http::build_client()?;
//!     let resolver = Resolver::new(Arc::new(LifiMetadata::new(client.clone(), None)));
//!     let aggregator = Aggregator::new(resolver, ProviderSet::from_config(&config, &client));
//!
//!     // 1000 USDC (6 decimals) to WETH on Base
//!     let quotes = aggregator.get_quotes("Base", "Base", "USDC", "ETH", 1_000_000_000).await?;
//!     for quote in quotes.quotes() {
//!         println!("{}: {} ({:.4})", quote.provider_name, quote.destination_amount, quote.efficiency_ratio);
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod providers;
pub mod report;
pub mod resolver;
pub mod server;
pub mod units;
pub mod utils;

pub use aggregator::Aggregator;
pub use config::Config;
pub use error::{NumericError, ProviderError, QuoteError, ResolutionError};
pub use models::{CanonicalQuote, ChainRef, QuoteRecord, QuoteRequest, RankedQuoteList, TokenRef};
pub use providers::{ChainScope, ProviderSet, QuoteProvider};
pub use resolver::{LifiMetadata, MetadataSource, Resolver};
