pub mod quote;
pub mod token;

#[cfg(test)]
pub(crate) mod fixtures;

pub use quote::{CanonicalQuote, QuoteRecord, QuoteRequest, RankedQuoteList, DEFAULT_SWAP_TIME_SECONDS};
pub use token::{ChainRef, TokenRef};
