pub mod crypto_symbol;
pub mod finnhub_client;
pub mod quote_response;
pub mod search_response;

pub use crypto_symbol::CryptoSymbolFormat;
pub use finnhub_client::FinnhubClient;
pub use quote_response::QuoteResponse;
pub use search_response::{SearchHit, SearchResponse};
