/// Maps a bare coin ticker to the `VENUE:COINQUOTE` pair used by the quote
/// endpoint, and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoSymbolFormat {
    venue: String,
    quote: String,
}

impl CryptoSymbolFormat {
    pub fn new(venue: &str, quote: &str) -> Self {
        Self {
            venue: venue.to_string(),
            quote: quote.to_string(),
        }
    }

    /// Symbols that already name a venue (search hits such as
    /// `BINANCE:BTCUSDT`) pass through untouched.
    pub fn rewrite(&self, symbol: &str) -> String {
        if symbol.contains(':') {
            return symbol.to_string();
        }
        format!("{}:{}{}", self.venue, symbol, self.quote)
    }

    /// `None` when `pair` was not produced by [`Self::rewrite`].
    pub fn original(&self, pair: &str) -> Option<String> {
        let coin = pair
            .strip_prefix(&self.venue)?
            .strip_prefix(':')?
            .strip_suffix(&self.quote)?;

        if coin.is_empty() {
            None
        } else {
            Some(coin.to_string())
        }
    }
}

impl Default for CryptoSymbolFormat {
    fn default() -> Self {
        Self::new("BINANCE", "USDT")
    }
}
