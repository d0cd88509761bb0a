//! Known stocks and the words that name them

use crate::model::{Market, Stock};
use std::collections::HashMap;

/// Tradeable stocks with their aliases
///
/// Matching is whole-word and case-insensitive: `msft`, `Microsoft` and
/// `MSFT` all resolve to the same stock, but `MSFTX` does not.
#[derive(Debug, Clone)]
pub struct SymbolCatalog {
    stocks: Vec<Stock>,
    /// lowercase alias -> index into `stocks`
    aliases: HashMap<String, usize>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        let mut catalog = Self::empty();
        catalog.register(
            Stock::new("MSFT", "Microsoft", Market::Nasdaq),
            &["microsoft"],
        );
        catalog.register(
            Stock::new("GOOG", "Google, Inc.", Market::Nasdaq),
            &["google", "googl", "alphabet"],
        );
        catalog.register(
            Stock::new("NFLX", "Netflix", Market::Nasdaq),
            &["netflix"],
        );
        catalog.register(
            Stock::new("FB", "Facebook, Inc.", Market::Nasdaq),
            &["facebook", "meta"],
        );
        catalog.register(Stock::new("IBM", "IBM", Market::Nyse), &[]);
        catalog
    }
}

impl SymbolCatalog {
    /// A catalog with no stocks
    pub fn empty() -> Self {
        Self {
            stocks: Vec::new(),
            aliases: HashMap::new(),
        }
    }

    /// Add a stock; its ticker is always an alias
    pub fn register(&mut self, stock: Stock, aliases: &[&str]) {
        let index = match self.stocks.iter().position(|s| s.ticker == stock.ticker) {
            Some(index) => {
                self.stocks[index] = stock;
                index
            }
            None => {
                self.stocks.push(stock);
                self.stocks.len() - 1
            }
        };

        self.aliases
            .insert(self.stocks[index].ticker.to_lowercase(), index);
        for alias in aliases {
            self.aliases.insert(alias.to_lowercase(), index);
        }
    }

    pub fn stocks(&self) -> &[Stock] {
        &self.stocks
    }

    /// Look a stock up by ticker or alias
    pub fn get(&self, name: &str) -> Option<&Stock> {
        self.aliases
            .get(&name.trim().to_lowercase())
            .map(|&index| &self.stocks[index])
    }

    /// First stock named in free text, by position
    pub fn find_in(&self, text: &str) -> Option<&Stock> {
        words(text).find_map(|word| self.get(word))
    }

    /// Words that look like tickers (2-5 uppercase letters) but are unknown
    pub fn unknown_symbols(&self, text: &str) -> Vec<String> {
        let mut symbols: Vec<String> = words(text)
            .filter(|w| {
                (2..=5).contains(&w.len()) && w.chars().all(|c| c.is_ascii_uppercase())
            })
            .filter(|w| self.get(w).is_none())
            .map(str::to_string)
            .collect();
        symbols.sort();
        symbols.dedup();
        symbols
    }
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
}
