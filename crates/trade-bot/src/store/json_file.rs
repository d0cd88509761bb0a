use super::{PortfolioRecord, PortfolioStore};
use crate::error::{Result, TradeError};
use crate::model::Portfolio;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One pretty-printed `<key>.json` file per conversation
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Store records under `dir`; the directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the record for `key`
    ///
    /// Bytes outside `[a-z0-9-]` are written as `_XX` hex escapes, so distinct
    /// keys always get distinct files, even on case-insensitive filesystems,
    /// and no key can escape the data directory.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_lowercase() || byte.is_ascii_digit() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02X}"));
            }
        }
        if name.is_empty() {
            name.push('_');
        }
        self.dir.join(format!("{name}.json"))
    }

    /// Write the demo holdings for `key`, replacing any existing record
    pub async fn seed_demo(&self, key: &str) -> Result<()> {
        self.write_record(key, &PortfolioRecord::demo()).await?;
        info!(key, "Seeded demo portfolio");
        Ok(())
    }

    async fn write_record(&self, key: &str, record: &PortfolioRecord) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(record)?;

        tokio::fs::write(&tmp, content).await?;
        tokio::fs::rename(&tmp, &path).await?;
        debug!(path = %path.display(), holdings = record.holdings.len(), "Saved portfolio");
        Ok(())
    }
}

#[async_trait]
impl PortfolioStore for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Portfolio> {
        let path = self.path_for(key);
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TradeError::NotFound(key.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let record: PortfolioRecord = serde_json::from_str(&content)?;
        debug!(path = %path.display(), holdings = record.holdings.len(), "Loaded portfolio");
        record.into_portfolio()
    }

    async fn save(&self, key: &str, portfolio: &Portfolio) -> Result<()> {
        self.write_record(key, &PortfolioRecord::from(portfolio))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Market, Operation, OperationKind, Stock};
    use rust_decimal_macros::dec;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_not_found() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        assert!(store.load("alice").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_save_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));

        let mut portfolio = Portfolio::new().with_cash(dec!(100.5));
        let op = Operation::new(
            Stock::new("NFLX", "Netflix", Market::Nasdaq),
            OperationKind::Buy,
        )
        .with_quantity(3)
        .with_unit_price(dec!(301.25));
        portfolio.upsert(&op).unwrap();

        store.save("alice", &portfolio).await.unwrap();
        assert!(store.path_for("alice").exists());
        assert!(!store.path_for("alice").with_extension("json.tmp").exists());

        let loaded = store.load("alice").await.unwrap();
        assert_eq!(loaded, portfolio);
    }

    #[tokio::test]
    async fn test_seed_demo() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.seed_demo("demo").await.unwrap();

        let portfolio = store.load("demo").await.unwrap();
        let tickers: Vec<_> = portfolio
            .holdings
            .iter()
            .map(|h| h.stock.ticker.as_str())
            .collect();
        assert_eq!(tickers, vec!["GOOG", "NFLX", "FB"]);
        assert_eq!(portfolio.held_quantity("GOOG"), 30);
    }

    #[tokio::test]
    async fn test_reads_legacy_string_record() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let json = r#"{"holdings": [{"ticker": "FB", "market": "NASDAQ",
            "company": "Facebook, Inc.", "last_price": "198.8", "avg_price": "210.5",
            "quantity": "10", "quantity_compromised": "0"}]}"#;
        std::fs::write(store.path_for("legacy"), json).unwrap();

        let portfolio = store.load("legacy").await.unwrap();
        assert_eq!(portfolio.holding("FB").unwrap().average_price, dec!(210.5));
    }

    #[tokio::test]
    async fn test_corrupt_record_is_error() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path_for("broken"), "{not json").unwrap();

        let err = store.load("broken").await.unwrap_err();
        assert!(matches!(err, TradeError::Json(_)));
    }

    #[test]
    fn test_path_escapes_key() {
        let store = JsonFileStore::new("/data");
        assert_eq!(
            store.path_for("../etc/passwd"),
            PathBuf::from("/data/_2E_2E_2Fetc_2Fpasswd.json")
        );
        assert_eq!(store.path_for("user-1"), PathBuf::from("/data/user-1.json"));
        assert_eq!(store.path_for("Bob"), PathBuf::from("/data/_42ob.json"));
        assert_eq!(store.path_for(""), PathBuf::from("/data/_.json"));
    }

    #[test]
    fn test_distinct_keys_get_distinct_files() {
        let store = JsonFileStore::new("/data");
        let keys = [
            "alice.b", "alice_b", "alice_2Eb", "a@x", "a#x", "Alice", "alice", "", "_", "é",
        ];
        let paths: std::collections::HashSet<PathBuf> =
            keys.iter().map(|k| store.path_for(k)).collect();
        assert_eq!(paths.len(), keys.len());
    }

    #[tokio::test]
    async fn test_similar_keys_do_not_share_a_portfolio() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());

        let mut portfolio = Portfolio::new();
        let op = Operation::new(
            Stock::new("MSFT", "Microsoft", Market::Nasdaq),
            OperationKind::Buy,
        )
        .with_quantity(25)
        .with_unit_price(dec!(120));
        portfolio.upsert(&op).unwrap();
        store.save("alice.b", &portfolio).await.unwrap();

        assert!(store.load("alice_b").await.unwrap_err().is_not_found());
        assert_eq!(store.load("alice.b").await.unwrap().held_quantity("MSFT"), 25);
    }
}
