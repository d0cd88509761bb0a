//! Order execution
//!
//! [`Broker`] is the seam to whatever executes confirmed orders. The only
//! implementation shipped is [`PaperBroker`], which never leaves the process.

use crate::model::Operation;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Outcome of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Failure,
}

/// What the broker returns for a submitted operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrokerReceipt {
    pub status: ExecutionStatus,
    pub transaction_id: Option<String>,
    pub errors: Vec<String>,
}

impl BrokerReceipt {
    pub fn success(transaction_id: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Success,
            transaction_id: Some(transaction_id.into()),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<String>) -> Self {
        Self {
            status: ExecutionStatus::Failure,
            transaction_id: None,
            errors,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

/// Executes confirmed operations
#[async_trait]
pub trait Broker: Send + Sync {
    /// Display name
    fn name(&self) -> &str;

    /// Submit an operation for execution
    async fn submit(&self, operation: &Operation) -> BrokerReceipt;
}

/// Simulated broker: accepts every fully priced operation
#[derive(Debug, Clone)]
pub struct PaperBroker {
    name: String,
}

impl PaperBroker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for PaperBroker {
    fn default() -> Self {
        Self::new("Fast Broker")
    }
}

#[async_trait]
impl Broker for PaperBroker {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit(&self, operation: &Operation) -> BrokerReceipt {
        if !operation.is_priced() {
            warn!(ticker = %operation.stock.ticker, "Rejected unpriced operation");
            return BrokerReceipt::failure(vec![format!(
                "{} cannot execute an order without quantity and price",
                self.name
            )]);
        }

        let transaction_id = uuid::Uuid::new_v4().to_string();
        debug!(
            broker = %self.name,
            ticker = %operation.stock.ticker,
            kind = %operation.kind,
            %transaction_id,
            "Paper order filled"
        );
        BrokerReceipt::success(transaction_id)
    }
}
