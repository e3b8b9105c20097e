//! Error types for balance and settlement computation

use crate::types::LedgerImbalance;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error (missing group, invalid transaction, store failure)
    #[error("Ledger error: {0}")]
    Ledger(#[from] ledger_core::Error),

    /// Residual balances remained after matching
    #[error("Unbalanced ledger: {0}")]
    UnbalancedLedger(LedgerImbalance),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Metrics registry error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ledger_core::InvalidTransaction> for Error {
    fn from(err: ledger_core::InvalidTransaction) -> Self {
        Error::Ledger(ledger_core::Error::InvalidTransaction(err))
    }
}

impl Error {
    /// Invalid-transaction details, if that is what this error carries
    pub fn invalid_transaction(&self) -> Option<&ledger_core::InvalidTransaction> {
        match self {
            Error::Ledger(ledger_core::Error::InvalidTransaction(invalid)) => Some(invalid),
            _ => None,
        }
    }
}
