//! SplitLedger Settlement
//!
//! Balance aggregation and settlement suggestions for shared-expense groups.
//!
//! # Architecture

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]
//!
//! A group's ledger flows through two pure stages:
//!
//! 1. **Aggregation**: fold expenses and settlements into per-member
//!    `paid`, `owes` and `net_balance` ([`balances`])
//! 2. **Minimization**: match the largest debtors with the largest creditors
//!    until every balance is within epsilon of zero ([`netting`])
//!
//! [`SettlementEngine`] wires both stages to a [`ledger_core::GroupStore`] and
//! records settlements back into it.
//!
//! # Example
//!
//! ```
//! use ledger_core::{MemberName, Transaction, TransactionDraft};
//! use rust_decimal::Decimal;
//! use settlement::{compute_balances, suggest_settlements};
//! use uuid::Uuid;
//!
//! let members: Vec<MemberName> = vec!["John".into(), "Sarah".into()];
//! let dinner = Transaction::from_draft(
//!     Uuid::now_v7(),
//!     TransactionDraft::expense("Dinner", Decimal::new(1000, 0), "John", ["John", "Sarah"]),
//! );
//!
//! let balances = compute_balances(&[dinner], &members)?;
//! let plan = suggest_settlements(&balances);
//!
//! assert_eq!(plan.transfers.len(), 1);
//! assert_eq!(plan.transfers[0].amount, Decimal::new(500, 0));
//! # Ok::<(), ledger_core::InvalidTransaction>(())
//! ```

pub mod types;
pub mod balances;
pub mod netting;
pub mod settle_up;
pub mod format;
pub mod metrics;
pub mod error;
pub mod config;
pub mod engine;

// Re-exports
pub use error::{Error, Result};
pub use types::*;
pub use balances::{compute_balances, net_total};
pub use netting::{suggest_settlements, NettingEngine};
pub use settle_up::SettleRequest;
pub use config::Config;
pub use engine::SettlementEngine;
