//! SplitLedger Core
//!
//! Group ledger model for shared-expense tracking: members, groups, and the
//! expense/settlement transactions recorded against them.
//!
//! # Architecture
//!
//! - **Explicit store handle**: persistence is reached through the [`GroupStore`]
//!   trait, never through module-level state
//! - **Boundary validation**: every transaction is checked against its group's
//!   roster before it is stored ([`validation`])
//! - **Exact money**: amounts are `rust_decimal::Decimal`

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]
//!
//! # Invariants
//!
//! - Every stored transaction has a positive amount and a non-empty split
//! - Payer and split members belong to the group roster when recorded
//! - `Group::total_expenses` changes only by the delta of each mutation

pub mod types;
pub mod store;
pub mod validation;
pub mod error;
pub mod config;

// Re-exports
pub use error::{Error, InvalidReason, InvalidTransaction, Result};
pub use types::{
    Currency, Group, Member, MemberName, Snapshot, Transaction, TransactionDraft,
    TransactionKind,
};
pub use store::{GroupStore, InMemoryStore};
pub use config::Config;
