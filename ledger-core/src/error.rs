//! Error types for the group ledger

use crate::types::MemberName;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Group not found
    #[error("Group not found: {0}")]
    GroupNotFound(Uuid),

    /// Transaction not found in the given group
    #[error("Transaction {transaction_id} not found in group {group_id}")]
    TransactionNotFound {
        /// Group searched
        group_id: Uuid,
        /// Missing transaction
        transaction_id: Uuid,
    },

    /// Member not found
    #[error("Member not found: {0}")]
    MemberNotFound(MemberName),

    /// Roster or directory already holds this name
    #[error("Duplicate member: {0}")]
    DuplicateMember(MemberName),

    /// Roster edit would drop members still referenced by transactions
    #[error("Cannot remove members that are part of expenses: {}", join_names(.members))]
    MembersInUse {
        /// Members that are still referenced
        members: Vec<MemberName>,
    },

    /// Transaction failed boundary validation
    #[error(transparent)]
    InvalidTransaction(#[from] InvalidTransaction),

    /// Group failed validation
    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    /// Member directory entry failed validation
    #[error("Invalid member: {0}")]
    InvalidMember(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A transaction that cannot take part in balance computation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid transaction{}: {reason}", fmt_id(.transaction_id))]
pub struct InvalidTransaction {
    /// Offending transaction, when it already exists
    pub transaction_id: Option<Uuid>,

    /// What is wrong with it
    pub reason: InvalidReason,
}

impl InvalidTransaction {
    /// Error for a transaction that is not persisted yet
    pub fn draft(reason: InvalidReason) -> Self {
        Self {
            transaction_id: None,
            reason,
        }
    }

    /// Error for a stored transaction
    pub fn stored(transaction_id: Uuid, reason: InvalidReason) -> Self {
        Self {
            transaction_id: Some(transaction_id),
            reason,
        }
    }
}

/// Validation failure reasons
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// `split_between` is empty
    #[error("split_between must not be empty")]
    EmptySplit,

    /// Zero or negative amount
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    /// Payer or split member outside the roster
    #[error("member {0} is not part of the group")]
    UnknownMember(MemberName),

    /// Settlements need exactly one recipient
    #[error("settlement must have exactly one recipient, got {0}")]
    SettlementRecipientCount(usize),

    /// Settlement paid to oneself
    #[error("settlement from {0} to themselves")]
    SelfSettlement(MemberName),

    /// Same member listed twice in `split_between`
    #[error("member {0} listed more than once in split_between")]
    DuplicateSplitMember(MemberName),
}

fn join_names(members: &[MemberName]) -> String {
    members
        .iter()
        .map(MemberName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn fmt_id(id: &Option<Uuid>) -> String {
    id.map(|id| format!(" {}", id)).unwrap_or_default()
}
