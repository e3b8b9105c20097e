//! Core types for the group ledger
//!
//! All types are designed for:
//! - JSON round-tripping with the field names used by API callers
//! - Exact arithmetic (Decimal for money)
//! - Cheap cloning into per-request working copies

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Member name, the identity used by groups and transactions
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberName(String);

impl MemberName {
    /// Create new member name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the name has no visible characters
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MemberName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MemberName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for MemberName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for MemberName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MemberName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Entry in the member directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member ID
    pub id: Uuid,

    /// Display name
    pub name: MemberName,
}

/// ISO 4217 currency code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Currency {
    /// US Dollar
    USD,
    /// Euro
    EUR,
    /// British Pound
    GBP,
    /// UAE Dirham
    AED,
    /// Indian Rupee
    #[default]
    INR,
}

impl Currency {
    /// ISO 4217 code
    pub fn code(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::AED => "AED",
            Currency::INR => "INR",
        }
    }

    /// Display symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::USD => "$",
            Currency::EUR => "€",
            Currency::GBP => "£",
            Currency::AED => "AED ",
            Currency::INR => "₹",
        }
    }
}

impl FromStr for Currency {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "AED" => Ok(Currency::AED),
            "INR" => Ok(Currency::INR),
            other => Err(crate::Error::Config(format!("Unknown currency: {}", other))),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Transaction variant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Shared cost, split equally among `split_between`
    #[default]
    Expense,
    /// Direct payment from `paid_by` to the single member of `split_between`
    Settlement,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Expense => write!(f, "expense"),
            TransactionKind::Settlement => write!(f, "settlement"),
        }
    }
}

/// Ledger entry: an expense or a settlement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction ID (UUIDv7 for time-ordering)
    pub id: Uuid,

    /// Owning group
    pub group_id: Uuid,

    /// Free text
    pub description: String,

    /// Amount (exact decimal, positive)
    pub amount: Decimal,

    /// Member who fronted the money
    pub paid_by: MemberName,

    /// Members sharing the cost; exactly the recipient for settlements
    pub split_between: Vec<MemberName>,

    /// Expense or settlement
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,

    /// Creation timestamp (display ordering only)
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Build a transaction from a validated draft
    pub fn from_draft(group_id: Uuid, draft: TransactionDraft) -> Self {
        Self {
            id: Uuid::now_v7(),
            group_id,
            description: draft.description,
            amount: draft.amount,
            paid_by: draft.paid_by,
            split_between: draft.split_between,
            kind: draft.kind,
            created_at: Utc::now(),
        }
    }

    /// True when `member` paid or shares this transaction
    pub fn involves(&self, member: &MemberName) -> bool {
        &self.paid_by == member || self.split_between.contains(member)
    }

    /// Check if this is a settlement
    pub fn is_settlement(&self) -> bool {
        self.kind == TransactionKind::Settlement
    }
}

/// Caller-supplied fields for creating or updating a transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    /// Free text
    pub description: String,

    /// Amount
    pub amount: Decimal,

    /// Payer
    pub paid_by: MemberName,

    /// Sharing members
    pub split_between: Vec<MemberName>,

    /// Expense or settlement
    #[serde(rename = "type", default)]
    pub kind: TransactionKind,
}

impl TransactionDraft {
    /// Expense shared equally among `split_between`
    pub fn expense(
        description: impl Into<String>,
        amount: Decimal,
        paid_by: impl Into<MemberName>,
        split_between: impl IntoIterator<Item = impl Into<MemberName>>,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            split_between: split_between.into_iter().map(Into::into).collect(),
            kind: TransactionKind::Expense,
        }
    }

    /// Direct payment from `from` to `to`
    pub fn settlement(
        from: impl Into<MemberName>,
        to: impl Into<MemberName>,
        amount: Decimal,
    ) -> Self {
        let from = from.into();
        let to = to.into();
        Self {
            description: format!("Settlement from {} to {}", from, to),
            amount,
            paid_by: from,
            split_between: vec![to],
            kind: TransactionKind::Settlement,
        }
    }

    /// Replace the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Group of members sharing a ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Group ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Ordered, unique roster
    pub members: Vec<MemberName>,

    /// Running sum of transaction amounts (maintained additively by the store)
    pub total_expenses: Decimal,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Group {
    /// Create new empty group
    pub fn new(name: impl Into<String>, members: Vec<MemberName>) -> Self {
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            members,
            total_expenses: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Check roster membership
    pub fn has_member(&self, member: &MemberName) -> bool {
        self.members.contains(member)
    }

    /// Roster in display order
    pub fn roster(&self) -> &[MemberName] {
        &self.members
    }
}

/// Serializable image of a whole store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Member directory
    #[serde(default)]
    pub members: Vec<Member>,

    /// Groups
    #[serde(default)]
    pub groups: Vec<Group>,

    /// Transactions of all groups
    #[serde(default, alias = "expenses")]
    pub transactions: Vec<Transaction>,
}
