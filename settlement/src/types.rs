//! Core types for balance and settlement computation

use ledger_core::{Group, MemberName};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-member position derived from a group's ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberBalance {
    /// Member
    pub member: MemberName,

    /// Sum of amounts this member fronted
    pub paid: Decimal,

    /// Sum of this member's equal shares
    pub owes: Decimal,

    /// `paid - owes` (positive = owed money, negative = owes money)
    pub net_balance: Decimal,
}

impl MemberBalance {
    /// Create zeroed balance
    pub fn new(member: MemberName) -> Self {
        Self {
            member,
            paid: Decimal::ZERO,
            owes: Decimal::ZERO,
            net_balance: Decimal::ZERO,
        }
    }

    /// Record an amount fronted by this member
    pub fn add_paid(&mut self, amount: Decimal) {
        self.paid += amount;
        self.net_balance = self.paid - self.owes;
    }

    /// Record a share owed by this member
    pub fn add_owed(&mut self, share: Decimal) {
        self.owes += share;
        self.net_balance = self.paid - self.owes;
    }

    /// Check if net debtor
    pub fn is_debtor(&self) -> bool {
        self.net_balance < Decimal::ZERO
    }

    /// Check if net creditor
    pub fn is_creditor(&self) -> bool {
        self.net_balance > Decimal::ZERO
    }
}

/// Suggested payment from a debtor to a creditor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedTransfer {
    /// Debtor (pays)
    pub from: MemberName,

    /// Creditor (receives)
    pub to: MemberName,

    /// Amount to transfer (always positive)
    pub amount: Decimal,
}

/// Residual balances left after matching
///
/// Non-zero only when the input balances did not sum to zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerImbalance {
    /// Debt no creditor could absorb (as a positive amount)
    pub residual_debt: Decimal,

    /// Credit no debtor could cover
    pub residual_credit: Decimal,
}

impl LedgerImbalance {
    /// Larger of the two residuals
    pub fn magnitude(&self) -> Decimal {
        self.residual_debt.max(self.residual_credit)
    }
}

impl std::fmt::Display for LedgerImbalance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "residual debt {}, residual credit {}",
            self.residual_debt, self.residual_credit
        )
    }
}

/// Minimizer output
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettlementPlan {
    /// Transfers in emission order
    pub transfers: Vec<SuggestedTransfer>,

    /// Set when residual balances exceed the rounding epsilon
    pub imbalance: Option<LedgerImbalance>,
}

impl SettlementPlan {
    /// True when every balance was matched within epsilon
    pub fn is_balanced(&self) -> bool {
        self.imbalance.is_none()
    }

    /// Turn a residual imbalance into an error
    pub fn ensure_balanced(&self) -> crate::Result<()> {
        match self.imbalance {
            Some(imbalance) => Err(crate::Error::UnbalancedLedger(imbalance)),
            None => Ok(()),
        }
    }

    /// Sum of all suggested amounts
    pub fn total_transferred(&self) -> Decimal {
        self.transfers.iter().map(|t| t.amount).sum()
    }
}

/// Everything the presentation layer shows for one group
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    /// Group as stored
    pub group: Group,

    /// Balances in roster order
    pub balances: Vec<MemberBalance>,

    /// Suggested transfers
    pub plan: SettlementPlan,

    /// Sum of transaction amounts recomputed from the ledger
    pub ledger_total: Decimal,

    /// Number of transactions in the ledger
    pub transaction_count: usize,
}

impl GroupSummary {
    /// True when the stored running total disagrees with the ledger
    pub fn total_drifted(&self) -> bool {
        self.group.total_expenses != self.ledger_total
    }
}
