//! Settlement minimization
//!
//! Greedy largest-debtor / largest-creditor matching over net balances.
//!
//! # Algorithm
//!
//! 1. Split members into debtors (net < 0) and creditors (net > 0)
//! 2. Sort debtors most negative first, creditors largest first (stable, so
//!    ties keep roster order)
//! 3. Walk both lists, transferring `min(debt, credit)` at each step
//! 4. Move past a side once its remainder is below epsilon (both sides may move
//!    in the same step)
//!
//! This is a heuristic. It does not guarantee the minimum possible number of
//! transfers, which would need exact subset-sum matching.
//!
//! # Example
//!
//! ```text
//! Net balances:
//!   John  +1375
//!   Sarah  -225
//!   Mike   -525
//!   Anna   -625
//!
//! Debtors:   Anna 625, Mike 525, Sarah 225
//! Creditors: John 1375
//!
//! Transfers:
//!   Anna  → John  625
//!   Mike  → John  525
//!   Sarah → John  225
//! ```

use crate::types::{LedgerImbalance, MemberBalance, SettlementPlan, SuggestedTransfer};
use crate::{Error, Result};
use ledger_core::MemberName;
use rust_decimal::Decimal;

/// Remainders below this are treated as settled
pub const DEFAULT_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Working copy of one side of the match
#[derive(Debug)]
struct OpenPosition<'a> {
    member: &'a MemberName,
    remaining: Decimal,
}

/// Settlement minimizer
#[derive(Debug, Clone, Copy)]
pub struct NettingEngine {
    /// Settlement threshold
    epsilon: Decimal,
}

impl NettingEngine {
    /// Create new netting engine
    ///
    /// A zero or negative threshold is rejected: the walk only moves past a
    /// side once its remainder drops below epsilon.
    pub fn new(epsilon: Decimal) -> Result<Self> {
        if epsilon <= Decimal::ZERO {
            return Err(Error::Config(format!(
                "netting epsilon must be positive, got {epsilon}"
            )));
        }

        Ok(Self { epsilon })
    }

    /// Settlement threshold in use
    pub fn epsilon(&self) -> Decimal {
        self.epsilon
    }

    /// Suggest transfers that bring every balance to zero
    ///
    /// Never mutates `balances`. Residual debt or credit left after the walk is
    /// reported in [`SettlementPlan::imbalance`] rather than dropped.
    pub fn suggest(&self, balances: &[MemberBalance]) -> SettlementPlan {
        let (mut debtors, mut creditors) = self.open_positions(balances);

        let mut transfers = Vec::new();
        let (mut i, mut j) = (0, 0);

        while i < debtors.len() && j < creditors.len() {
            let debtor = &mut debtors[i];
            let creditor = &mut creditors[j];

            let amount = debtor.remaining.min(creditor.remaining);

            if amount > Decimal::ZERO {
                transfers.push(SuggestedTransfer {
                    from: debtor.member.clone(),
                    to: creditor.member.clone(),
                    amount,
                });

                debtor.remaining -= amount;
                creditor.remaining -= amount;
            }

            if debtor.remaining < self.epsilon {
                i += 1;
            }
            if creditor.remaining < self.epsilon {
                j += 1;
            }
        }

        let imbalance = self.residual(&debtors[i..], &creditors[j..]);

        if let Some(imbalance) = &imbalance {
            tracing::warn!(
                residual_debt = %imbalance.residual_debt,
                residual_credit = %imbalance.residual_credit,
                "Balances do not cancel out"
            );
        }

        tracing::debug!(
            members = balances.len(),
            transfers = transfers.len(),
            "Suggested settlements"
        );

        SettlementPlan {
            transfers,
            imbalance,
        }
    }

    /// Sorted debtor and creditor working copies
    fn open_positions<'a>(
        &self,
        balances: &'a [MemberBalance],
    ) -> (Vec<OpenPosition<'a>>, Vec<OpenPosition<'a>>) {
        let mut debtors: Vec<&MemberBalance> = balances.iter().filter(|b| b.is_debtor()).collect();
        let mut creditors: Vec<&MemberBalance> =
            balances.iter().filter(|b| b.is_creditor()).collect();

        // `sort_by` is stable: equal balances keep roster order
        debtors.sort_by(|a, b| a.net_balance.cmp(&b.net_balance));
        creditors.sort_by(|a, b| b.net_balance.cmp(&a.net_balance));

        let open = |b: &'a MemberBalance| OpenPosition {
            member: &b.member,
            remaining: b.net_balance.abs(),
        };

        (
            debtors.into_iter().map(open).collect(),
            creditors.into_iter().map(open).collect(),
        )
    }

    /// Leftover debt and credit on positions the walk never closed
    fn residual(
        &self,
        debtors: &[OpenPosition<'_>],
        creditors: &[OpenPosition<'_>],
    ) -> Option<LedgerImbalance> {
        let imbalance = LedgerImbalance {
            residual_debt: debtors.iter().map(|d| d.remaining).sum(),
            residual_credit: creditors.iter().map(|c| c.remaining).sum(),
        };

        (imbalance.magnitude() >= self.epsilon).then_some(imbalance)
    }
}

impl Default for NettingEngine {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

/// Suggest transfers with the default epsilon
pub fn suggest_settlements(balances: &[MemberBalance]) -> SettlementPlan {
    NettingEngine::default().suggest(balances)
}
