//! Balance aggregation
//!
//! Folds a group's ledger into one [`MemberBalance`] per roster member.
//!
//! # Rules
//!
//! - `paid` is the sum of amounts the member fronted (expenses and settlements alike)
//! - `owes` is the sum of equal shares `amount / |split_between|` over every
//!   transaction the member is split into
//! - A settlement has exactly one recipient, so the recipient's share is the full
//!   amount and the payment cancels the matching debt
//!
//! # Example
//!
//! ```text
//! Roster: John, Sarah, Mike, Anna
//!
//!   Dinner      2500 paid by John,  split 4 ways
//!   Taxi         800 paid by Sarah, split Sarah/Mike
//!   Settlement   500 paid by Mike,  to John
//!
//! Balances:
//!   John   paid 2500  owes 1125  net +1375
//!   Sarah  paid  800  owes 1025  net  -225
//!   Mike   paid  500  owes 1025  net  -525
//!   Anna   paid    0  owes  625  net  -625
//! ```

use crate::types::MemberBalance;
use ledger_core::{InvalidReason, InvalidTransaction, MemberName, Transaction};
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};

/// Compute per-member balances in roster order
///
/// Fails on the first transaction with an empty split, a non-positive amount,
/// a member named twice in the split, or a payer or split member outside
/// `members`. Inputs are never mutated.
pub fn compute_balances(
    transactions: &[Transaction],
    members: &[MemberName],
) -> Result<Vec<MemberBalance>, InvalidTransaction> {
    let mut balances: Vec<MemberBalance> =
        members.iter().cloned().map(MemberBalance::new).collect();

    let mut index: HashMap<&MemberName, usize> = HashMap::with_capacity(members.len());
    for (i, member) in members.iter().enumerate() {
        index.entry(member).or_insert(i);
    }

    for txn in transactions {
        let share = equal_share(txn).map_err(|reason| InvalidTransaction::stored(txn.id, reason))?;

        let payer = lookup(&index, &txn.paid_by)
            .map_err(|reason| InvalidTransaction::stored(txn.id, reason))?;

        // Resolve the whole split before touching any balance
        let debtors = resolve_split(&index, &txn.split_between)
            .map_err(|reason| InvalidTransaction::stored(txn.id, reason))?;

        balances[payer].add_paid(txn.amount);
        for debtor in debtors {
            balances[debtor].add_owed(share);
        }
    }

    tracing::debug!(
        members = members.len(),
        transactions = transactions.len(),
        "Computed balances"
    );

    Ok(balances)
}

/// Sum of all net balances
///
/// Zero (up to division rounding) for any ledger that passed validation.
pub fn net_total(balances: &[MemberBalance]) -> Decimal {
    balances.iter().map(|b| b.net_balance).sum()
}

/// Per-member share of a transaction
fn equal_share(txn: &Transaction) -> Result<Decimal, InvalidReason> {
    if txn.amount <= Decimal::ZERO {
        return Err(InvalidReason::NonPositiveAmount(txn.amount));
    }

    let count = Decimal::from(txn.split_between.len());
    txn.amount.checked_div(count).ok_or(InvalidReason::EmptySplit)
}

/// Roster positions of the split, each member at most once
fn resolve_split(
    index: &HashMap<&MemberName, usize>,
    split_between: &[MemberName],
) -> Result<Vec<usize>, InvalidReason> {
    let mut seen = HashSet::with_capacity(split_between.len());

    split_between
        .iter()
        .map(|member| {
            let position = lookup(index, member)?;
            if !seen.insert(position) {
                return Err(InvalidReason::DuplicateSplitMember(member.clone()));
            }
            Ok(position)
        })
        .collect()
}

fn lookup(index: &HashMap<&MemberName, usize>, member: &MemberName) -> Result<usize, InvalidReason> {
    index
        .get(member)
        .copied()
        .ok_or_else(|| InvalidReason::UnknownMember(member.clone()))
}
