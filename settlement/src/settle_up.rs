//! Settle-up helpers
//!
//! Turns a [`SettlementPlan`](crate::SettlementPlan) into the choices a
//! "settle amount" form offers: who can pay, whom they can pay, and how much.

use crate::types::{MemberBalance, SuggestedTransfer};
use ledger_core::{InvalidReason, InvalidTransaction, MemberName, TransactionDraft};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Total suggested outflow per payer, largest first
///
/// Payers with equal totals keep the order they first appear in `transfers`.
pub fn debtor_totals(transfers: &[SuggestedTransfer]) -> Vec<(MemberName, Decimal)> {
    let mut totals: Vec<(MemberName, Decimal)> = Vec::new();

    for transfer in transfers {
        match totals.iter_mut().find(|(member, _)| *member == transfer.from) {
            Some((_, total)) => *total += transfer.amount,
            None => totals.push((transfer.from.clone(), transfer.amount)),
        }
    }

    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

/// Receivers suggested for `from`, largest amount first
pub fn receivers_for(transfers: &[SuggestedTransfer], from: &MemberName) -> Vec<(MemberName, Decimal)> {
    let mut receivers: Vec<(MemberName, Decimal)> = transfers
        .iter()
        .filter(|t| t.from == *from)
        .map(|t| (t.to.clone(), t.amount))
        .collect();

    receivers.sort_by(|a, b| b.1.cmp(&a.1));
    receivers
}

/// Suggested amount for a specific payer/receiver pair
pub fn suggested_amount(
    transfers: &[SuggestedTransfer],
    from: &MemberName,
    to: &MemberName,
) -> Option<Decimal> {
    transfers
        .iter()
        .find(|t| t.from == *from && t.to == *to)
        .map(|t| t.amount)
}

/// Balances as they would be once every transfer is recorded
///
/// Transfers naming a member absent from `balances` are skipped.
pub fn apply_transfers(
    balances: &[MemberBalance],
    transfers: &[SuggestedTransfer],
) -> Vec<MemberBalance> {
    let mut applied = balances.to_vec();

    for transfer in transfers {
        if let Some(payer) = applied.iter_mut().find(|b| b.member == transfer.from) {
            payer.add_paid(transfer.amount);
        }
        if let Some(receiver) = applied.iter_mut().find(|b| b.member == transfer.to) {
            receiver.add_owed(transfer.amount);
        }
    }

    applied
}

/// A payment one member records against another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettleRequest {
    /// Payer
    pub from: MemberName,

    /// Receiver
    pub to: MemberName,

    /// Amount paid
    pub amount: Decimal,

    /// Optional note; blank falls back to "Settlement from X to Y"
    #[serde(default)]
    pub description: String,
}

impl SettleRequest {
    /// Create request without a note
    pub fn new(from: impl Into<MemberName>, to: impl Into<MemberName>, amount: Decimal) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            description: String::new(),
        }
    }

    /// Request prefilled from a suggested transfer
    pub fn from_suggestion(transfer: &SuggestedTransfer) -> Self {
        Self::new(transfer.from.clone(), transfer.to.clone(), transfer.amount)
    }

    /// Attach a note
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Convert to a settlement transaction draft
    ///
    /// Roster membership is checked later, when the draft is stored.
    pub fn into_draft(self) -> Result<TransactionDraft, InvalidTransaction> {
        if self.amount <= Decimal::ZERO {
            return Err(InvalidTransaction::draft(InvalidReason::NonPositiveAmount(
                self.amount,
            )));
        }

        if self.from == self.to {
            return Err(InvalidTransaction::draft(InvalidReason::SelfSettlement(self.from)));
        }

        let draft = TransactionDraft::settlement(self.from, self.to, self.amount);
        let description = self.description.trim();

        Ok(if description.is_empty() {
            draft
        } else {
            draft.with_description(description)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_core::TransactionKind;
    use rust_decimal_macros::dec;

    fn transfer(from: &str, to: &str, amount: Decimal) -> SuggestedTransfer {
        SuggestedTransfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }

    fn plan() -> Vec<SuggestedTransfer> {
        vec![
            transfer("Anna", "John", dec!(300)),
            transfer("Mike", "John", dec!(1025)),
            transfer("Anna", "Sarah", dec!(325)),
            transfer("Alex", "Sarah", dec!(50)),
        ]
    }

    #[test]
    fn test_debtor_totals() {
        let totals = debtor_totals(&plan());

        assert_eq!(
            totals,
            vec![
                (MemberName::from("Mike"), dec!(1025)),
                (MemberName::from("Anna"), dec!(625)),
                (MemberName::from("Alex"), dec!(50)),
            ]
        );
    }

    #[test]
    fn test_receivers_for_payer() {
        let receivers = receivers_for(&plan(), &"Anna".into());

        assert_eq!(
            receivers,
            vec![(MemberName::from("Sarah"), dec!(325)), (MemberName::from("John"), dec!(300))]
        );
        assert!(receivers_for(&plan(), &"John".into()).is_empty());
    }

    #[test]
    fn test_suggested_amount() {
        let transfers = plan();

        assert_eq!(
            suggested_amount(&transfers, &"Mike".into(), &"John".into()),
            Some(dec!(1025))
        );
        assert_eq!(
            suggested_amount(&transfers, &"Mike".into(), &"Sarah".into()),
            None
        );
    }

    #[test]
    fn test_apply_transfers_zeroes_balances() {
        let mut john = MemberBalance::new("John".into());
        john.add_paid(dec!(100));
        let mut you = MemberBalance::new("You".into());
        you.add_owed(dec!(100));

        let applied = apply_transfers(&[john, you], &[transfer("You", "John", dec!(100))]);

        assert!(applied.iter().all(|b| b.net_balance.is_zero()));
        assert_eq!(applied[1].paid, dec!(100));
    }

    #[test]
    fn test_into_draft_default_description() {
        let draft = SettleRequest::new("Mike", "John", dec!(500))
            .with_description("   ")
            .into_draft()
            .unwrap();

        assert_eq!(draft.kind, TransactionKind::Settlement);
        assert_eq!(draft.description, "Settlement from Mike to John");
        assert_eq!(draft.split_between, vec![MemberName::from("John")]);
    }

    #[test]
    fn test_into_draft_keeps_note() {
        let draft = SettleRequest::from_suggestion(&transfer("Anna", "John", dec!(625)))
            .with_description("UPI")
            .into_draft()
            .unwrap();

        assert_eq!(draft.description, "UPI");
        assert_eq!(draft.amount, dec!(625));
    }

    #[test]
    fn test_into_draft_rejects_bad_requests() {
        let zero = SettleRequest::new("Mike", "John", dec!(0)).into_draft().unwrap_err();
        assert_eq!(zero.reason, InvalidReason::NonPositiveAmount(dec!(0)));

        let own = SettleRequest::new("Mike", "Mike", dec!(10)).into_draft().unwrap_err();
        assert_eq!(own.reason, InvalidReason::SelfSettlement("Mike".into()));
    }
}
