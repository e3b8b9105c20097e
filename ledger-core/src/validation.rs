//! Boundary validation
//!
//! Every member-existence and shape check for transactions and rosters lives
//! here. The store runs these before persisting anything, so the balance
//! computation downstream only ever sees well-formed ledgers.

use crate::{
    error::{InvalidReason, InvalidTransaction},
    types::{Group, MemberName, TransactionDraft, TransactionKind},
    Error, Result,
};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Validate a transaction draft against the group it is recorded in
pub fn validate_draft(
    group: &Group,
    draft: &TransactionDraft,
) -> std::result::Result<(), InvalidTransaction> {
    check_draft(group.roster(), draft).map_err(InvalidTransaction::draft)
}

/// Shape and membership checks shared by drafts and stored transactions
pub fn check_draft(
    roster: &[MemberName],
    draft: &TransactionDraft,
) -> std::result::Result<(), InvalidReason> {
    if draft.amount <= Decimal::ZERO {
        return Err(InvalidReason::NonPositiveAmount(draft.amount));
    }

    if draft.split_between.is_empty() {
        return Err(InvalidReason::EmptySplit);
    }

    if !roster.contains(&draft.paid_by) {
        return Err(InvalidReason::UnknownMember(draft.paid_by.clone()));
    }

    let mut seen = HashSet::with_capacity(draft.split_between.len());
    for member in &draft.split_between {
        if !roster.contains(member) {
            return Err(InvalidReason::UnknownMember(member.clone()));
        }
        if !seen.insert(member) {
            return Err(InvalidReason::DuplicateSplitMember(member.clone()));
        }
    }

    if draft.kind == TransactionKind::Settlement {
        if draft.split_between.len() != 1 {
            return Err(InvalidReason::SettlementRecipientCount(
                draft.split_between.len(),
            ));
        }
        if draft.split_between[0] == draft.paid_by {
            return Err(InvalidReason::SelfSettlement(draft.paid_by.clone()));
        }
    }

    Ok(())
}

/// Validate a group name and roster
pub fn validate_roster(name: &str, members: &[MemberName]) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidGroup("group name must not be empty".to_string()));
    }

    if members.is_empty() {
        return Err(Error::InvalidGroup(
            "group must have at least one member".to_string(),
        ));
    }

    let mut seen = HashSet::with_capacity(members.len());
    for member in members {
        if member.is_blank() {
            return Err(Error::InvalidGroup(
                "member names must not be empty".to_string(),
            ));
        }
        if !seen.insert(member) {
            return Err(Error::DuplicateMember(member.clone()));
        }
    }

    Ok(())
}
