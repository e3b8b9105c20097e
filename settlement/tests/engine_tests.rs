//! Integration tests for the settlement engine
//!
//! Drives the engine through an in-memory store the way a request handler
//! would: record expenses, read the summary, settle up, read again.

use ledger_core::{Error as LedgerError, GroupStore, InMemoryStore, InvalidReason, MemberName, TransactionDraft};
use rust_decimal_macros::dec;
use settlement::{
    format::format_currency,
    settle_up::{debtor_totals, receivers_for, suggested_amount},
    Config, Error, SettleRequest, SettlementEngine, SuggestedTransfer,
};
use std::sync::Arc;
use uuid::Uuid;

fn names(list: &[&str]) -> Vec<MemberName> {
    list.iter().copied().map(MemberName::from).collect()
}

fn transfer(from: &str, to: &str, amount: rust_decimal::Decimal) -> SuggestedTransfer {
    SuggestedTransfer {
        from: from.into(),
        to: to.into(),
        amount,
    }
}

/// Engine over a store holding the weekend trip ledger
fn weekend_trip() -> (SettlementEngine, Arc<dyn GroupStore>, Uuid) {
    let store: Arc<dyn GroupStore> = Arc::new(InMemoryStore::new());
    let group = store
        .create_group("Weekend Trip", names(&["John", "Sarah", "Mike", "Anna"]))
        .unwrap();

    store
        .add_transaction(
            group.id,
            TransactionDraft::expense(
                "Dinner",
                dec!(2500),
                "John",
                ["John", "Sarah", "Mike", "Anna"],
            ),
        )
        .unwrap();
    store
        .add_transaction(
            group.id,
            TransactionDraft::expense("Taxi", dec!(800), "Sarah", ["Sarah", "Mike"]),
        )
        .unwrap();
    store
        .add_transaction(group.id, TransactionDraft::settlement("Mike", "John", dec!(500)))
        .unwrap();

    let engine = SettlementEngine::new(Config::default(), Arc::clone(&store)).unwrap();
    (engine, store, group.id)
}

#[test]
fn test_weekend_trip_summary() {
    let (engine, _, group_id) = weekend_trip();

    let summary = engine.group_summary(group_id).unwrap();

    let nets: Vec<_> = summary
        .balances
        .iter()
        .map(|b| (b.member.as_str(), b.net_balance))
        .collect();
    assert_eq!(
        nets,
        vec![
            ("John", dec!(1375)),
            ("Sarah", dec!(-225)),
            ("Mike", dec!(-525)),
            ("Anna", dec!(-625)),
        ]
    );

    assert_eq!(
        summary.plan.transfers,
        vec![
            transfer("Anna", "John", dec!(625)),
            transfer("Mike", "John", dec!(525)),
            transfer("Sarah", "John", dec!(225)),
        ]
    );
    assert!(summary.plan.is_balanced());

    // The recipient of Mike's 500 carries it in `owes`
    let john = &summary.balances[0];
    assert_eq!((john.paid, john.owes), (dec!(2500), dec!(1125)));

    // Settlement amounts count toward the running total
    assert_eq!(summary.group.total_expenses, dec!(3800));
    assert_eq!(summary.ledger_total, dec!(3800));
    assert_eq!(summary.transaction_count, 3);
}

#[test]
fn test_settle_up_flow() {
    let (engine, _, group_id) = weekend_trip();
    let plan = engine.group_summary(group_id).unwrap().plan;

    // The form offers the largest debtor first, then their receivers
    let debtors = debtor_totals(&plan.transfers);
    assert_eq!(debtors[0], (MemberName::from("Anna"), dec!(625)));

    let receivers = receivers_for(&plan.transfers, &"Mike".into());
    assert_eq!(receivers, vec![(MemberName::from("John"), dec!(525))]);

    let amount = suggested_amount(&plan.transfers, &"Mike".into(), &"John".into()).unwrap();
    assert_eq!(amount, dec!(525));

    let recorded = engine
        .record_settlement(group_id, SettleRequest::new("Mike", "John", amount))
        .unwrap();
    assert!(recorded.is_settlement());
    assert_eq!(recorded.description, "Settlement from Mike to John");

    let after = engine.group_summary(group_id).unwrap();
    assert_eq!(
        after.plan.transfers,
        vec![
            transfer("Anna", "John", dec!(625)),
            transfer("Sarah", "John", dec!(225)),
        ]
    );
}

#[test]
fn test_loaded_snapshot_with_repeated_split_member_is_rejected() {
    let json = r#"{
        "groups": [{
            "id": "018f3b2e-0000-7000-8000-000000000001",
            "name": "Flat",
            "members": ["You", "Alex"],
            "totalExpenses": 10,
            "createdAt": "2024-01-15T00:00:00Z"
        }],
        "transactions": [{
            "id": "018f3b2e-0000-7000-8000-000000000002",
            "groupId": "018f3b2e-0000-7000-8000-000000000001",
            "description": "Chai",
            "amount": 10,
            "paidBy": "Alex",
            "splitBetween": ["You", "You"],
            "createdAt": "2024-02-15T00:00:00Z"
        }]
    }"#;

    let store: Arc<dyn GroupStore> =
        Arc::new(InMemoryStore::from_snapshot(serde_json::from_str(json).unwrap()));
    let group_id = store.list_groups().unwrap()[0].id;
    let engine = SettlementEngine::new(Config::default(), store).unwrap();

    let err = engine.group_summary(group_id).unwrap_err();

    assert_eq!(
        err.invalid_transaction().map(|i| &i.reason),
        Some(&InvalidReason::DuplicateSplitMember("You".into()))
    );
}

#[test]
fn test_recording_every_suggestion_settles_the_group() {
    let (engine, _, group_id) = weekend_trip();
    let plan = engine.group_summary(group_id).unwrap().plan;

    for suggestion in &plan.transfers {
        engine
            .record_settlement(group_id, SettleRequest::from_suggestion(suggestion))
            .unwrap();
    }

    let summary = engine.group_summary(group_id).unwrap();
    assert!(summary.plan.transfers.is_empty());
    assert!(summary.balances.iter().all(|b| b.net_balance.is_zero()));
    assert_eq!(engine.metrics().settlements_recorded.get(), 3);
}

#[test]
fn test_settlement_outside_roster_is_rejected() {
    let (engine, _, group_id) = weekend_trip();

    let err = engine
        .record_settlement(group_id, SettleRequest::new("Mike", "Zoe", dec!(10)))
        .unwrap_err();

    let invalid = err.invalid_transaction().unwrap();
    assert_eq!(invalid.reason, InvalidReason::UnknownMember("Zoe".into()));
}

#[test]
fn test_self_settlement_is_rejected() {
    let (engine, _, group_id) = weekend_trip();

    let err = engine
        .record_settlement(group_id, SettleRequest::new("Anna", "Anna", dec!(10)))
        .unwrap_err();

    assert_eq!(
        err.invalid_transaction().map(|i| &i.reason),
        Some(&InvalidReason::SelfSettlement("Anna".into()))
    );
    assert_eq!(engine.metrics().invalid_transactions.get(), 1);
}

#[test]
fn test_unknown_group() {
    let (engine, _, _) = weekend_trip();

    let err = engine.group_summary(Uuid::now_v7()).unwrap_err();
    assert!(matches!(err, Error::Ledger(LedgerError::GroupNotFound(_))));
}

#[test]
fn test_malformed_snapshot_surfaces_invalid_transaction() {
    // Roster edited behind the store's back, leaving Anna's share orphaned
    let json = r#"{
        "groups": [{
            "id": "018f3b2e-0000-7000-8000-000000000001",
            "name": "Flat",
            "members": ["You", "Alex"],
            "totalExpenses": 90,
            "createdAt": "2024-01-15T00:00:00Z"
        }],
        "transactions": [{
            "id": "018f3b2e-0000-7000-8000-000000000002",
            "groupId": "018f3b2e-0000-7000-8000-000000000001",
            "description": "Pizza",
            "amount": 90,
            "paidBy": "You",
            "splitBetween": ["You", "Alex", "Anna"],
            "createdAt": "2024-02-15T00:00:00Z"
        }]
    }"#;

    let store: Arc<dyn GroupStore> =
        Arc::new(InMemoryStore::from_snapshot(serde_json::from_str(json).unwrap()));
    let group_id = store.list_groups().unwrap()[0].id;
    let engine = SettlementEngine::new(Config::default(), store).unwrap();

    let err = engine.group_summary(group_id).unwrap_err();

    let invalid = err.invalid_transaction().unwrap();
    assert_eq!(invalid.reason, InvalidReason::UnknownMember("Anna".into()));
    assert!(invalid.transaction_id.is_some());
    assert_eq!(engine.metrics().invalid_transactions.get(), 1);
}

#[test]
fn test_uneven_split_rounds_only_for_display() {
    let store: Arc<dyn GroupStore> = Arc::new(InMemoryStore::new());
    let group = store
        .create_group("Roommates", names(&["You", "Alex", "Chris"]))
        .unwrap();
    store
        .add_transaction(
            group.id,
            TransactionDraft::expense("Groceries", dec!(100), "Alex", ["You", "Alex", "Chris"]),
        )
        .unwrap();

    let engine = SettlementEngine::new(Config::default(), store).unwrap();
    let summary = engine.group_summary(group.id).unwrap();

    assert!(summary.plan.is_balanced());
    assert_eq!(summary.plan.transfers.len(), 2);

    let shown: Vec<String> = summary
        .plan
        .transfers
        .iter()
        .map(|t| format!("{} → {} {}", t.from, t.to, format_currency(t.amount, engine.config().display.currency)))
        .collect();
    assert_eq!(
        shown,
        vec!["You → Alex ₹33.33", "Chris → Alex ₹33.33"]
    );
}

#[test]
fn test_metrics_exposition() {
    let (engine, _, group_id) = weekend_trip();
    engine.group_summary(group_id).unwrap();

    let text = engine.metrics().gather_text().unwrap();
    assert!(text.contains("splitledger_balance_computations_total 1"));
    assert!(text.contains("splitledger_suggested_transfers_total 3"));
    assert!(text.contains("splitledger_unbalanced_ledgers_total 0"));
}
