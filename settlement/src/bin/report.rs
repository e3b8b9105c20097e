//! Settlement report binary
//!
//! Usage: `splitledger-report [config.toml]`
//!
//! Without a config file, settings come from `SPLITLEDGER_*` environment
//! variables. Without a snapshot, a demo ledger is seeded.

use anyhow::Context;
use ledger_core::{Currency, GroupStore, InMemoryStore, MemberName, TransactionDraft};
use rust_decimal::Decimal;
use settlement::{
    config::LogFormat,
    format::{format_balance, format_currency, format_relative},
    Config, GroupSummary, SettlementEngine,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::from_env().context("Failed to load config from environment")?,
    };

    init_tracing(config.display.log_format);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        "Starting SplitLedger report"
    );

    let store = match &config.ledger.snapshot_path {
        Some(path) => InMemoryStore::load_json(path)
            .with_context(|| format!("Failed to load snapshot {}", path.display()))?,
        None => {
            tracing::info!("No snapshot configured, seeding demo ledger");
            demo_store()?
        }
    };

    let currency = config.display.currency;
    let store: Arc<dyn GroupStore> = Arc::new(store);
    let engine = SettlementEngine::new(config, Arc::clone(&store))?;

    for summary in engine.all_summaries()? {
        print_summary(&*store, &summary, currency)?;
    }

    let metrics = engine.metrics().gather_text()?;
    tracing::debug!(%metrics, "Final metrics");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Weekend trip and a flat share
fn demo_store() -> anyhow::Result<InMemoryStore> {
    fn names(list: &[&str]) -> Vec<MemberName> {
        list.iter().copied().map(MemberName::from).collect()
    }

    let store = InMemoryStore::new();

    let trip = store.create_group("Weekend Trip", names(&["John", "Sarah", "Mike", "Anna"]))?;
    store.add_transaction(
        trip.id,
        TransactionDraft::expense(
            "Dinner",
            Decimal::new(2500, 0),
            "John",
            ["John", "Sarah", "Mike", "Anna"],
        ),
    )?;
    store.add_transaction(
        trip.id,
        TransactionDraft::expense("Taxi", Decimal::new(800, 0), "Sarah", ["Sarah", "Mike"]),
    )?;
    store.add_transaction(
        trip.id,
        TransactionDraft::settlement("Mike", "John", Decimal::new(500, 0)),
    )?;

    let flat = store.create_group("Roommates", names(&["You", "Alex", "Chris"]))?;
    store.add_transaction(
        flat.id,
        TransactionDraft::expense("Groceries", Decimal::new(100, 0), "Alex", ["You", "Alex", "Chris"]),
    )?;

    Ok(store)
}

fn print_summary(
    store: &dyn GroupStore,
    summary: &GroupSummary,
    currency: Currency,
) -> anyhow::Result<()> {
    let group = &summary.group;
    let now = chrono::Local::now();

    println!(
        "{} ({} members, {} transactions, total {})",
        group.name,
        group.members.len(),
        summary.transaction_count,
        format_currency(group.total_expenses, currency)
    );

    println!("  Transactions:");
    for txn in store.list_transactions(group.id)? {
        println!(
            "    {:<28} {:>14}  {:<8} {}",
            txn.description,
            format_currency(txn.amount, currency),
            txn.paid_by,
            format_relative(&txn.created_at, &now)
        );
    }

    println!("  Balances:");
    for balance in &summary.balances {
        println!(
            "    {:<10} paid {:>14}  owes {:>14}  net {:>15}",
            balance.member,
            format_currency(balance.paid, currency),
            format_currency(balance.owes, currency),
            format_balance(balance.net_balance, currency)
        );
    }

    if summary.plan.transfers.is_empty() {
        println!("  All settled up");
    } else {
        println!("  Suggested settlements:");
        for transfer in &summary.plan.transfers {
            println!(
                "    {} → {}  {}",
                transfer.from,
                transfer.to,
                format_currency(transfer.amount, currency)
            );
        }
    }

    if let Some(imbalance) = &summary.plan.imbalance {
        println!("  Warning: ledger does not balance ({})", imbalance);
    }

    println!();
    Ok(())
}
