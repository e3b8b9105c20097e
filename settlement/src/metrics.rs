//! Metrics collection for observability
//!
//! Prometheus counters owned by a [`SettlementEngine`](crate::SettlementEngine).
//! Each collector has its own registry, so several engines can live in one
//! process.
//!
//! # Metrics
//!
//! - `splitledger_balance_computations_total` - Balance aggregations run
//! - `splitledger_suggested_transfers_total` - Transfers suggested by the minimizer
//! - `splitledger_unbalanced_ledgers_total` - Plans that left residual balances
//! - `splitledger_invalid_transactions_total` - Ledgers rejected by the aggregator
//! - `splitledger_settlements_recorded_total` - Settlements recorded through the engine

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use std::fmt;
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Balance aggregations run
    pub balance_computations: IntCounter,

    /// Transfers suggested
    pub suggested_transfers: IntCounter,

    /// Plans with a residual imbalance
    pub unbalanced_ledgers: IntCounter,

    /// Aggregations that failed on a malformed transaction
    pub invalid_transactions: IntCounter,

    /// Settlements recorded
    pub settlements_recorded: IntCounter,

    /// Prometheus registry
    registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let balance_computations = counter(
            &registry,
            "splitledger_balance_computations_total",
            "Total number of balance aggregations",
        )?;

        let suggested_transfers = counter(
            &registry,
            "splitledger_suggested_transfers_total",
            "Total number of suggested transfers",
        )?;

        let unbalanced_ledgers = counter(
            &registry,
            "splitledger_unbalanced_ledgers_total",
            "Total number of settlement plans with residual balances",
        )?;

        let invalid_transactions = counter(
            &registry,
            "splitledger_invalid_transactions_total",
            "Total number of ledgers rejected for a malformed transaction",
        )?;

        let settlements_recorded = counter(
            &registry,
            "splitledger_settlements_recorded_total",
            "Total number of settlements recorded",
        )?;

        Ok(Self {
            balance_computations,
            suggested_transfers,
            unbalanced_ledgers,
            invalid_transactions,
            settlements_recorded,
            registry,
        })
    }

    /// Record a successful aggregation
    pub fn record_balance_computation(&self) {
        self.balance_computations.inc();
    }

    /// Record a minimizer run
    pub fn record_plan(&self, transfers: usize, balanced: bool) {
        self.suggested_transfers.inc_by(transfers as u64);
        if !balanced {
            self.unbalanced_ledgers.inc();
        }
    }

    /// Record an aggregation rejected for a malformed transaction
    pub fn record_invalid_transaction(&self) {
        self.invalid_transactions.inc();
    }

    /// Record a settlement written to the store
    pub fn record_settlement(&self) {
        self.settlements_recorded.inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the Prometheus text format
    pub fn gather_text(&self) -> crate::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer)
            .map_err(|e| prometheus::Error::Msg(format!("Non UTF-8 metrics output: {}", e)).into())
    }
}

fn counter(registry: &Registry, name: &str, help: &str) -> prometheus::Result<IntCounter> {
    let counter = IntCounter::new(name, help)?;
    registry.register(Box::new(counter.clone()))?;
    Ok(counter)
}

impl fmt::Debug for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Metrics")
            .field("balance_computations", &self.balance_computations.get())
            .field("suggested_transfers", &self.suggested_transfers.get())
            .field("unbalanced_ledgers", &self.unbalanced_ledgers.get())
            .field("invalid_transactions", &self.invalid_transactions.get())
            .field("settlements_recorded", &self.settlements_recorded.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.balance_computations.get(), 0);
        assert_eq!(metrics.suggested_transfers.get(), 0);
    }

    #[test]
    fn test_independent_registries() {
        // A global registry would reject the second set of names
        let first = Metrics::new().unwrap();
        let second = Metrics::new().unwrap();

        first.record_balance_computation();
        assert_eq!(first.balance_computations.get(), 1);
        assert_eq!(second.balance_computations.get(), 0);
    }

    #[test]
    fn test_record_plan() {
        let metrics = Metrics::new().unwrap();

        metrics.record_plan(3, true);
        metrics.record_plan(1, false);

        assert_eq!(metrics.suggested_transfers.get(), 4);
        assert_eq!(metrics.unbalanced_ledgers.get(), 1);
    }

    #[test]
    fn test_gather_text() {
        let metrics = Metrics::new().unwrap();
        metrics.record_invalid_transaction();
        metrics.record_settlement();

        let text = metrics.gather_text().unwrap();
        assert!(text.contains("splitledger_invalid_transactions_total 1"));
        assert!(text.contains("splitledger_settlements_recorded_total 1"));
        assert!(text.contains("# HELP splitledger_balance_computations_total"));
    }

    #[test]
    fn test_debug_shows_counts() {
        let metrics = Metrics::new().unwrap();
        metrics.record_plan(2, true);

        let shown = format!("{metrics:?}");
        assert!(shown.contains("suggested_transfers: 2"));
    }
}
