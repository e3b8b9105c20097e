//! Main settlement engine
//!
//! Loads a group's ledger from the store, aggregates balances and suggests
//! settlements. Recorded settlements go back through the same store.

use crate::{
    balances::{compute_balances, net_total},
    config::Config,
    metrics::Metrics,
    netting::NettingEngine,
    settle_up::SettleRequest,
    types::GroupSummary,
    Result,
};
use ledger_core::{GroupStore, Transaction};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Settlement engine
pub struct SettlementEngine {
    /// Group store
    store: Arc<dyn GroupStore>,

    /// Netting engine
    netting: NettingEngine,

    /// Metrics
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl SettlementEngine {
    /// Create new settlement engine
    pub fn new(config: Config, store: Arc<dyn GroupStore>) -> Result<Self> {
        config.validate()?;

        let netting = NettingEngine::new(config.netting.epsilon)?;
        let metrics = Metrics::new()?;

        Ok(Self {
            store,
            netting,
            metrics,
            config,
        })
    }

    /// Balances and suggested transfers for one group
    pub fn group_summary(&self, group_id: Uuid) -> Result<GroupSummary> {
        let group = self.store.get_group(group_id)?;
        let transactions = self.store.list_transactions(group_id)?;

        let balances = match compute_balances(&transactions, group.roster()) {
            Ok(balances) => balances,
            Err(err) => {
                self.metrics.record_invalid_transaction();
                tracing::warn!(group_id = %group_id, error = %err, "Ledger rejected");
                return Err(err.into());
            }
        };
        self.metrics.record_balance_computation();

        let residual = net_total(&balances);
        if residual.abs() > self.config.netting.conservation_tolerance {
            tracing::warn!(
                group_id = %group_id,
                residual = %residual,
                "Net balances do not sum to zero"
            );
        }

        let plan = self.netting.suggest(&balances);
        self.metrics.record_plan(plan.transfers.len(), plan.is_balanced());

        if let Some(imbalance) = &plan.imbalance {
            tracing::warn!(
                group_id = %group_id,
                residual_debt = %imbalance.residual_debt,
                residual_credit = %imbalance.residual_credit,
                "Settlement plan leaves residual balances"
            );
        }

        let ledger_total: Decimal = transactions.iter().map(|t| t.amount).sum();
        if ledger_total != group.total_expenses {
            tracing::debug!(
                group_id = %group_id,
                stored = %group.total_expenses,
                ledger = %ledger_total,
                "Stored total differs from ledger"
            );
        }

        tracing::info!(
            group_id = %group_id,
            members = balances.len(),
            transactions = transactions.len(),
            transfers = plan.transfers.len(),
            "Group summary computed"
        );

        Ok(GroupSummary {
            group,
            balances,
            plan,
            ledger_total,
            transaction_count: transactions.len(),
        })
    }

    /// Summaries for every group in the store
    pub fn all_summaries(&self) -> Result<Vec<GroupSummary>> {
        self.store
            .list_groups()?
            .into_iter()
            .map(|group| self.group_summary(group.id))
            .collect()
    }

    /// Record a settlement payment in a group
    pub fn record_settlement(&self, group_id: Uuid, request: SettleRequest) -> Result<Transaction> {
        let draft = match request.into_draft() {
            Ok(draft) => draft,
            Err(err) => {
                self.metrics.record_invalid_transaction();
                return Err(err.into());
            }
        };

        let transaction = self.store.add_transaction(group_id, draft)?;
        self.metrics.record_settlement();

        tracing::info!(
            group_id = %group_id,
            transaction_id = %transaction.id,
            from = %transaction.paid_by,
            amount = %transaction.amount,
            "Settlement recorded"
        );

        Ok(transaction)
    }

    /// Group store
    pub fn store(&self) -> &Arc<dyn GroupStore> {
        &self.store
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl fmt::Debug for SettlementEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("netting", &self.netting)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
