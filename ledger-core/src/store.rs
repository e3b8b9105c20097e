//! Persistence interface and the in-memory store
//!
//! Callers hold an explicit store handle (`Arc<dyn GroupStore>`) instead of
//! reaching into shared module state. The in-memory implementation keeps
//! everything behind one `RwLock`, so every operation sees a consistent
//! snapshot; concurrent editors of one group are last-writer-wins.
//!
//! `Group::total_expenses` is maintained additively here: each create, update
//! and delete adjusts it by the amount delta and it is never recomputed.

use crate::{
    types::{Group, Member, MemberName, Snapshot, Transaction, TransactionDraft},
    validation::{validate_draft, validate_roster},
    Error, Result,
};
use parking_lot::RwLock;
use std::path::Path;
use uuid::Uuid;

/// Abstraction over group/member/transaction persistence
pub trait GroupStore: Send + Sync {
    /// All directory members
    fn list_members(&self) -> Result<Vec<Member>>;

    /// Add a member to the directory
    fn add_member(&self, name: MemberName) -> Result<Member>;

    /// All groups
    fn list_groups(&self) -> Result<Vec<Group>>;

    /// Create a group with an initial roster
    fn create_group(&self, name: &str, members: Vec<MemberName>) -> Result<Group>;

    /// Get group by ID
    fn get_group(&self, group_id: Uuid) -> Result<Group>;

    /// Rename a group and replace its roster
    ///
    /// Fails with `MembersInUse` if a removed member still appears in one of
    /// the group's transactions.
    fn edit_group(&self, group_id: Uuid, name: &str, members: Vec<MemberName>) -> Result<Group>;

    /// Delete a group together with its transactions
    fn delete_group(&self, group_id: Uuid) -> Result<()>;

    /// Transactions of a group, oldest first
    fn list_transactions(&self, group_id: Uuid) -> Result<Vec<Transaction>>;

    /// Validate and record a new transaction
    fn add_transaction(&self, group_id: Uuid, draft: TransactionDraft) -> Result<Transaction>;

    /// Replace the editable fields of a transaction (its kind is kept)
    fn update_transaction(
        &self,
        group_id: Uuid,
        transaction_id: Uuid,
        draft: TransactionDraft,
    ) -> Result<Transaction>;

    /// Remove a transaction
    fn delete_transaction(&self, group_id: Uuid, transaction_id: Uuid) -> Result<()>;

    /// True when `member` paid or shares any transaction of the group
    fn is_member_in_group_transactions(&self, group_id: Uuid, member: &MemberName)
        -> Result<bool>;
}

/// In-memory store
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<Snapshot>,
}

impl InMemoryStore {
    /// Create empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create store from a snapshot
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        tracing::info!(
            members = snapshot.members.len(),
            groups = snapshot.groups.len(),
            transactions = snapshot.transactions.len(),
            "Loaded ledger snapshot"
        );
        Self {
            state: RwLock::new(snapshot),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Snapshot {
        self.state.read().clone()
    }

    /// Load a JSON snapshot file
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the current state as pretty JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn find_group(state: &Snapshot, group_id: Uuid) -> Result<&Group> {
    state
        .groups
        .iter()
        .find(|g| g.id == group_id)
        .ok_or(Error::GroupNotFound(group_id))
}

fn find_group_mut(state: &mut Snapshot, group_id: Uuid) -> Result<&mut Group> {
    state
        .groups
        .iter_mut()
        .find(|g| g.id == group_id)
        .ok_or(Error::GroupNotFound(group_id))
}

fn transaction_index(state: &Snapshot, group_id: Uuid, transaction_id: Uuid) -> Result<usize> {
    state
        .transactions
        .iter()
        .position(|t| t.id == transaction_id && t.group_id == group_id)
        .ok_or(Error::TransactionNotFound {
            group_id,
            transaction_id,
        })
}

fn member_in_transactions(state: &Snapshot, group_id: Uuid, member: &MemberName) -> bool {
    state
        .transactions
        .iter()
        .any(|t| t.group_id == group_id && t.involves(member))
}

impl GroupStore for InMemoryStore {
    fn list_members(&self) -> Result<Vec<Member>> {
        Ok(self.state.read().members.clone())
    }

    fn add_member(&self, name: MemberName) -> Result<Member> {
        if name.is_blank() {
            return Err(Error::InvalidMember(
                "member name must not be empty".to_string(),
            ));
        }

        let mut state = self.state.write();
        if state.members.iter().any(|m| m.name == name) {
            return Err(Error::DuplicateMember(name));
        }

        let member = Member {
            id: Uuid::now_v7(),
            name,
        };
        state.members.push(member.clone());

        tracing::debug!(member_id = %member.id, name = %member.name, "Member added");
        Ok(member)
    }

    fn list_groups(&self) -> Result<Vec<Group>> {
        Ok(self.state.read().groups.clone())
    }

    fn create_group(&self, name: &str, members: Vec<MemberName>) -> Result<Group> {
        validate_roster(name, &members)?;

        let group = Group::new(name.trim(), members);
        self.state.write().groups.push(group.clone());

        tracing::info!(
            group_id = %group.id,
            members = group.members.len(),
            "Group created"
        );
        Ok(group)
    }

    fn get_group(&self, group_id: Uuid) -> Result<Group> {
        find_group(&self.state.read(), group_id).cloned()
    }

    fn edit_group(&self, group_id: Uuid, name: &str, members: Vec<MemberName>) -> Result<Group> {
        validate_roster(name, &members)?;

        let mut state = self.state.write();
        let current = find_group(&state, group_id)?;

        let in_use: Vec<MemberName> = current
            .members
            .iter()
            .filter(|m| !members.contains(m))
            .filter(|m| member_in_transactions(&state, group_id, m))
            .cloned()
            .collect();

        if !in_use.is_empty() {
            tracing::warn!(
                group_id = %group_id,
                members = ?in_use,
                "Refusing to remove members referenced by transactions"
            );
            return Err(Error::MembersInUse { members: in_use });
        }

        let group = find_group_mut(&mut state, group_id)?;
        group.name = name.trim().to_string();
        group.members = members;

        tracing::info!(group_id = %group_id, members = group.members.len(), "Group edited");
        Ok(group.clone())
    }

    fn delete_group(&self, group_id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let index = state
            .groups
            .iter()
            .position(|g| g.id == group_id)
            .ok_or(Error::GroupNotFound(group_id))?;

        state.groups.remove(index);
        let before = state.transactions.len();
        state.transactions.retain(|t| t.group_id != group_id);

        tracing::info!(
            group_id = %group_id,
            transactions_removed = before - state.transactions.len(),
            "Group deleted"
        );
        Ok(())
    }

    fn list_transactions(&self, group_id: Uuid) -> Result<Vec<Transaction>> {
        let state = self.state.read();
        find_group(&state, group_id)?;

        let mut transactions: Vec<Transaction> = state
            .transactions
            .iter()
            .filter(|t| t.group_id == group_id)
            .cloned()
            .collect();
        transactions.sort_by_key(|t| t.created_at);
        Ok(transactions)
    }

    fn add_transaction(&self, group_id: Uuid, draft: TransactionDraft) -> Result<Transaction> {
        let mut state = self.state.write();
        let group = find_group_mut(&mut state, group_id)?;
        validate_draft(group, &draft)?;

        let transaction = Transaction::from_draft(group_id, draft);
        group.total_expenses += transaction.amount;
        state.transactions.push(transaction.clone());

        tracing::debug!(
            group_id = %group_id,
            transaction_id = %transaction.id,
            kind = %transaction.kind,
            amount = %transaction.amount,
            "Transaction added"
        );
        Ok(transaction)
    }

    fn update_transaction(
        &self,
        group_id: Uuid,
        transaction_id: Uuid,
        mut draft: TransactionDraft,
    ) -> Result<Transaction> {
        let mut state = self.state.write();
        let index = transaction_index(&state, group_id, transaction_id)?;
        draft.kind = state.transactions[index].kind;
        let old_amount = state.transactions[index].amount;

        let group = find_group_mut(&mut state, group_id)?;
        validate_draft(group, &draft)?;
        group.total_expenses = group.total_expenses - old_amount + draft.amount;

        let transaction = &mut state.transactions[index];
        transaction.description = draft.description;
        transaction.amount = draft.amount;
        transaction.paid_by = draft.paid_by;
        transaction.split_between = draft.split_between;

        tracing::debug!(
            group_id = %group_id,
            transaction_id = %transaction_id,
            amount = %transaction.amount,
            "Transaction updated"
        );
        Ok(transaction.clone())
    }

    fn delete_transaction(&self, group_id: Uuid, transaction_id: Uuid) -> Result<()> {
        let mut state = self.state.write();
        let index = transaction_index(&state, group_id, transaction_id)?;
        let removed = state.transactions.remove(index);

        if let Ok(group) = find_group_mut(&mut state, group_id) {
            group.total_expenses -= removed.amount;
        }

        tracing::debug!(
            group_id = %group_id,
            transaction_id = %transaction_id,
            "Transaction deleted"
        );
        Ok(())
    }

    fn is_member_in_group_transactions(
        &self,
        group_id: Uuid,
        member: &MemberName,
    ) -> Result<bool> {
        let state = self.state.read();
        find_group(&state, group_id)?;
        Ok(member_in_transactions(&state, group_id, member))
    }
}
