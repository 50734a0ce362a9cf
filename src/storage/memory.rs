//! In-Memory Storage Implementation
//!
//! Provides in-memory storage for testing and development.
//! Data is lost when the service restarts.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::traits::{sort_newest_first, ExpenseStore, StorageError, StorageResult};
use crate::types::expense::{Expense, ExpensePatch, NewExpense};

#[derive(Debug, Default)]
struct Inner {
    /// Last id handed out; ids start at 1
    last_id: i64,
    records: BTreeMap<i64, Expense>,
}

/// In-memory expense store
///
/// Thread-safe storage for expense records.
/// Uses Arc<RwLock<>> so readers proceed concurrently and writers are serialized.
#[derive(Clone, Default)]
pub struct MemoryExpenseStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryExpenseStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ExpenseStore for MemoryExpenseStore {
    async fn create(&self, expense: NewExpense) -> StorageResult<Expense> {
        let mut inner = self.inner.write().await;

        inner.last_id += 1;
        let record = expense.with_id(inner.last_id);
        inner.records.insert(record.id, record.clone());

        Ok(record)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Expense>> {
        let inner = self.inner.read().await;
        Ok(inner.records.get(&id).cloned())
    }

    async fn list_all(&self) -> StorageResult<Vec<Expense>> {
        let inner = self.inner.read().await;
        let mut records: Vec<Expense> = inner.records.values().cloned().collect();
        sort_newest_first(&mut records);
        Ok(records)
    }

    async fn update(&self, id: i64, patch: ExpensePatch) -> StorageResult<Expense> {
        let mut inner = self.inner.write().await;

        let record = inner
            .records
            .get_mut(&id)
            .ok_or(StorageError::NotFound(id))?;
        patch.apply(record);

        Ok(record.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::patch::Patch;
    use chrono::NaiveDate;

    fn new_expense(date: &str, name: &str) -> NewExpense {
        NewExpense {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            name: name.to_string(),
            category: "Tiles".to_string(),
            amount_cents: 5_000,
            payment_method: "Card".to_string(),
            floor: None,
            notes: None,
            proof_url: None,
        }
    }

    #[tokio::test]
    async fn test_ids_increase() {
        let store = MemoryExpenseStore::new();
        let a = store.create(new_expense("2024-01-01", "a")).await.unwrap();
        let b = store.create(new_expense("2024-01-01", "b")).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_list_order() {
        let store = MemoryExpenseStore::new();
        store.create(new_expense("2024-06-01", "june")).await.unwrap();
        store.create(new_expense("2024-01-01", "jan")).await.unwrap();
        store.create(new_expense("2024-06-01", "june again")).await.unwrap();

        let names: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["june again", "june", "jan"]);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let store = MemoryExpenseStore::new();
        let patch = ExpensePatch {
            name: Patch::Present("x".to_string()),
            ..Default::default()
        };
        let result = store.update(42, patch).await;
        assert!(matches!(result, Err(StorageError::NotFound(42))));
        assert!(store.is_empty().await);
    }
}
