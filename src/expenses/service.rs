//! Expense Service

use chrono::NaiveDate;
use std::sync::Arc;

use crate::attachments::{AttachmentError, AttachmentManager};
use crate::common::logging::log_expense_event;
use crate::storage::{ExpenseStore, StorageError};
use crate::types::{
    amount_to_cents, parse_cents, Expense, ExpenseChanges, ExpenseDraft, ExpensePatch,
    ExpenseStats, MoneyError, NewExpense, Patch, Upload, DATE_FORMAT,
};

pub type SharedExpenseService = Arc<ExpenseService>;

#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error("{0}")]
    Validation(String),

    #[error("Expense not found: {0}")]
    NotFound(i64),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl ExpenseError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Get error code for API responses
    pub fn error_code(&self) -> &'static str {
        match self {
            ExpenseError::Validation(_) => "VALIDATION_ERROR",
            ExpenseError::NotFound(_) => "NOT_FOUND",
            ExpenseError::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }
}

impl From<StorageError> for ExpenseError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(id) => ExpenseError::NotFound(id),
            other => ExpenseError::Persistence(other.to_string()),
        }
    }
}

impl From<AttachmentError> for ExpenseError {
    fn from(e: AttachmentError) -> Self {
        match e {
            AttachmentError::UnsupportedType(_) => ExpenseError::Validation(e.to_string()),
            AttachmentError::Io(_) => ExpenseError::Persistence(e.to_string()),
        }
    }
}

impl From<MoneyError> for ExpenseError {
    fn from(e: MoneyError) -> Self {
        ExpenseError::Validation(e.to_string())
    }
}

/// Expense business rules over an injected store and attachment manager
pub struct ExpenseService {
    store: Arc<dyn ExpenseStore>,
    attachments: AttachmentManager,
}

impl ExpenseService {
    pub fn new(store: Arc<dyn ExpenseStore>, attachments: AttachmentManager) -> Self {
        Self { store, attachments }
    }

    pub fn attachments(&self) -> &AttachmentManager {
        &self.attachments
    }

    /// Validate a draft, store its attachment if any, and insert it
    pub async fn create(
        &self,
        draft: ExpenseDraft,
        upload: Option<Upload>,
    ) -> Result<Expense, ExpenseError> {
        let mut expense = match Self::validate_draft(draft) {
            Ok(expense) => expense,
            Err(e) => {
                log_expense_event(
                    "expense_create_rejected",
                    None,
                    None,
                    false,
                    Some(&e.to_string()),
                );
                return Err(e);
            }
        };

        if let Some(upload) = upload {
            expense.proof_url = Some(self.store_attachment(upload).await?);
        }

        let amount_cents = expense.amount_cents;
        let created = self.store.create(expense).await.map_err(|e| {
            log_expense_event(
                "expense_create_failed",
                None,
                Some(amount_cents),
                false,
                Some(&e.to_string()),
            );
            ExpenseError::from(e)
        })?;

        log_expense_event(
            "expense_created",
            Some(created.id),
            Some(created.amount_cents),
            true,
            None,
        );
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Expense, ExpenseError> {
        self.store
            .get(id)
            .await?
            .ok_or(ExpenseError::NotFound(id))
    }

    /// All expenses newest first, optionally narrowed to those whose name or
    /// category contains `query` (case-insensitive)
    pub async fn list(&self, query: Option<&str>) -> Result<Vec<Expense>, ExpenseError> {
        let expenses = self.store.list_all().await?;

        let needle = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return Ok(expenses),
        };

        Ok(expenses
            .into_iter()
            .filter(|e| {
                e.name.to_lowercase().contains(&needle)
                    || e.category.to_lowercase().contains(&needle)
            })
            .collect())
    }

    /// Apply the supplied fields to an existing expense
    ///
    /// A missing id is reported before any field is looked at. Nothing is
    /// written (attachment included) unless every supplied field is valid.
    pub async fn update(
        &self,
        id: i64,
        changes: ExpenseChanges,
        upload: Option<Upload>,
    ) -> Result<Expense, ExpenseError> {
        if self.store.get(id).await?.is_none() {
            return Err(ExpenseError::NotFound(id));
        }

        let mut patch = match Self::validate_changes(changes) {
            Ok(patch) => patch,
            Err(e) => {
                log_expense_event(
                    "expense_update_rejected",
                    Some(id),
                    None,
                    false,
                    Some(&e.to_string()),
                );
                return Err(e);
            }
        };

        if let Some(upload) = &upload {
            if !AttachmentManager::is_allowed(&upload.content_type) {
                return Err(AttachmentError::UnsupportedType(upload.content_type.clone()).into());
            }
        }

        if let Some(upload) = upload {
            patch.proof_url = Patch::Present(Some(self.store_attachment(upload).await?));
        }

        let amount_cents = patch.amount_cents.clone().into_option();
        let updated = self.store.update(id, patch).await.map_err(|e| {
            log_expense_event(
                "expense_update_failed",
                Some(id),
                amount_cents,
                false,
                Some(&e.to_string()),
            );
            ExpenseError::from(e)
        })?;

        log_expense_event(
            "expense_updated",
            Some(id),
            Some(updated.amount_cents),
            true,
            None,
        );
        Ok(updated)
    }

    /// Aggregate statistics over every expense, computed fresh on each call
    pub async fn stats(&self) -> Result<ExpenseStats, ExpenseError> {
        let expenses = self.store.list_all().await?;
        Ok(ExpenseStats::compute(&expenses))
    }

    async fn store_attachment(&self, upload: Upload) -> Result<String, ExpenseError> {
        let attachments = self.attachments.clone();
        let reference = tokio::task::spawn_blocking(move || {
            attachments.store(&upload.filename, &upload.content_type, &upload.bytes)
        })
        .await
        .map_err(|e| ExpenseError::Persistence(format!("attachment task failed: {}", e)))??;

        Ok(reference)
    }

    fn validate_draft(draft: ExpenseDraft) -> Result<NewExpense, ExpenseError> {
        Ok(NewExpense {
            date: parse_date(&draft.date)?,
            name: require_text("name", draft.name)?,
            category: require_text("category", draft.category)?,
            amount_cents: amount_to_cents(draft.amount)?,
            payment_method: draft.payment_method,
            floor: non_empty(draft.floor),
            notes: non_empty(draft.notes),
            proof_url: None,
        })
    }

    fn validate_changes(changes: ExpenseChanges) -> Result<ExpensePatch, ExpenseError> {
        // An empty date field is how forms say "unchanged"
        let date = match changes.date {
            Patch::Present(d) if d.trim().is_empty() => Patch::Absent,
            other => other,
        };

        Ok(ExpensePatch {
            date: date.try_map(|d| parse_date(&d))?,
            name: changes.name.try_map(|n| require_text("name", n))?,
            category: changes.category.try_map(|c| require_text("category", c))?,
            amount_cents: changes.amount.try_map(|a| parse_cents(&a))?,
            payment_method: changes.payment_method,
            floor: changes.floor.map(|f| non_empty(Some(f))),
            notes: changes.notes.map(|n| non_empty(Some(n))),
            proof_url: Patch::Absent,
        })
    }
}

/// Parse an ISO-8601 calendar date (YYYY-MM-DD)
pub fn parse_date(s: &str) -> Result<NaiveDate, ExpenseError> {
    let s = s.trim();
    if s.len() == 10 {
        if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(date);
        }
    }
    Err(ExpenseError::validation(format!(
        "Invalid date {:?}; expected YYYY-MM-DD",
        s
    )))
}

/// Optional text fields store "" as absent
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn require_text(field: &str, value: String) -> Result<String, ExpenseError> {
    if value.trim().is_empty() {
        return Err(ExpenseError::validation(format!("{} must not be empty", field)));
    }
    Ok(value)
}
