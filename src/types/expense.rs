//! Expense Types
//!
//! The persisted entity, the inputs accepted by the service, and the
//! read model returned over HTTP.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::cents_to_amount;
use super::patch::Patch;

/// ISO-8601 calendar date format used on the wire and in storage
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A recorded expense, as stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    /// Store-assigned identity, strictly increasing
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    /// Amount in cents, never negative
    pub amount_cents: i64,
    /// cash, card, transfer, ...
    pub payment_method: String,
    /// Building level the expense belongs to
    pub floor: Option<String>,
    pub notes: Option<String>,
    /// Public path of the uploaded proof of payment
    pub proof_url: Option<String>,
}

/// A validated expense that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewExpense {
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount_cents: i64,
    pub payment_method: String,
    pub floor: Option<String>,
    pub notes: Option<String>,
    pub proof_url: Option<String>,
}

impl NewExpense {
    /// Attach the store-assigned id
    pub fn with_id(self, id: i64) -> Expense {
        Expense {
            id,
            date: self.date,
            name: self.name,
            category: self.category,
            amount_cents: self.amount_cents,
            payment_method: self.payment_method,
            floor: self.floor,
            notes: self.notes,
            proof_url: self.proof_url,
        }
    }
}

/// Validated field-level changes handed to the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpensePatch {
    pub date: Patch<NaiveDate>,
    pub name: Patch<String>,
    pub category: Patch<String>,
    pub amount_cents: Patch<i64>,
    pub payment_method: Patch<String>,
    pub floor: Patch<Option<String>>,
    pub notes: Patch<Option<String>>,
    pub proof_url: Patch<Option<String>>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        !(self.date.is_present()
            || self.name.is_present()
            || self.category.is_present()
            || self.amount_cents.is_present()
            || self.payment_method.is_present()
            || self.floor.is_present()
            || self.notes.is_present()
            || self.proof_url.is_present())
    }

    /// Merge the present fields into `expense`
    pub fn apply(self, expense: &mut Expense) {
        self.date.apply_to(&mut expense.date);
        self.name.apply_to(&mut expense.name);
        self.category.apply_to(&mut expense.category);
        self.amount_cents.apply_to(&mut expense.amount_cents);
        self.payment_method.apply_to(&mut expense.payment_method);
        self.floor.apply_to(&mut expense.floor);
        self.notes.apply_to(&mut expense.notes);
        self.proof_url.apply_to(&mut expense.proof_url);
    }
}

/// Create input as received from a client (JSON body or form fields)
#[derive(Debug, Clone, Deserialize)]
pub struct ExpenseDraft {
    /// YYYY-MM-DD
    pub date: String,
    pub name: String,
    pub category: String,
    /// Decimal currency amount
    pub amount: f64,
    pub payment_method: String,
    #[serde(default)]
    pub floor: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Update input as received from a client; every field optional
#[derive(Debug, Clone, Default)]
pub struct ExpenseChanges {
    pub date: Patch<String>,
    pub name: Patch<String>,
    pub category: Patch<String>,
    /// Raw amount text, validated by the service
    pub amount: Patch<String>,
    pub payment_method: Patch<String>,
    pub floor: Patch<String>,
    /// An empty string clears the notes
    pub notes: Patch<String>,
}

/// An uploaded proof-of-payment file
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Expense as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRead {
    pub id: i64,
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    pub amount: f64,
    pub payment_method: String,
    pub floor: Option<String>,
    pub notes: Option<String>,
    pub proof_url: Option<String>,
}

impl From<&Expense> for ExpenseRead {
    fn from(e: &Expense) -> Self {
        Self {
            id: e.id,
            date: e.date,
            name: e.name.clone(),
            category: e.category.clone(),
            amount: cents_to_amount(e.amount_cents),
            payment_method: e.payment_method.clone(),
            floor: e.floor.clone(),
            notes: e.notes.clone(),
            proof_url: e.proof_url.clone(),
        }
    }
}

impl From<Expense> for ExpenseRead {
    fn from(e: Expense) -> Self {
        Self::from(&e)
    }
}
