//! Expense endpoints
//!
//! - GET  /api/expenses?q=     - List (newest first), optionally filtered
//! - POST /api/expenses        - Create from JSON
//! - POST /api/expenses/upload - Create from a multipart form with optional file
//! - GET  /api/expenses/stats  - Aggregate statistics
//! - GET  /api/expenses/:id    - Fetch one
//! - PUT  /api/expenses/:id    - Partial update from a multipart form

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::collections::HashMap;

use crate::api::error::ApiError;
use crate::api::server::SharedAppState;
use crate::expenses::ExpenseError;
use crate::types::{
    parse_amount, ExpenseChanges, ExpenseDraft, ExpenseRead, ExpenseStats, Upload,
};

/// Multipart field carrying the proof-of-payment file
const FILE_FIELD: &str = "file";

pub fn router() -> Router<SharedAppState> {
    Router::new()
        .route("/api/expenses", get(list_expenses).post(create_expense))
        .route("/api/expenses/", get(list_expenses).post(create_expense))
        // Fixed paths take priority over `:id`
        .route("/api/expenses/stats", get(expense_stats))
        .route("/api/expenses/upload", post(create_expense_with_file))
        .route("/api/expenses/:id", get(get_expense).put(update_expense))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    /// Case-insensitive search over name and category
    pub q: Option<String>,
}

/// GET /api/expenses
async fn list_expenses(
    State(state): State<SharedAppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<ExpenseRead>>, ApiError> {
    let expenses = state.expenses.list(params.q.as_deref()).await?;
    Ok(Json(expenses.into_iter().map(ExpenseRead::from).collect()))
}

/// POST /api/expenses
async fn create_expense(
    State(state): State<SharedAppState>,
    payload: Result<Json<ExpenseDraft>, JsonRejection>,
) -> Result<Json<ExpenseRead>, ApiError> {
    let Json(draft) = payload?;
    let created = state.expenses.create(draft, None).await?;
    Ok(Json(created.into()))
}

/// POST /api/expenses/upload
async fn create_expense_with_file(
    State(state): State<SharedAppState>,
    multipart: Multipart,
) -> Result<Json<ExpenseRead>, ApiError> {
    let mut form = ExpenseForm::read(multipart).await?;

    let amount = form.required("amount")?;
    let draft = ExpenseDraft {
        date: form.required("date")?,
        name: form.required("name")?,
        category: form.required("category")?,
        amount: parse_amount(&amount).map_err(ExpenseError::from)?,
        payment_method: form.required("payment_method")?,
        floor: form.take("floor"),
        notes: form.take("notes"),
    };

    let created = state.expenses.create(draft, form.file).await?;
    Ok(Json(created.into()))
}

/// GET /api/expenses/stats
async fn expense_stats(
    State(state): State<SharedAppState>,
) -> Result<Json<ExpenseStats>, ApiError> {
    Ok(Json(state.expenses.stats().await?))
}

/// GET /api/expenses/:id
async fn get_expense(
    State(state): State<SharedAppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExpenseRead>, ApiError> {
    let expense = state.expenses.get(id).await?;
    Ok(Json(expense.into()))
}

/// PUT /api/expenses/:id
///
/// Only the form fields that are present are changed.
async fn update_expense(
    State(state): State<SharedAppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<Json<ExpenseRead>, ApiError> {
    let mut form = ExpenseForm::read(multipart).await?;

    let changes = ExpenseChanges {
        date: form.take("date").into(),
        name: form.take("name").into(),
        category: form.take("category").into(),
        amount: form.take("amount").into(),
        payment_method: form.take("payment_method").into(),
        floor: form.take("floor").into(),
        notes: form.take("notes").into(),
    };

    let updated = state.expenses.update(id, changes, form.file).await?;
    Ok(Json(updated.into()))
}

/// Text fields and optional file collected from a multipart body
#[derive(Debug, Default)]
struct ExpenseForm {
    fields: HashMap<String, String>,
    file: Option<Upload>,
}

impl ExpenseForm {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let filename = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await?;

                // Browsers send an empty part when no file was chosen
                if filename.is_empty() {
                    continue;
                }

                form.file = Some(Upload {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }

    fn required(&mut self, name: &str) -> Result<String, ApiError> {
        self.take(name)
            .ok_or_else(|| ApiError::bad_request(format!("Missing form field: {}", name)))
    }
}

