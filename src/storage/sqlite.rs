//! SQLite Persistent Storage for Expenses
//!
//! Provides durable storage for expense records that survives service restarts.
//! Uses connection pooling via r2d2 for concurrent access. File databases run
//! in WAL mode so readers are never blocked by the single in-flight writer.

use async_trait::async_trait;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, ToSql};
use std::path::Path;
use std::time::Duration;

use super::traits::{ExpenseStore, StorageError, StorageResult};
use crate::types::expense::{Expense, ExpensePatch, NewExpense};
use crate::types::patch::Patch;

const SELECT_COLUMNS: &str =
    "id, date, name, category, amount_cents, payment_method, floor, notes, proof_url";

/// SQLite-backed expense store with connection pooling
pub struct SqliteExpenseStore {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteExpenseStore {
    /// Create a new store with the given database path
    ///
    /// Creates the database file and runs migrations if needed.
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, StorageError> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StorageError::Connection(e.to_string()))?;
            }
        }

        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            // journal_mode answers with the resulting mode, so it has to be queried
            conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get::<_, String>(0))?;
            // synchronous=FULL: a commit is on disk before the call returns
            conn.pragma_update(None, "synchronous", "FULL")?;
            conn.busy_timeout(Duration::from_secs(5))
        });
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        tracing::info!(target: "ledger::storage", "SQLite expense store ready");
        Ok(store)
    }

    /// Create an in-memory store (for testing)
    pub fn in_memory() -> Result<Self, StorageError> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let store = Self { pool };
        store.run_migrations()?;

        Ok(store)
    }

    /// Get a connection from the pool
    fn conn(&self) -> Result<PooledConnection<SqliteConnectionManager>, StorageError> {
        self.pool
            .get()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        // AUTOINCREMENT keeps ids from being reused after the highest row is gone
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                name TEXT NOT NULL,
                category TEXT NOT NULL,
                amount_cents INTEGER NOT NULL CHECK (amount_cents >= 0),
                payment_method TEXT NOT NULL,
                floor TEXT,
                notes TEXT,
                proof_url TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_date_id ON expenses(date DESC, id DESC);
            "#,
        )
        .map_err(db_error)?;

        Ok(())
    }

    /// Convert a database row to Expense
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Expense> {
        Ok(Expense {
            id: row.get("id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            category: row.get("category")?,
            amount_cents: row.get("amount_cents")?,
            payment_method: row.get("payment_method")?,
            floor: row.get("floor")?,
            notes: row.get("notes")?,
            proof_url: row.get("proof_url")?,
        })
    }

    fn select_by_id(conn: &rusqlite::Connection, id: i64) -> Result<Option<Expense>, StorageError> {
        conn.query_row(
            &format!("SELECT {} FROM expenses WHERE id = ?1", SELECT_COLUMNS),
            params![id],
            Self::row_to_record,
        )
        .optional()
        .map_err(db_error)
    }

    // Synchronous helper methods for the trait implementations

    fn create_sync(&self, expense: NewExpense) -> Result<Expense, StorageError> {
        if expense.amount_cents < 0 {
            return Err(StorageError::InvalidData(format!(
                "negative amount_cents: {}",
                expense.amount_cents
            )));
        }

        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO expenses (
                date, name, category, amount_cents, payment_method,
                floor, notes, proof_url
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                expense.date,
                expense.name,
                expense.category,
                expense.amount_cents,
                expense.payment_method,
                expense.floor,
                expense.notes,
                expense.proof_url,
            ],
        )
        .map_err(db_error)?;

        let id = conn.last_insert_rowid();
        Ok(expense.with_id(id))
    }

    fn get_sync(&self, id: i64) -> Result<Option<Expense>, StorageError> {
        let conn = self.conn()?;
        Self::select_by_id(&conn, id)
    }

    fn list_all_sync(&self) -> Result<Vec<Expense>, StorageError> {
        let conn = self.conn()?;

        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM expenses ORDER BY date DESC, id DESC",
                SELECT_COLUMNS
            ))
            .map_err(db_error)?;

        let records = stmt
            .query_map([], Self::row_to_record)
            .map_err(db_error)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_error)?;

        Ok(records)
    }

    fn update_sync(&self, id: i64, patch: ExpensePatch) -> Result<Expense, StorageError> {
        if let Patch::Present(cents) = patch.amount_cents {
            if cents < 0 {
                return Err(StorageError::InvalidData(format!(
                    "negative amount_cents: {}",
                    cents
                )));
            }
        }

        if patch.is_empty() {
            return self.get_sync(id)?.ok_or(StorageError::NotFound(id));
        }

        let mut columns: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        push_column(&mut columns, &mut values, "date", patch.date);
        push_column(&mut columns, &mut values, "name", patch.name);
        push_column(&mut columns, &mut values, "category", patch.category);
        push_column(&mut columns, &mut values, "amount_cents", patch.amount_cents);
        push_column(&mut columns, &mut values, "payment_method", patch.payment_method);
        push_column(&mut columns, &mut values, "floor", patch.floor);
        push_column(&mut columns, &mut values, "notes", patch.notes);
        push_column(&mut columns, &mut values, "proof_url", patch.proof_url);

        let mut conn = self.conn()?;
        let tx = conn.transaction().map_err(db_error)?;

        let assignments = columns
            .iter()
            .enumerate()
            .map(|(i, column)| format!("{} = ?{}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE expenses SET {} WHERE id = ?{}",
            assignments,
            columns.len() + 1
        );

        values.push(Box::new(id));
        let param_refs: Vec<&dyn ToSql> = values.iter().map(|v| v.as_ref()).collect();

        let rows_affected = tx
            .execute(&sql, param_refs.as_slice())
            .map_err(db_error)?;
        if rows_affected == 0 {
            return Err(StorageError::NotFound(id));
        }

        let record = Self::select_by_id(&tx, id)?.ok_or(StorageError::NotFound(id))?;
        tx.commit().map_err(db_error)?;

        Ok(record)
    }
}

fn push_column<T: ToSql + 'static>(
    columns: &mut Vec<&'static str>,
    values: &mut Vec<Box<dyn ToSql>>,
    column: &'static str,
    patch: Patch<T>,
) {
    if let Patch::Present(value) = patch {
        columns.push(column);
        values.push(Box::new(value));
    }
}

fn db_error(e: rusqlite::Error) -> StorageError {
    StorageError::Database(e.to_string())
}

#[async_trait]
impl ExpenseStore for SqliteExpenseStore {
    async fn create(&self, expense: NewExpense) -> StorageResult<Expense> {
        self.create_sync(expense)
    }

    async fn get(&self, id: i64) -> StorageResult<Option<Expense>> {
        self.get_sync(id)
    }

    async fn list_all(&self) -> StorageResult<Vec<Expense>> {
        self.list_all_sync()
    }

    async fn update(&self, id: i64, patch: ExpensePatch) -> StorageResult<Expense> {
        self.update_sync(id, patch)
    }
}
