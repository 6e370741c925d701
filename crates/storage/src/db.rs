use hearth_core::{FinanceError, Money};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub type DbPool = Pool<Sqlite>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt row in {table}: {detail}")]
    CorruptRow { table: &'static str, detail: String },
    #[error("Amount {0} is too large to store")]
    AmountOutOfRange(Money),
}

impl From<StorageError> for FinanceError {
    fn from(e: StorageError) -> Self {
        match &e {
            StorageError::AmountOutOfRange(_) => FinanceError::Validation(e.to_string()),
            _ => FinanceError::Storage(e.to_string()),
        }
    }
}

pub(crate) fn corrupt(table: &'static str, detail: impl ToString) -> StorageError {
    StorageError::CorruptRow {
        table,
        detail: detail.to_string(),
    }
}

pub(crate) fn to_cents(amount: Money) -> Result<i64, StorageError> {
    amount
        .to_cents()
        .ok_or(StorageError::AmountOutOfRange(amount))
}

pub async fn create_db(path: &Path, max_connections: u32) -> Result<DbPool, StorageError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .pragma("cache_size", "-32000");

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;
    tracing::info!(path = %path.display(), "Database ready");

    Ok(pool)
}

async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS households (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS family_members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            relationship TEXT NOT NULL,
            birth_date TEXT,
            gender TEXT,
            employment_status TEXT,
            school_start_age INTEGER,
            retirement_age INTEGER,
            memo TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            category_type TEXT NOT NULL,
            name TEXT NOT NULL,
            parent_type TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS credit_cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            brand TEXT NOT NULL,
            closing_day INTEGER NOT NULL CHECK (closing_day BETWEEN 1 AND 31),
            payment_day INTEGER NOT NULL CHECK (payment_day BETWEEN 1 AND 31),
            limit_cents INTEGER,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            user_id INTEGER,
            transaction_type TEXT NOT NULL CHECK (transaction_type IN ('income', 'expense', 'transfer')),
            category_id INTEGER,
            amount_cents INTEGER NOT NULL,
            occurred_date TEXT NOT NULL,
            payment_method_id INTEGER,
            card_id INTEGER,
            emoney_type TEXT,
            account_id INTEGER,
            from_account_id INTEGER,
            to_account_id INTEGER,
            memo TEXT,
            receipt_path TEXT,
            created_at TEXT NOT NULL,
            FOREIGN KEY (household_id) REFERENCES households(id),
            FOREIGN KEY (user_id) REFERENCES family_members(id),
            FOREIGN KEY (category_id) REFERENCES categories(id),
            FOREIGN KEY (card_id) REFERENCES credit_cards(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_transactions_household_date ON transactions (household_id, occurred_date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS budget_plans (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            total_cents INTEGER NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS fixed_costs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS salaries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            household_id INTEGER NOT NULL,
            amount_cents INTEGER NOT NULL,
            pay_date TEXT NOT NULL,
            description TEXT,
            FOREIGN KEY (household_id) REFERENCES households(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS card_statements (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            card_name TEXT NOT NULL,
            month TEXT NOT NULL,
            closing_date TEXT NOT NULL,
            payment_due TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS card_statement_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            statement_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            FOREIGN KEY (statement_id) REFERENCES card_statements(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Handle that the services hold; cloning shares the underlying pool.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: DbPool,
}

impl SqliteStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use tempfile::TempDir;

    /// A fresh database in its own temp dir. Keep the `TempDir` alive for the test's duration.
    pub async fn fresh_db() -> (TempDir, DbPool) {
        let dir = tempfile::tempdir().unwrap();
        let pool = create_db(&dir.path().join("test.db"), 1).await.unwrap();
        (dir, pool)
    }
}
