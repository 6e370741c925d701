use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::{
    CashflowSummary, CategoryId, FinanceResult, HouseholdId, Money, Transaction, TransactionId,
    TransactionStore,
};

use crate::db::{corrupt, to_cents, DbPool, SqliteStore, StorageError};

const SELECT_COLUMNS: &str = "SELECT id, household_id, user_id, transaction_type, category_id, amount_cents, occurred_date, \
     payment_method_id, card_id, emoney_type, account_id, from_account_id, to_account_id, memo, receipt_path, created_at \
     FROM transactions";

#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: i64,
    household_id: i64,
    user_id: Option<i64>,
    transaction_type: String,
    category_id: Option<i64>,
    amount_cents: i64,
    occurred_date: NaiveDate,
    payment_method_id: Option<i64>,
    card_id: Option<i64>,
    emoney_type: Option<String>,
    account_id: Option<i64>,
    from_account_id: Option<i64>,
    to_account_id: Option<i64>,
    memo: Option<String>,
    receipt_path: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = StorageError;

    fn try_from(r: TransactionRow) -> Result<Self, Self::Error> {
        let transaction_type = r
            .transaction_type
            .parse()
            .map_err(|e| corrupt("transactions", e))?;
        Ok(Transaction {
            id: Some(TransactionId(r.id)),
            household_id: HouseholdId(r.household_id),
            user_id: r.user_id,
            transaction_type,
            category_id: r.category_id.map(CategoryId),
            amount: Money::from_cents(r.amount_cents),
            occurred_date: r.occurred_date,
            payment_method_id: r.payment_method_id,
            card_id: r.card_id,
            emoney_type: r.emoney_type,
            account_id: r.account_id,
            from_account_id: r.from_account_id,
            to_account_id: r.to_account_id,
            memo: r.memo,
            receipt_path: r.receipt_path,
            created_at: Some(r.created_at),
        })
    }
}

pub async fn insert_transaction(
    pool: &DbPool,
    tx: &Transaction,
) -> Result<Transaction, StorageError> {
    let amount_cents = to_cents(tx.amount)?;
    let created_at = Utc::now();

    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO transactions (
            household_id, user_id, transaction_type, category_id, amount_cents, occurred_date,
            payment_method_id, card_id, emoney_type, account_id, from_account_id, to_account_id,
            memo, receipt_path, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(tx.household_id.0)
    .bind(tx.user_id)
    .bind(tx.transaction_type.as_str())
    .bind(tx.category_id.map(|c| c.0))
    .bind(amount_cents)
    .bind(tx.occurred_date)
    .bind(tx.payment_method_id)
    .bind(tx.card_id)
    .bind(&tx.emoney_type)
    .bind(tx.account_id)
    .bind(tx.from_account_id)
    .bind(tx.to_account_id)
    .bind(&tx.memo)
    .bind(&tx.receipt_path)
    .bind(created_at)
    .fetch_one(pool)
    .await?;

    Ok(Transaction {
        id: Some(TransactionId(id)),
        created_at: Some(created_at),
        ..tx.clone()
    })
}

pub async fn get_transactions_for_period(
    pool: &DbPool,
    household_id: HouseholdId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Transaction>, StorageError> {
    let rows = sqlx::query_as::<_, TransactionRow>(&format!(
        "{SELECT_COLUMNS} WHERE household_id = ? AND occurred_date >= ? AND occurred_date <= ? ORDER BY occurred_date, id"
    ))
    .bind(household_id.0)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(Transaction::try_from).collect()
}

/// Grouped income and expense sums for the inclusive date range. Transfers do not count.
pub async fn sum_by_type(
    pool: &DbPool,
    household_id: HouseholdId,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<CashflowSummary, StorageError> {
    let (income_cents, expense_cents) = sqlx::query_as::<_, (i64, i64)>(
        r#"
        SELECT
            COALESCE(SUM(CASE WHEN transaction_type = 'income' THEN amount_cents END), 0) AS income_cents,
            COALESCE(SUM(CASE WHEN transaction_type = 'expense' THEN amount_cents END), 0) AS expense_cents
        FROM transactions
        WHERE household_id = ? AND occurred_date >= ? AND occurred_date <= ?
        "#,
    )
    .bind(household_id.0)
    .bind(start)
    .bind(end)
    .fetch_one(pool)
    .await?;

    Ok(CashflowSummary::from_totals(
        Money::from_cents(income_cents),
        Money::from_cents(expense_cents),
    ))
}

impl TransactionStore for SqliteStore {
    async fn save(&self, tx: Transaction) -> FinanceResult<Transaction> {
        Ok(insert_transaction(self.pool(), &tx).await?)
    }

    async fn find_by_household_and_period(
        &self,
        household_id: HouseholdId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FinanceResult<Vec<Transaction>> {
        Ok(get_transactions_for_period(self.pool(), household_id, start, end).await?)
    }

    async fn sum_by_type(
        &self,
        household_id: HouseholdId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FinanceResult<CashflowSummary> {
        Ok(sum_by_type(self.pool(), household_id, start, end).await?)
    }
}
