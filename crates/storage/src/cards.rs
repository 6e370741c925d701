use chrono::NaiveDate;
use hearth_core::{
    CardBrand, CardStatement, CreditCard, HouseholdId, Money, StatementItem, YearMonth,
};

use crate::db::{corrupt, to_cents, DbPool, StorageError};

// ── Credit cards ──────────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
struct CardRow {
    id: i64,
    household_id: i64,
    name: String,
    brand: String,
    closing_day: i64,
    payment_day: i64,
    limit_cents: Option<i64>,
}

fn day(value: i64) -> Result<u8, StorageError> {
    u8::try_from(value).map_err(|_| corrupt("credit_cards", format!("day {value} out of range")))
}

impl TryFrom<CardRow> for CreditCard {
    type Error = StorageError;

    fn try_from(r: CardRow) -> Result<Self, Self::Error> {
        Ok(CreditCard {
            id: Some(r.id),
            household_id: HouseholdId(r.household_id),
            name: r.name,
            brand: r.brand.parse::<CardBrand>().map_err(|e| corrupt("credit_cards", e))?,
            closing_day: day(r.closing_day)?,
            payment_day: day(r.payment_day)?,
            limit_amount: r.limit_cents.map(Money::from_cents),
        })
    }
}

pub async fn insert_credit_card(
    pool: &DbPool,
    card: &CreditCard,
) -> Result<CreditCard, StorageError> {
    let limit_cents = card.limit_amount.map(to_cents).transpose()?;
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO credit_cards (household_id, name, brand, closing_day, payment_day, limit_cents)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(card.household_id.0)
    .bind(&card.name)
    .bind(card.brand.as_str())
    .bind(i64::from(card.closing_day))
    .bind(i64::from(card.payment_day))
    .bind(limit_cents)
    .fetch_one(pool)
    .await?;

    Ok(CreditCard {
        id: Some(id),
        ..card.clone()
    })
}

pub async fn get_credit_cards(
    pool: &DbPool,
    household_id: HouseholdId,
) -> Result<Vec<CreditCard>, StorageError> {
    let rows = sqlx::query_as::<_, CardRow>(
        "SELECT id, household_id, name, brand, closing_day, payment_day, limit_cents FROM credit_cards WHERE household_id = ? ORDER BY id",
    )
    .bind(household_id.0)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(CreditCard::try_from).collect()
}

// ── Card statements ───────────────────────────────────────────────────────────

type StatementRow = (i64, String, String, NaiveDate, NaiveDate);
type ItemRow = (NaiveDate, String, i64);

fn statement_from_rows(
    (id, card_name, month, closing_date, payment_due): StatementRow,
    items: Vec<ItemRow>,
) -> Result<CardStatement, StorageError> {
    let month: YearMonth = month.parse().map_err(|e| corrupt("card_statements", e))?;
    Ok(CardStatement {
        id: Some(id),
        card_name,
        month,
        closing_date,
        payment_due,
        items: items
            .into_iter()
            .map(|(date, description, amount_cents)| StatementItem {
                date,
                description,
                amount: Money::from_cents(amount_cents),
            })
            .collect(),
    })
}

/// Writes the statement header and all of its items in one database transaction.
pub async fn insert_card_statement(
    pool: &DbPool,
    statement: &CardStatement,
) -> Result<CardStatement, StorageError> {
    let item_cents = statement
        .items
        .iter()
        .map(|item| to_cents(item.amount))
        .collect::<Result<Vec<_>, _>>()?;

    let mut db_tx = pool.begin().await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO card_statements (card_name, month, closing_date, payment_due) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&statement.card_name)
    .bind(statement.month.to_string())
    .bind(statement.closing_date)
    .bind(statement.payment_due)
    .fetch_one(&mut *db_tx)
    .await?;

    for (position, (item, amount_cents)) in statement.items.iter().zip(item_cents).enumerate() {
        sqlx::query(
            "INSERT INTO card_statement_items (statement_id, position, date, description, amount_cents) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(position as i64)
        .bind(item.date)
        .bind(&item.description)
        .bind(amount_cents)
        .execute(&mut *db_tx)
        .await?;
    }

    db_tx.commit().await?;

    Ok(CardStatement {
        id: Some(id),
        ..statement.clone()
    })
}

async fn get_statement_items(
    pool: &DbPool,
    statement_id: i64,
) -> Result<Vec<ItemRow>, StorageError> {
    Ok(sqlx::query_as::<_, ItemRow>(
        "SELECT date, description, amount_cents FROM card_statement_items WHERE statement_id = ? ORDER BY position",
    )
    .bind(statement_id)
    .fetch_all(pool)
    .await?)
}

pub async fn get_card_statement(
    pool: &DbPool,
    id: i64,
) -> Result<Option<CardStatement>, StorageError> {
    let row = sqlx::query_as::<_, StatementRow>(
        "SELECT id, card_name, month, closing_date, payment_due FROM card_statements WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => {
            let items = get_statement_items(pool, row.0).await?;
            statement_from_rows(row, items).map(Some)
        }
        None => Ok(None),
    }
}

pub async fn get_all_card_statements(pool: &DbPool) -> Result<Vec<CardStatement>, StorageError> {
    let rows = sqlx::query_as::<_, StatementRow>(
        "SELECT id, card_name, month, closing_date, payment_due FROM card_statements ORDER BY month, id",
    )
    .fetch_all(pool)
    .await?;

    let mut statements = Vec::with_capacity(rows.len());
    for row in rows {
        let items = get_statement_items(pool, row.0).await?;
        statements.push(statement_from_rows(row, items)?);
    }
    Ok(statements)
}
