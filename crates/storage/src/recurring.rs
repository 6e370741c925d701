use chrono::NaiveDate;
use hearth_core::{FixedCost, HouseholdId, Money, Salary, YearMonth};

use crate::db::{to_cents, DbPool, StorageError};

type FixedCostRow = (i64, i64, String, i64, NaiveDate, Option<NaiveDate>);

fn fixed_cost_from_row(
    (id, household_id, name, amount_cents, start_date, end_date): FixedCostRow,
) -> FixedCost {
    FixedCost {
        id: Some(id),
        household_id: HouseholdId(household_id),
        name,
        amount: Money::from_cents(amount_cents),
        start_date,
        end_date,
    }
}

pub async fn insert_fixed_cost(pool: &DbPool, cost: &FixedCost) -> Result<FixedCost, StorageError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO fixed_costs (household_id, name, amount_cents, start_date, end_date) VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(cost.household_id.0)
    .bind(&cost.name)
    .bind(to_cents(cost.amount)?)
    .bind(cost.start_date)
    .bind(cost.end_date)
    .fetch_one(pool)
    .await?;

    Ok(FixedCost {
        id: Some(id),
        ..cost.clone()
    })
}

pub async fn get_fixed_costs(
    pool: &DbPool,
    household_id: HouseholdId,
) -> Result<Vec<FixedCost>, StorageError> {
    let rows = sqlx::query_as::<_, FixedCostRow>(
        "SELECT id, household_id, name, amount_cents, start_date, end_date FROM fixed_costs WHERE household_id = ? ORDER BY start_date, id",
    )
    .bind(household_id.0)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(fixed_cost_from_row).collect())
}

/// Fixed costs whose active span overlaps any day of `month`.
pub async fn get_active_fixed_costs(
    pool: &DbPool,
    household_id: HouseholdId,
    month: YearMonth,
) -> Result<Vec<FixedCost>, StorageError> {
    let bounds = month.bounds();
    let rows = sqlx::query_as::<_, FixedCostRow>(
        r#"
        SELECT id, household_id, name, amount_cents, start_date, end_date
        FROM fixed_costs
        WHERE household_id = ?
          AND start_date <= ?
          AND (end_date IS NULL OR end_date >= ?)
        ORDER BY start_date, id
        "#,
    )
    .bind(household_id.0)
    .bind(bounds.end)
    .bind(bounds.start)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(fixed_cost_from_row).collect())
}

pub async fn delete_fixed_cost(pool: &DbPool, id: i64) -> Result<bool, StorageError> {
    let result = sqlx::query("DELETE FROM fixed_costs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

type SalaryRow = (i64, i64, i64, NaiveDate, Option<String>);

fn salary_from_row((id, household_id, amount_cents, pay_date, description): SalaryRow) -> Salary {
    Salary {
        id: Some(id),
        household_id: HouseholdId(household_id),
        amount: Money::from_cents(amount_cents),
        pay_date,
        description,
    }
}

pub async fn insert_salary(pool: &DbPool, salary: &Salary) -> Result<Salary, StorageError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO salaries (household_id, amount_cents, pay_date, description) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(salary.household_id.0)
    .bind(to_cents(salary.amount)?)
    .bind(salary.pay_date)
    .bind(&salary.description)
    .fetch_one(pool)
    .await?;

    Ok(Salary {
        id: Some(id),
        ..salary.clone()
    })
}

/// Salaries of the household, optionally restricted to pay dates inside `month`.
pub async fn get_salaries(
    pool: &DbPool,
    household_id: HouseholdId,
    month: Option<YearMonth>,
) -> Result<Vec<Salary>, StorageError> {
    let rows = match month {
        Some(month) => {
            let bounds = month.bounds();
            sqlx::query_as::<_, SalaryRow>(
                "SELECT id, household_id, amount_cents, pay_date, description FROM salaries WHERE household_id = ? AND pay_date >= ? AND pay_date <= ? ORDER BY pay_date, id",
            )
            .bind(household_id.0)
            .bind(bounds.start)
            .bind(bounds.end)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, SalaryRow>(
                "SELECT id, household_id, amount_cents, pay_date, description FROM salaries WHERE household_id = ? ORDER BY pay_date, id",
            )
            .bind(household_id.0)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(salary_from_row).collect())
}
