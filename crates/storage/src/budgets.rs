use hearth_core::{BudgetPlan, BudgetPlanId, BudgetPlanStore, FinanceResult, Money};
use uuid::Uuid;

use crate::db::{corrupt, to_cents, DbPool, SqliteStore, StorageError};

type PlanRow = (String, String, i64);

fn plan_from_row((id, title, total_cents): PlanRow) -> Result<BudgetPlan, StorageError> {
    let id = Uuid::parse_str(&id).map_err(|e| corrupt("budget_plans", e))?;
    Ok(BudgetPlan {
        id: Some(BudgetPlanId(id)),
        title,
        total_amount: Money::from_cents(total_cents),
    })
}

/// Inserts a plan. The caller assigns the id; a plan without one is stored under a fresh UUID.
pub async fn insert_budget_plan(
    pool: &DbPool,
    plan: &BudgetPlan,
) -> Result<BudgetPlan, StorageError> {
    let id = plan.id.unwrap_or_else(BudgetPlanId::generate);
    sqlx::query("INSERT INTO budget_plans (id, title, total_cents) VALUES (?, ?, ?)")
        .bind(id.0.to_string())
        .bind(&plan.title)
        .bind(to_cents(plan.total_amount)?)
        .execute(pool)
        .await?;

    Ok(BudgetPlan {
        id: Some(id),
        ..plan.clone()
    })
}

pub async fn get_budget_plan(
    pool: &DbPool,
    id: BudgetPlanId,
) -> Result<Option<BudgetPlan>, StorageError> {
    let row = sqlx::query_as::<_, PlanRow>(
        "SELECT id, title, total_cents FROM budget_plans WHERE id = ?",
    )
    .bind(id.0.to_string())
    .fetch_optional(pool)
    .await?;

    row.map(plan_from_row).transpose()
}

pub async fn get_all_budget_plans(pool: &DbPool) -> Result<Vec<BudgetPlan>, StorageError> {
    let rows = sqlx::query_as::<_, PlanRow>(
        "SELECT id, title, total_cents FROM budget_plans ORDER BY rowid",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(plan_from_row).collect()
}

/// Returns whether a row was removed; a missing id is not an error.
pub async fn delete_budget_plan(pool: &DbPool, id: BudgetPlanId) -> Result<bool, StorageError> {
    let result = sqlx::query("DELETE FROM budget_plans WHERE id = ?")
        .bind(id.0.to_string())
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

impl BudgetPlanStore for SqliteStore {
    async fn find_by_id(&self, id: BudgetPlanId) -> FinanceResult<Option<BudgetPlan>> {
        Ok(get_budget_plan(self.pool(), id).await?)
    }

    async fn find_all(&self) -> FinanceResult<Vec<BudgetPlan>> {
        Ok(get_all_budget_plans(self.pool()).await?)
    }

    async fn save(&self, plan: BudgetPlan) -> FinanceResult<BudgetPlan> {
        Ok(insert_budget_plan(self.pool(), &plan).await?)
    }

    async fn delete(&self, id: BudgetPlanId) -> FinanceResult<()> {
        delete_budget_plan(self.pool(), id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::fresh_db;
    use hearth_core::BudgetPlanService;

    #[tokio::test]
    async fn insert_without_id_generates_one() {
        let (_dir, pool) = fresh_db().await;
        let plan = BudgetPlan::new("Groceries", Money::from_cents(60_000));
        let stored = insert_budget_plan(&pool, &plan).await.unwrap();
        let id = stored.id.unwrap();
        assert!(!id.0.is_nil());

        let loaded = get_budget_plan(&pool, id).await.unwrap().unwrap();
        assert_eq!(loaded, stored);
    }

    #[tokio::test]
    async fn list_round_trips_in_insertion_order() {
        let (_dir, pool) = fresh_db().await;
        let service = BudgetPlanService::new(SqliteStore::new(pool.clone()));
        let a = service
            .create(BudgetPlan::new("Zoo trip", Money::from_cents(1_250)))
            .await
            .unwrap();
        let b = service
            .create(BudgetPlan::new("Appliances", Money::from_cents(89_999)))
            .await
            .unwrap();

        let all = get_all_budget_plans(&pool).await.unwrap();
        assert_eq!(all, vec![a, b]);
        assert_eq!(all[1].total_amount.to_string(), "899.99");
    }

    #[tokio::test]
    async fn duplicate_id_is_a_storage_error() {
        let (_dir, pool) = fresh_db().await;
        let mut plan = BudgetPlan::new("Once", Money::zero());
        plan.id = Some(BudgetPlanId::generate());
        insert_budget_plan(&pool, &plan).await.unwrap();
        assert!(insert_budget_plan(&pool, &plan).await.is_err());
    }

    #[tokio::test]
    async fn delete_missing_id_leaves_table_unchanged() {
        let (_dir, pool) = fresh_db().await;
        let kept = insert_budget_plan(&pool, &BudgetPlan::new("Keep", Money::from_cents(1)))
            .await
            .unwrap();

        let removed = delete_budget_plan(&pool, BudgetPlanId::generate()).await.unwrap();
        assert!(!removed);
        assert_eq!(get_all_budget_plans(&pool).await.unwrap(), vec![kept.clone()]);

        assert!(delete_budget_plan(&pool, kept.id.unwrap()).await.unwrap());
        assert!(get_all_budget_plans(&pool).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_id_surfaces_as_error() {
        let (_dir, pool) = fresh_db().await;
        sqlx::query(
            "INSERT INTO budget_plans (id, title, total_cents) VALUES ('not-a-uuid', 'x', 0)",
        )
        .execute(&pool)
        .await
        .unwrap();
        assert!(matches!(
            get_all_budget_plans(&pool).await,
            Err(StorageError::CorruptRow { table: "budget_plans", .. })
        ));
    }
}
