use tracing::info;

use super::budget::{BudgetPlan, BudgetPlanId};
use super::error::{FinanceError, FinanceResult};
use super::household::HouseholdId;
use super::period::{DateRange, YearMonth};
use super::store::{BudgetPlanStore, TransactionStore};
use super::transaction::{CashflowSummary, Transaction, UnvalidatedTransaction};

/// Monthly and ranged cashflow figures, plus transaction recording.
#[derive(Debug, Clone)]
pub struct CashflowService<S> {
    store: S,
}

impl<S: TransactionStore> CashflowService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn monthly_summary(
        &self,
        household_id: HouseholdId,
        month: YearMonth,
    ) -> FinanceResult<CashflowSummary> {
        info!(%household_id, %month, "Calculating cashflow");
        let range = month.bounds();
        let summary = self
            .store
            .sum_by_type(household_id, range.start, range.end)
            .await?;
        info!(%household_id, %month, %summary, "Cashflow summary calculated");
        Ok(summary)
    }

    pub async fn summary_for_range(
        &self,
        household_id: HouseholdId,
        range: DateRange,
    ) -> FinanceResult<CashflowSummary> {
        let range = DateRange::checked(range.start, range.end)?;
        info!(%household_id, %range, "Calculating cashflow");
        self.store
            .sum_by_type(household_id, range.start, range.end)
            .await
    }

    pub async fn record(&self, tx: UnvalidatedTransaction) -> FinanceResult<Transaction> {
        let validated = Transaction::validate(tx)?;
        let stored = self.store.save(validated).await?;
        info!(
            household_id = %stored.household_id,
            transaction_type = %stored.transaction_type,
            amount = %stored.amount,
            "Transaction recorded"
        );
        Ok(stored)
    }

    pub async fn transactions_in(
        &self,
        household_id: HouseholdId,
        month: YearMonth,
    ) -> FinanceResult<Vec<Transaction>> {
        let range = month.bounds();
        self.store
            .find_by_household_and_period(household_id, range.start, range.end)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct BudgetPlanService<S> {
    store: S,
}

impl<S: BudgetPlanStore> BudgetPlanService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn find_all(&self) -> FinanceResult<Vec<BudgetPlan>> {
        self.store.find_all().await
    }

    pub async fn get(&self, id: BudgetPlanId) -> FinanceResult<BudgetPlan> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| FinanceError::NotFound(format!("budget plan {id}")))
    }

    pub async fn create(&self, plan: BudgetPlan) -> FinanceResult<BudgetPlan> {
        let plan = plan.prepare_for_insert()?;
        let stored = self.store.save(plan).await?;
        info!(id = ?stored.id, title = %stored.title, "Budget plan created");
        Ok(stored)
    }

    pub async fn delete(&self, id: BudgetPlanId) -> FinanceResult<()> {
        self.store.delete(id).await?;
        info!(%id, "Budget plan deleted");
        Ok(())
    }
}
