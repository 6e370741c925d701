use chrono::NaiveDate;
use std::future::Future;

use super::budget::{BudgetPlan, BudgetPlanId};
use super::error::FinanceResult;
use super::household::HouseholdId;
use super::transaction::{CashflowSummary, Transaction};

/// Persistence for individual transactions and the grouped sums over them.
pub trait TransactionStore: Send + Sync {
    /// Stores an already validated transaction and returns it with its id and timestamp.
    fn save(&self, tx: Transaction) -> impl Future<Output = FinanceResult<Transaction>> + Send;

    /// Transactions of the household dated within `[start, end]`, oldest first.
    fn find_by_household_and_period(
        &self,
        household_id: HouseholdId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = FinanceResult<Vec<Transaction>>> + Send;

    /// Income and expense totals for `[start, end]` inclusive. No matches yields zeros.
    fn sum_by_type(
        &self,
        household_id: HouseholdId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> impl Future<Output = FinanceResult<CashflowSummary>> + Send;
}

pub trait BudgetPlanStore: Send + Sync {
    fn find_by_id(
        &self,
        id: BudgetPlanId,
    ) -> impl Future<Output = FinanceResult<Option<BudgetPlan>>> + Send;

    fn find_all(&self) -> impl Future<Output = FinanceResult<Vec<BudgetPlan>>> + Send;

    /// Inserts a plan whose id has already been assigned.
    fn save(&self, plan: BudgetPlan) -> impl Future<Output = FinanceResult<BudgetPlan>> + Send;

    /// Removing an id that is not stored is not an error.
    fn delete(&self, id: BudgetPlanId) -> impl Future<Output = FinanceResult<()>> + Send;
}
