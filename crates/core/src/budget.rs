use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::error::FinanceError;
use super::household::require_name;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BudgetPlanId(pub Uuid);

impl BudgetPlanId {
    pub fn generate() -> Self {
        BudgetPlanId(Uuid::new_v4())
    }
}

impl fmt::Display for BudgetPlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named spending target. Plans are global, not tied to a household.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetPlan {
    pub id: Option<BudgetPlanId>,
    pub title: String,
    pub total_amount: Money,
}

impl BudgetPlan {
    pub fn new(title: &str, total_amount: Money) -> Self {
        BudgetPlan {
            id: None,
            title: title.to_string(),
            total_amount,
        }
    }

    /// Checks the plan and assigns a fresh id when none was supplied.
    pub fn prepare_for_insert(mut self) -> Result<Self, FinanceError> {
        self.title = require_name("budget plan title", &self.title)?;
        if self.total_amount.is_negative() {
            return Err(FinanceError::Validation(format!(
                "budget plan total must not be negative, got {}",
                self.total_amount
            )));
        }
        self.total_amount = self.total_amount.require_storable("budget plan total")?;
        if self.id.is_none() {
            self.id = Some(BudgetPlanId::generate());
        }
        Ok(self)
    }
}
