pub mod budget;
pub mod card;
pub mod category;
pub mod error;
pub mod household;
pub mod money;
pub mod period;
pub mod recurring;
pub mod service;
pub mod store;
pub mod transaction;

pub use budget::{BudgetPlan, BudgetPlanId};
pub use card::{CardBrand, CardStatement, CreditCard, StatementItem};
pub use category::{Category, CategoryId, CategoryType};
pub use error::{FinanceError, FinanceResult};
pub use household::{FamilyMember, Household, HouseholdId};
pub use money::Money;
pub use period::{month_bounds, DateRange, YearMonth};
pub use recurring::{FixedCost, Salary};
pub use service::{BudgetPlanService, CashflowService};
pub use store::{BudgetPlanStore, TransactionStore};
pub use transaction::{
    CashflowSummary, Transaction, TransactionId, TransactionType, UnvalidatedTransaction,
};
