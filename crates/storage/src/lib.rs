pub mod budgets;
pub mod cards;
pub mod categories;
pub mod db;
pub mod households;
pub mod recurring;
pub mod transactions;

pub use budgets::{delete_budget_plan, get_all_budget_plans, get_budget_plan, insert_budget_plan};
pub use cards::{
    get_all_card_statements, get_card_statement, get_credit_cards, insert_card_statement,
    insert_credit_card,
};
pub use categories::{get_all_categories, get_categories_by_parent_type, insert_category};
pub use db::{create_db, DbPool, SqliteStore, StorageError};
pub use households::{
    get_all_households, get_family_members, get_household, insert_family_member, insert_household,
};
pub use recurring::{
    delete_fixed_cost, get_active_fixed_costs, get_fixed_costs, get_salaries, insert_fixed_cost,
    insert_salary,
};
pub use transactions::{get_transactions_for_period, insert_transaction, sum_by_type};
