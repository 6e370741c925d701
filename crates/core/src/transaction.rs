use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::category::CategoryId;
use super::error::FinanceError;
use super::household::HouseholdId;
use super::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionId(pub i64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
            TransactionType::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            "transfer" => Ok(TransactionType::Transfer),
            other => Err(FinanceError::Validation(format!("unknown transaction type {other:?}"))),
        }
    }
}

/// A transaction as submitted, before any checks have run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnvalidatedTransaction {
    pub household_id: HouseholdId,
    pub user_id: Option<i64>,
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    pub amount: Money,
    pub occurred_date: NaiveDate,
    pub payment_method_id: Option<i64>,
    pub card_id: Option<i64>,
    pub emoney_type: Option<String>,
    pub account_id: Option<i64>,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub memo: Option<String>,
    pub receipt_path: Option<String>,
}

impl UnvalidatedTransaction {
    pub fn new(
        household_id: HouseholdId,
        transaction_type: TransactionType,
        amount: Money,
        occurred_date: NaiveDate,
    ) -> Self {
        UnvalidatedTransaction {
            household_id,
            user_id: None,
            transaction_type,
            category_id: None,
            amount,
            occurred_date,
            payment_method_id: None,
            card_id: None,
            emoney_type: None,
            account_id: None,
            from_account_id: None,
            to_account_id: None,
            memo: None,
            receipt_path: None,
        }
    }
}

/// A recorded income, expense or transfer. Never modified after it is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<TransactionId>,
    pub household_id: HouseholdId,
    pub user_id: Option<i64>,
    pub transaction_type: TransactionType,
    pub category_id: Option<CategoryId>,
    pub amount: Money,
    pub occurred_date: NaiveDate,
    pub payment_method_id: Option<i64>,
    pub card_id: Option<i64>,
    pub emoney_type: Option<String>,
    pub account_id: Option<i64>,
    pub from_account_id: Option<i64>,
    pub to_account_id: Option<i64>,
    pub memo: Option<String>,
    pub receipt_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    pub fn validate(tx: UnvalidatedTransaction) -> Result<Transaction, FinanceError> {
        if !tx.amount.is_positive() {
            return Err(FinanceError::Validation(format!(
                "amount must be greater than zero, got {}",
                tx.amount
            )));
        }

        if tx.transaction_type == TransactionType::Transfer {
            match (tx.from_account_id, tx.to_account_id) {
                (Some(from), Some(to)) if from == to => {
                    return Err(FinanceError::Validation(
                        "transfer source and destination accounts must differ".to_string(),
                    ));
                }
                (Some(_), Some(_)) => {}
                _ => {
                    return Err(FinanceError::Validation(
                        "transfer requires both fromAccountId and toAccountId".to_string(),
                    ));
                }
            }
        }

        Ok(Transaction {
            id: None,
            household_id: tx.household_id,
            user_id: tx.user_id,
            transaction_type: tx.transaction_type,
            category_id: tx.category_id,
            amount: tx.amount.require_storable("amount")?,
            occurred_date: tx.occurred_date,
            payment_method_id: tx.payment_method_id,
            card_id: tx.card_id,
            emoney_type: tx.emoney_type,
            account_id: tx.account_id,
            from_account_id: tx.from_account_id,
            to_account_id: tx.to_account_id,
            memo: tx.memo,
            receipt_path: tx.receipt_path,
            created_at: None,
        })
    }
}

/// Income, expense and savings for one household over one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CashflowSummary {
    pub income: Money,
    pub expense: Money,
    pub savings: Money,
}

impl CashflowSummary {
    /// Savings is always derived as income minus expense.
    pub fn from_totals(income: Money, expense: Money) -> Self {
        CashflowSummary {
            income,
            expense,
            savings: income - expense,
        }
    }

    pub fn zero() -> Self {
        CashflowSummary::from_totals(Money::zero(), Money::zero())
    }
}

impl fmt::Display for CashflowSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "income={} expense={} savings={}",
            self.income, self.expense, self.savings
        )
    }
}
