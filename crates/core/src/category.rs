use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FinanceError;
use super::household::require_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    Income,
    Expense,
    Savings,
}

impl CategoryType {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryType::Income => "income",
            CategoryType::Expense => "expense",
            CategoryType::Savings => "savings",
        }
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryType {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(CategoryType::Income),
            "expense" => Ok(CategoryType::Expense),
            "savings" => Ok(CategoryType::Savings),
            other => Err(FinanceError::Validation(format!("unknown category type {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<CategoryId>,
    pub category_type: CategoryType,
    pub name: String,
    pub parent_type: Option<CategoryType>,
}

impl Category {
    pub fn new(category_type: CategoryType, name: &str) -> Result<Self, FinanceError> {
        Ok(Category {
            id: None,
            category_type,
            name: require_name("category name", name)?,
            parent_type: None,
        })
    }

    pub fn with_parent(mut self, parent_type: CategoryType) -> Self {
        self.parent_type = Some(parent_type);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_type_text_round_trip() {
        for t in [CategoryType::Income, CategoryType::Expense, CategoryType::Savings] {
            assert_eq!(t.to_string().parse::<CategoryType>().unwrap(), t);
        }
        assert!("Income".parse::<CategoryType>().is_err());
    }

    #[test]
    fn category_requires_name() {
        assert!(Category::new(CategoryType::Expense, "").is_err());
        let c = Category::new(CategoryType::Expense, "Groceries")
            .unwrap()
            .with_parent(CategoryType::Expense);
        assert_eq!(c.parent_type, Some(CategoryType::Expense));
    }
}
