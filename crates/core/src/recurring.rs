use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::FinanceError;
use super::household::{require_name, HouseholdId};
use super::money::Money;
use super::period::{DateRange, YearMonth};

/// A cost the household pays every month between `start_date` and `end_date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedCost {
    pub id: Option<i64>,
    pub household_id: HouseholdId,
    pub name: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    /// `None` means the cost is open-ended.
    pub end_date: Option<NaiveDate>,
}

impl FixedCost {
    pub fn validate(mut self) -> Result<Self, FinanceError> {
        self.name = require_name("fixed cost name", &self.name)?;
        if self.amount.is_negative() {
            return Err(FinanceError::Validation(format!(
                "fixed cost amount must not be negative, got {}",
                self.amount
            )));
        }
        self.amount.require_storable("fixed cost amount")?;
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(FinanceError::Validation(format!(
                    "end date {end} is before start date {}",
                    self.start_date
                )));
            }
        }
        Ok(self)
    }

    pub fn is_active_in(&self, month: YearMonth) -> bool {
        let active = DateRange::new(self.start_date, self.end_date.unwrap_or(NaiveDate::MAX));
        active.overlaps(month.bounds())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salary {
    pub id: Option<i64>,
    pub household_id: HouseholdId,
    pub amount: Money,
    pub pay_date: NaiveDate,
    pub description: Option<String>,
}

impl Salary {
    pub fn validate(self) -> Result<Self, FinanceError> {
        if !self.amount.is_positive() {
            return Err(FinanceError::Validation(format!(
                "salary amount must be greater than zero, got {}",
                self.amount
            )));
        }
        self.amount.require_storable("salary amount")?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rent(start: NaiveDate, end: Option<NaiveDate>) -> FixedCost {
        FixedCost {
            id: None,
            household_id: HouseholdId(1),
            name: "Rent".to_string(),
            amount: Money::from_cents(9_500_000),
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn open_ended_cost_stays_active() {
        let cost = rent(date(2023, 4, 1), None);
        assert!(cost.is_active_in("2023-04".parse().unwrap()));
        assert!(cost.is_active_in("2030-12".parse().unwrap()));
        assert!(!cost.is_active_in("2023-03".parse().unwrap()));
    }

    #[test]
    fn closed_cost_ends_with_its_month() {
        let cost = rent(date(2023, 4, 15), Some(date(2024, 3, 1)));
        assert!(cost.is_active_in("2023-04".parse().unwrap()));
        assert!(cost.is_active_in("2024-03".parse().unwrap()));
        assert!(!cost.is_active_in("2024-04".parse().unwrap()));
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(rent(date(2024, 1, 2), Some(date(2024, 1, 1))).validate().is_err());
        assert!(rent(date(2024, 1, 1), Some(date(2024, 1, 1))).validate().is_ok());
    }

    #[test]
    fn salary_must_be_positive() {
        let salary = Salary {
            id: None,
            household_id: HouseholdId(1),
            amount: Money::zero(),
            pay_date: date(2024, 1, 25),
            description: None,
        };
        assert!(salary.validate().is_err());
    }
}
