use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::FinanceError;
use super::household::{require_name, HouseholdId};
use super::money::Money;
use super::period::YearMonth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Jcb,
    Amex,
    Diners,
    Other,
}

impl CardBrand {
    pub fn as_str(self) -> &'static str {
        match self {
            CardBrand::Visa => "visa",
            CardBrand::Mastercard => "mastercard",
            CardBrand::Jcb => "jcb",
            CardBrand::Amex => "amex",
            CardBrand::Diners => "diners",
            CardBrand::Other => "other",
        }
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardBrand {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visa" => Ok(CardBrand::Visa),
            "mastercard" => Ok(CardBrand::Mastercard),
            "jcb" => Ok(CardBrand::Jcb),
            "amex" => Ok(CardBrand::Amex),
            "diners" => Ok(CardBrand::Diners),
            "other" => Ok(CardBrand::Other),
            other => Err(FinanceError::Validation(format!("unknown card brand {other:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditCard {
    pub id: Option<i64>,
    pub household_id: HouseholdId,
    pub name: String,
    pub brand: CardBrand,
    /// Day of month the billing cycle closes (1-31; short months clamp).
    pub closing_day: u8,
    pub payment_day: u8,
    pub limit_amount: Option<Money>,
}

impl CreditCard {
    pub fn validate(mut self) -> Result<Self, FinanceError> {
        self.name = require_name("card name", &self.name)?;
        for (field, day) in [("closing day", self.closing_day), ("payment day", self.payment_day)] {
            if !(1..=31).contains(&day) {
                return Err(FinanceError::Validation(format!("{field} {day} is outside 1-31")));
            }
        }
        if let Some(limit) = self.limit_amount {
            if limit.is_negative() {
                return Err(FinanceError::Validation(
                    "card limit must not be negative".to_string(),
                ));
            }
            limit.require_storable("card limit")?;
        }
        Ok(self)
    }

    /// The closing date of this card's cycle in `month`, clamped to the month's last day.
    pub fn closing_date_in(&self, month: YearMonth) -> NaiveDate {
        clamp_day(month, self.closing_day)
    }

    pub fn payment_date_in(&self, month: YearMonth) -> NaiveDate {
        clamp_day(month, self.payment_day)
    }
}

fn clamp_day(month: YearMonth, day: u8) -> NaiveDate {
    let last = month.last_day();
    NaiveDate::from_ymd_opt(month.year(), month.month(), u32::from(day))
        .map_or(last, |d| d.min(last))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementItem {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
}

/// One month's billing statement for a card, with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStatement {
    pub id: Option<i64>,
    pub card_name: String,
    pub month: YearMonth,
    pub closing_date: NaiveDate,
    pub payment_due: NaiveDate,
    pub items: Vec<StatementItem>,
}

impl CardStatement {
    pub fn total(&self) -> Money {
        self.items.iter().map(|item| item.amount).sum()
    }

    pub fn validate(mut self) -> Result<Self, FinanceError> {
        self.card_name = require_name("card name", &self.card_name)?;
        if self.payment_due < self.closing_date {
            return Err(FinanceError::Validation(format!(
                "payment due {} is before closing date {}",
                self.payment_due, self.closing_date
            )));
        }
        for item in &mut self.items {
            item.description = require_name("statement item description", &item.description)?;
            item.amount.require_storable("statement item amount")?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card(closing_day: u8, payment_day: u8) -> CreditCard {
        CreditCard {
            id: None,
            household_id: HouseholdId(1),
            name: "Family Visa".to_string(),
            brand: CardBrand::Visa,
            closing_day,
            payment_day,
            limit_amount: Some(Money::from_cents(50_000_000)),
        }
    }

    #[test]
    fn card_days_are_checked() {
        assert!(card(15, 10).validate().is_ok());
        assert!(card(0, 10).validate().is_err());
        assert!(card(15, 32).validate().is_err());
    }

    #[test]
    fn closing_day_clamps_to_short_months() {
        let c = card(31, 27);
        let feb: YearMonth = "2023-02".parse().unwrap();
        assert_eq!(c.closing_date_in(feb), date(2023, 2, 28));
        assert_eq!(c.payment_date_in(feb), date(2023, 2, 27));
    }

    #[test]
    fn statement_total_is_exact() {
        let statement = CardStatement {
            id: None,
            card_name: "Family Visa".to_string(),
            month: "2024-01".parse().unwrap(),
            closing_date: date(2024, 1, 15),
            payment_due: date(2024, 2, 10),
            items: vec![
                StatementItem {
                    date: date(2024, 1, 3),
                    description: "Books".into(),
                    amount: Money::from_cents(10),
                },
                StatementItem {
                    date: date(2024, 1, 4),
                    description: "Tea".into(),
                    amount: Money::from_cents(20),
                },
            ],
        };
        assert_eq!(statement.total(), Money::from_cents(30));
    }

    #[test]
    fn statement_due_before_closing_is_rejected() {
        let statement = CardStatement {
            id: None,
            card_name: "Family Visa".to_string(),
            month: "2024-01".parse().unwrap(),
            closing_date: date(2024, 1, 15),
            payment_due: date(2024, 1, 10),
            items: vec![],
        };
        assert!(statement.validate().is_err());
    }

    #[test]
    fn brand_text_round_trip() {
        assert_eq!("jcb".parse::<CardBrand>().unwrap(), CardBrand::Jcb);
        assert_eq!(CardBrand::Amex.to_string(), "amex");
        assert!("discover".parse::<CardBrand>().is_err());
    }
}
