use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::FinanceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HouseholdId(pub i64);

impl fmt::Display for HouseholdId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The ownership boundary for members, transactions and recurring records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Household {
    pub id: Option<HouseholdId>,
    pub name: String,
}

impl Household {
    pub fn new(name: &str) -> Result<Self, FinanceError> {
        Ok(Household {
            id: None,
            name: require_name("household name", name)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    pub id: Option<i64>,
    pub household_id: HouseholdId,
    pub name: String,
    pub relationship: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub employment_status: Option<String>,
    pub school_start_age: Option<u8>,
    pub retirement_age: Option<u8>,
    pub memo: Option<String>,
}

impl FamilyMember {
    pub fn new(household_id: HouseholdId, name: &str, relationship: &str) -> Self {
        FamilyMember {
            id: None,
            household_id,
            name: name.to_string(),
            relationship: relationship.to_string(),
            birth_date: None,
            gender: None,
            employment_status: None,
            school_start_age: None,
            retirement_age: None,
            memo: None,
        }
    }

    pub fn validate(mut self) -> Result<Self, FinanceError> {
        self.name = require_name("member name", &self.name)?;
        self.relationship = require_name("relationship", &self.relationship)?;
        if let (Some(school), Some(retire)) = (self.school_start_age, self.retirement_age) {
            if retire <= school {
                return Err(FinanceError::Validation(format!(
                    "retirement age {retire} must be after school start age {school}"
                )));
            }
        }
        Ok(self)
    }

    /// Completed years of age on `on`, when a birth date is known.
    pub fn age_on(&self, on: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| on.years_since(birth))
    }
}

/// Trims `value` and rejects it when nothing is left.
pub(crate) fn require_name(field: &str, value: &str) -> Result<String, FinanceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FinanceError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn household_name_is_trimmed() {
        assert_eq!(Household::new("  Tanaka  ").unwrap().name, "Tanaka");
        assert!(Household::new("   ").is_err());
    }

    #[test]
    fn member_age() {
        let mut m = FamilyMember::new(HouseholdId(1), "Aiko", "daughter");
        assert_eq!(m.age_on(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), None);
        m.birth_date = NaiveDate::from_ymd_opt(2015, 6, 1);
        assert_eq!(m.age_on(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap()), Some(8));
        assert_eq!(m.age_on(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()), Some(9));
    }

    #[test]
    fn member_ages_must_be_ordered() {
        let mut m = FamilyMember::new(HouseholdId(1), "Ken", "self");
        m.school_start_age = Some(6);
        m.retirement_age = Some(6);
        assert!(m.clone().validate().is_err());
        m.retirement_age = Some(65);
        assert!(m.validate().is_ok());
    }
}
