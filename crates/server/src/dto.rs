//! Wire shapes for the HTTP API.
//!
//! Every request and response body is a camelCase struct here, converted
//! field-for-field to and from the domain records in `hearth_core`.

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::{
    BudgetPlan, BudgetPlanId, CardBrand, CardStatement, CashflowSummary, Category, CategoryId,
    CategoryType, CreditCard, FamilyMember, FixedCost, Household, HouseholdId, Money, Salary,
    StatementItem, Transaction, TransactionType, UnvalidatedTransaction, YearMonth,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Query strings ─────────────────────────────────────────────────────────────

/// `month` stays a raw string so a bad token surfaces as `InvalidPeriod`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyQuery {
    pub household_id: i64,
    pub month: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub household_id: i64,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MonthFilter {
    pub month: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryQuery {
    pub parent_type: Option<CategoryType>,
}

// ── Cashflow & transactions ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowSummaryDto {
    pub income: Money,
    pub expense: Money,
    pub savings: Money,
}

impl From<CashflowSummary> for CashflowSummaryDto {
    fn from(s: CashflowSummary) -> Self {
        CashflowSummaryDto {
            income: s.income,
            expense: s.expense,
            savings: s.savings,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionDto {
    pub household_id: i64,
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: Option<i64>,
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

impl From<NewTransactionDto> for UnvalidatedTransaction {
    fn from(d: NewTransactionDto) -> Self {
        UnvalidatedTransaction {
            household_id: HouseholdId(d.household_id),
            user_id: d.user_id,
            transaction_type: d.transaction_type,
            category_id: d.category_id.map(CategoryId),
            amount: d.amount,
            occurred_date: d.occurred_date,
            payment_method_id: d.payment_method_id,
            card_id: d.card_id,
            emoney_type: d.emoney_type,
            account_id: d.account_id,
            from_account_id: d.from_account_id,
            to_account_id: d.to_account_id,
            memo: d.memo,
            receipt_path: d.receipt_path,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDto {
    pub id: Option<i64>,
    pub household_id: i64,
    pub user_id: Option<i64>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: Option<i64>,
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

impl From<Transaction> for TransactionDto {
    fn from(t: Transaction) -> Self {
        TransactionDto {
            id: t.id.map(|id| id.0),
            household_id: t.household_id.0,
            user_id: t.user_id,
            transaction_type: t.transaction_type,
            category_id: t.category_id.map(|c| c.0),
            amount: t.amount,
            occurred_date: t.occurred_date,
            payment_method_id: t.payment_method_id,
            card_id: t.card_id,
            emoney_type: t.emoney_type,
            account_id: t.account_id,
            from_account_id: t.from_account_id,
            to_account_id: t.to_account_id,
            memo: t.memo,
            receipt_path: t.receipt_path,
            created_at: t.created_at,
        }
    }
}

// ── Budget plans ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetPlanDto {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    pub total_amount: Money,
}

impl From<BudgetPlan> for BudgetPlanDto {
    fn from(p: BudgetPlan) -> Self {
        BudgetPlanDto {
            id: p.id.map(|id| id.0),
            title: p.title,
            total_amount: p.total_amount,
        }
    }
}

impl From<BudgetPlanDto> for BudgetPlan {
    fn from(d: BudgetPlanDto) -> Self {
        BudgetPlan {
            id: d.id.map(BudgetPlanId),
            title: d.title,
            total_amount: d.total_amount,
        }
    }
}

// ── Households ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct NewHouseholdDto {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct HouseholdDto {
    pub id: Option<i64>,
    pub name: String,
}

impl From<Household> for HouseholdDto {
    fn from(h: Household) -> Self {
        HouseholdDto {
            id: h.id.map(|id| id.0),
            name: h.name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFamilyMemberDto {
    pub name: String,
    pub relationship: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub employment_status: Option<String>,
    pub school_start_age: Option<u8>,
    pub retirement_age: Option<u8>,
    pub memo: Option<String>,
}

impl NewFamilyMemberDto {
    pub fn into_member(self, household_id: HouseholdId) -> FamilyMember {
        FamilyMember {
            birth_date: self.birth_date,
            gender: self.gender,
            employment_status: self.employment_status,
            school_start_age: self.school_start_age,
            retirement_age: self.retirement_age,
            memo: self.memo,
            ..FamilyMember::new(household_id, &self.name, &self.relationship)
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyMemberDto {
    pub id: Option<i64>,
    pub household_id: i64,
    pub name: String,
    pub relationship: String,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<String>,
    pub employment_status: Option<String>,
    pub school_start_age: Option<u8>,
    pub retirement_age: Option<u8>,
    pub memo: Option<String>,
    pub age: Option<u32>,
}

impl FamilyMemberDto {
    /// `age` is the member's completed years on `today`.
    pub fn new(m: FamilyMember, today: NaiveDate) -> Self {
        let age = m.age_on(today);
        FamilyMemberDto {
            id: m.id,
            household_id: m.household_id.0,
            name: m.name,
            relationship: m.relationship,
            birth_date: m.birth_date,
            gender: m.gender,
            employment_status: m.employment_status,
            school_start_age: m.school_start_age,
            retirement_age: m.retirement_age,
            memo: m.memo,
            age,
        }
    }
}

// ── Categories ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryDto {
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub name: String,
    pub parent_type: Option<CategoryType>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: Option<i64>,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    pub name: String,
    pub parent_type: Option<CategoryType>,
}

impl From<Category> for CategoryDto {
    fn from(c: Category) -> Self {
        CategoryDto {
            id: c.id.map(|id| id.0),
            category_type: c.category_type,
            name: c.name,
            parent_type: c.parent_type,
        }
    }
}

// ── Credit cards & statements ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCreditCardDto {
    pub name: String,
    pub brand: CardBrand,
    pub closing_day: u8,
    pub payment_day: u8,
    pub limit_amount: Option<Money>,
}

impl NewCreditCardDto {
    pub fn into_card(self, household_id: HouseholdId) -> CreditCard {
        CreditCard {
            id: None,
            household_id,
            name: self.name,
            brand: self.brand,
            closing_day: self.closing_day,
            payment_day: self.payment_day,
            limit_amount: self.limit_amount,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditCardDto {
    pub id: Option<i64>,
    pub household_id: i64,
    pub name: String,
    pub brand: CardBrand,
    pub closing_day: u8,
    pub payment_day: u8,
    pub limit_amount: Option<Money>,
    pub cycle_month: YearMonth,
    pub closing_date: NaiveDate,
    pub payment_date: NaiveDate,
}

impl CreditCardDto {
    /// Card with its closing and payment dates resolved for `month`.
    pub fn for_month(c: CreditCard, month: YearMonth) -> Self {
        CreditCardDto {
            id: c.id,
            household_id: c.household_id.0,
            cycle_month: month,
            closing_date: c.closing_date_in(month),
            payment_date: c.payment_date_in(month),
            name: c.name,
            brand: c.brand,
            closing_day: c.closing_day,
            payment_day: c.payment_day,
            limit_amount: c.limit_amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementItemDto {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Money,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCardStatementDto {
    pub card_name: String,
    pub month: YearMonth,
    pub closing_date: NaiveDate,
    pub payment_due: NaiveDate,
    #[serde(default)]
    pub items: Vec<StatementItemDto>,
}

impl From<NewCardStatementDto> for CardStatement {
    fn from(d: NewCardStatementDto) -> Self {
        CardStatement {
            id: None,
            card_name: d.card_name,
            month: d.month,
            closing_date: d.closing_date,
            payment_due: d.payment_due,
            items: d
                .items
                .into_iter()
                .map(|i| StatementItem {
                    date: i.date,
                    description: i.description,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStatementDto {
    pub id: Option<i64>,
    pub card_name: String,
    pub month: YearMonth,
    pub closing_date: NaiveDate,
    pub payment_due: NaiveDate,
    pub total: Money,
    pub items: Vec<StatementItemDto>,
}

impl From<CardStatement> for CardStatementDto {
    fn from(s: CardStatement) -> Self {
        let total = s.total();
        CardStatementDto {
            id: s.id,
            card_name: s.card_name,
            month: s.month,
            closing_date: s.closing_date,
            payment_due: s.payment_due,
            total,
            items: s
                .items
                .into_iter()
                .map(|i| StatementItemDto {
                    date: i.date,
                    description: i.description,
                    amount: i.amount,
                })
                .collect(),
        }
    }
}

// ── Fixed costs & salaries ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFixedCostDto {
    pub name: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl NewFixedCostDto {
    pub fn into_fixed_cost(self, household_id: HouseholdId) -> FixedCost {
        FixedCost {
            id: None,
            household_id,
            name: self.name,
            amount: self.amount,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedCostDto {
    pub id: Option<i64>,
    pub household_id: i64,
    pub name: String,
    pub amount: Money,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<FixedCost> for FixedCostDto {
    fn from(c: FixedCost) -> Self {
        FixedCostDto {
            id: c.id,
            household_id: c.household_id.0,
            name: c.name,
            amount: c.amount,
            start_date: c.start_date,
            end_date: c.end_date,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalaryDto {
    pub amount: Money,
    pub pay_date: NaiveDate,
    pub description: Option<String>,
}

impl NewSalaryDto {
    pub fn into_salary(self, household_id: HouseholdId) -> Salary {
        Salary {
            id: None,
            household_id,
            amount: self.amount,
            pay_date: self.pay_date,
            description: self.description,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDto {
    pub id: Option<i64>,
    pub household_id: i64,
    pub amount: Money,
    pub pay_date: NaiveDate,
    pub description: Option<String>,
}

impl From<Salary> for SalaryDto {
    fn from(s: Salary) -> Self {
        SalaryDto {
            id: s.id,
            household_id: s.household_id.0,
            amount: s.amount,
            pay_date: s.pay_date,
            description: s.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn budget_plan_body_without_id() {
        let dto: BudgetPlanDto =
            serde_json::from_value(json!({ "title": "Trip", "totalAmount": 1500 })).unwrap();
        assert_eq!(dto.id, None);

        let plan = BudgetPlan::from(dto);
        assert_eq!(plan.title, "Trip");
        assert_eq!(plan.total_amount, Money::from_cents(150_000));
    }

    #[test]
    fn budget_plan_serializes_camel_case() {
        let id = Uuid::new_v4();
        let plan = BudgetPlan {
            id: Some(BudgetPlanId(id)),
            title: "Groceries".to_string(),
            total_amount: Money::from_cents(4_200_050),
        };
        let value = serde_json::to_value(BudgetPlanDto::from(plan)).unwrap();
        assert_eq!(
            value,
            json!({ "id": id.to_string(), "title": "Groceries", "totalAmount": "42000.50" })
        );
    }

    #[test]
    fn transaction_body_uses_type_key() {
        let dto: NewTransactionDto = serde_json::from_value(json!({
            "householdId": 3,
            "type": "expense",
            "amount": "12.30",
            "occurredDate": "2024-01-20",
            "categoryId": 7
        }))
        .unwrap();
        let tx = UnvalidatedTransaction::from(dto);
        assert_eq!(tx.household_id, HouseholdId(3));
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.category_id, Some(CategoryId(7)));
        assert_eq!(tx.amount, Money::from_cents(1230));
    }

    #[test]
    fn member_age_is_computed_for_the_given_day() {
        let mut member = FamilyMember::new(HouseholdId(1), "Aiko", "daughter");
        member.birth_date = NaiveDate::from_ymd_opt(2015, 6, 1);
        let on = NaiveDate::from_ymd_opt(2024, 5, 31).unwrap();

        let value = serde_json::to_value(FamilyMemberDto::new(member, on)).unwrap();
        assert_eq!(value["age"], 8);
        assert_eq!(value["birthDate"], "2015-06-01");
        assert_eq!(value["householdId"], 1);
    }

    #[test]
    fn card_dates_clamp_to_the_cycle_month() {
        let card = CreditCard {
            id: Some(2),
            household_id: HouseholdId(1),
            name: "Rakuten".to_string(),
            brand: CardBrand::Jcb,
            closing_day: 31,
            payment_day: 27,
            limit_amount: Some(Money::from_cents(30_000_000)),
        };
        let value =
            serde_json::to_value(CreditCardDto::for_month(card, "2023-02".parse().unwrap()))
                .unwrap();
        assert_eq!(value["cycleMonth"], "2023-02");
        assert_eq!(value["closingDate"], "2023-02-28");
        assert_eq!(value["paymentDate"], "2023-02-27");
        assert_eq!(value["limitAmount"], "300000.00");
        assert_eq!(value["brand"], "jcb");
    }

    #[test]
    fn statement_response_carries_total() {
        let statement = CardStatement {
            id: Some(4),
            card_name: "Visa".to_string(),
            month: "2024-01".parse().unwrap(),
            closing_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            payment_due: NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            items: vec![
                StatementItem {
                    date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                    description: "Fuel".to_string(),
                    amount: Money::from_cents(550),
                },
                StatementItem {
                    date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
                    description: "Lunch".to_string(),
                    amount: Money::from_cents(1_025),
                },
            ],
        };
        let value = serde_json::to_value(CardStatementDto::from(statement)).unwrap();
        assert_eq!(value["total"], "15.75");
        assert_eq!(value["month"], "2024-01");
        assert_eq!(value["cardName"], "Visa");
        assert_eq!(value["items"][1]["description"], "Lunch");
    }
}
