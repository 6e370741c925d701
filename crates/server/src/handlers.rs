use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use hearth_core::{
    BudgetPlan, BudgetPlanId, CardStatement, Category, DateRange, FinanceError, HouseholdId,
    UnvalidatedTransaction, YearMonth,
};
use hearth_storage as storage;
use tracing::debug;
use uuid::Uuid;

use crate::dto::*;
use crate::error::ApiResult;
use crate::AppState;

pub async fn health() -> &'static str {
    "ok"
}

/// Nested household routes answer 404 for unknown households instead of a foreign-key failure.
async fn require_household(state: &AppState, id: i64) -> ApiResult<HouseholdId> {
    let household_id = HouseholdId(id);
    match storage::get_household(&state.db, household_id).await? {
        Some(_) => Ok(household_id),
        None => Err(FinanceError::NotFound(format!("household {id}")).into()),
    }
}

fn optional_month(filter: &MonthFilter) -> ApiResult<Option<YearMonth>> {
    Ok(filter.month.as_deref().map(str::parse::<YearMonth>).transpose()?)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// ── Cashflow ──────────────────────────────────────────────────────────────────

pub async fn monthly_cashflow(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Json<CashflowSummaryDto>> {
    let month: YearMonth = query.month.parse()?;
    let summary = state
        .cashflow
        .monthly_summary(HouseholdId(query.household_id), month)
        .await?;
    Ok(Json(summary.into()))
}

pub async fn range_cashflow(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<CashflowSummaryDto>> {
    let summary = state
        .cashflow
        .summary_for_range(
            HouseholdId(query.household_id),
            DateRange::new(query.from, query.to),
        )
        .await?;
    Ok(Json(summary.into()))
}

// ── Transactions ──────────────────────────────────────────────────────────────

pub async fn create_transaction(
    State(state): State<AppState>,
    Json(body): Json<NewTransactionDto>,
) -> ApiResult<(StatusCode, Json<TransactionDto>)> {
    let stored = state
        .cashflow
        .record(UnvalidatedTransaction::from(body))
        .await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<MonthlyQuery>,
) -> ApiResult<Json<Vec<TransactionDto>>> {
    let month: YearMonth = query.month.parse()?;
    let rows = state
        .cashflow
        .transactions_in(HouseholdId(query.household_id), month)
        .await?;
    debug!(count = rows.len(), "Listed transactions");
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ── Budget plans ──────────────────────────────────────────────────────────────

pub async fn list_budgets(State(state): State<AppState>) -> ApiResult<Json<Vec<BudgetPlanDto>>> {
    let plans = state.budgets.find_all().await?;
    Ok(Json(plans.into_iter().map(Into::into).collect()))
}

pub async fn create_budget(
    State(state): State<AppState>,
    Json(body): Json<BudgetPlanDto>,
) -> ApiResult<(StatusCode, Json<BudgetPlanDto>)> {
    let stored = state.budgets.create(BudgetPlan::from(body)).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn get_budget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BudgetPlanDto>> {
    let plan = state.budgets.get(BudgetPlanId(id)).await?;
    Ok(Json(plan.into()))
}

pub async fn delete_budget(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.budgets.delete(BudgetPlanId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Households & members ──────────────────────────────────────────────────────

pub async fn create_household(
    State(state): State<AppState>,
    Json(body): Json<NewHouseholdDto>,
) -> ApiResult<(StatusCode, Json<HouseholdDto>)> {
    let household = hearth_core::Household::new(&body.name)?;
    let stored = storage::insert_household(&state.db, &household).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_households(State(state): State<AppState>) -> ApiResult<Json<Vec<HouseholdDto>>> {
    let rows = storage::get_all_households(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_household(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<HouseholdDto>> {
    let household = storage::get_household(&state.db, HouseholdId(id))
        .await?
        .ok_or_else(|| FinanceError::NotFound(format!("household {id}")))?;
    Ok(Json(household.into()))
}

pub async fn add_member(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewFamilyMemberDto>,
) -> ApiResult<(StatusCode, Json<FamilyMemberDto>)> {
    let household_id = require_household(&state, id).await?;
    let member = body.into_member(household_id).validate()?;
    let stored = storage::insert_family_member(&state.db, &member).await?;
    Ok((StatusCode::CREATED, Json(FamilyMemberDto::new(stored, today()))))
}

pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Vec<FamilyMemberDto>>> {
    let household_id = require_household(&state, id).await?;
    let rows = storage::get_family_members(&state.db, household_id).await?;
    let on = today();
    Ok(Json(rows.into_iter().map(|m| FamilyMemberDto::new(m, on)).collect()))
}

// ── Credit cards ──────────────────────────────────────────────────────────────

pub async fn add_card(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewCreditCardDto>,
) -> ApiResult<(StatusCode, Json<CreditCardDto>)> {
    let household_id = require_household(&state, id).await?;
    let card = body.into_card(household_id).validate()?;
    let stored = storage::insert_credit_card(&state.db, &card).await?;
    let month = YearMonth::of(today());
    Ok((StatusCode::CREATED, Json(CreditCardDto::for_month(stored, month))))
}

/// Closing and payment dates are resolved for `?month=YYYY-MM`, or the current month.
pub async fn list_cards(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(filter): Query<MonthFilter>,
) -> ApiResult<Json<Vec<CreditCardDto>>> {
    let household_id = require_household(&state, id).await?;
    let month = optional_month(&filter)?.unwrap_or_else(|| YearMonth::of(today()));
    let rows = storage::get_credit_cards(&state.db, household_id).await?;
    let cards = rows
        .into_iter()
        .map(|c| CreditCardDto::for_month(c, month))
        .collect();
    Ok(Json(cards))
}

// ── Fixed costs ───────────────────────────────────────────────────────────────

pub async fn add_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewFixedCostDto>,
) -> ApiResult<(StatusCode, Json<FixedCostDto>)> {
    let household_id = require_household(&state, id).await?;
    let cost = body.into_fixed_cost(household_id).validate()?;
    let stored = storage::insert_fixed_cost(&state.db, &cost).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

/// With `?month=YYYY-MM`, only the costs active during that month.
pub async fn list_fixed_costs(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(filter): Query<MonthFilter>,
) -> ApiResult<Json<Vec<FixedCostDto>>> {
    let household_id = require_household(&state, id).await?;
    let rows = match optional_month(&filter)? {
        Some(month) => storage::get_active_fixed_costs(&state.db, household_id, month).await?,
        None => storage::get_fixed_costs(&state.db, household_id).await?,
    };
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn delete_fixed_cost(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    let removed = storage::delete_fixed_cost(&state.db, id).await?;
    debug!(id, removed, "Fixed cost delete");
    Ok(StatusCode::NO_CONTENT)
}

// ── Salaries ──────────────────────────────────────────────────────────────────

pub async fn add_salary(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<NewSalaryDto>,
) -> ApiResult<(StatusCode, Json<SalaryDto>)> {
    let household_id = require_household(&state, id).await?;
    let salary = body.into_salary(household_id).validate()?;
    let stored = storage::insert_salary(&state.db, &salary).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_salaries(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(filter): Query<MonthFilter>,
) -> ApiResult<Json<Vec<SalaryDto>>> {
    let household_id = require_household(&state, id).await?;
    let month = optional_month(&filter)?;
    let rows = storage::get_salaries(&state.db, household_id, month).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ── Categories ────────────────────────────────────────────────────────────────

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<NewCategoryDto>,
) -> ApiResult<(StatusCode, Json<CategoryDto>)> {
    let mut category = Category::new(body.category_type, &body.name)?;
    if let Some(parent) = body.parent_type {
        category = category.with_parent(parent);
    }
    let stored = storage::insert_category(&state.db, &category).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_categories(
    State(state): State<AppState>,
    Query(query): Query<CategoryQuery>,
) -> ApiResult<Json<Vec<CategoryDto>>> {
    let rows = match query.parent_type {
        Some(parent) => storage::get_categories_by_parent_type(&state.db, parent).await?,
        None => storage::get_all_categories(&state.db).await?,
    };
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

// ── Card statements ───────────────────────────────────────────────────────────

pub async fn create_statement(
    State(state): State<AppState>,
    Json(body): Json<NewCardStatementDto>,
) -> ApiResult<(StatusCode, Json<CardStatementDto>)> {
    let statement = CardStatement::from(body).validate()?;
    let stored = storage::insert_card_statement(&state.db, &statement).await?;
    Ok((StatusCode::CREATED, Json(stored.into())))
}

pub async fn list_statements(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<CardStatementDto>>> {
    let rows = storage::get_all_card_statements(&state.db).await?;
    Ok(Json(rows.into_iter().map(Into::into).collect()))
}

pub async fn get_statement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<CardStatementDto>> {
    let statement = storage::get_card_statement(&state.db, id)
        .await?
        .ok_or_else(|| FinanceError::NotFound(format!("card statement {id}")))?;
    Ok(Json(statement.into()))
}
