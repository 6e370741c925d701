use chrono::NaiveDate;
use hearth_core::{FamilyMember, Household, HouseholdId};

use crate::db::{corrupt, DbPool, StorageError};

pub async fn insert_household(
    pool: &DbPool,
    household: &Household,
) -> Result<Household, StorageError> {
    let id: i64 = sqlx::query_scalar("INSERT INTO households (name) VALUES (?) RETURNING id")
        .bind(&household.name)
        .fetch_one(pool)
        .await?;

    Ok(Household {
        id: Some(HouseholdId(id)),
        name: household.name.clone(),
    })
}

pub async fn get_all_households(pool: &DbPool) -> Result<Vec<Household>, StorageError> {
    let rows = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM households ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(id, name)| Household {
            id: Some(HouseholdId(id)),
            name,
        })
        .collect())
}

pub async fn get_household(
    pool: &DbPool,
    id: HouseholdId,
) -> Result<Option<Household>, StorageError> {
    let row = sqlx::query_as::<_, (i64, String)>("SELECT id, name FROM households WHERE id = ?")
        .bind(id.0)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|(id, name)| Household {
        id: Some(HouseholdId(id)),
        name,
    }))
}

#[derive(Debug, sqlx::FromRow)]
struct MemberRow {
    id: i64,
    household_id: i64,
    name: String,
    relationship: String,
    birth_date: Option<NaiveDate>,
    gender: Option<String>,
    employment_status: Option<String>,
    school_start_age: Option<i64>,
    retirement_age: Option<i64>,
    memo: Option<String>,
}

fn age(value: Option<i64>) -> Result<Option<u8>, StorageError> {
    value
        .map(|v| {
            u8::try_from(v)
                .map_err(|_| corrupt("family_members", format!("age {v} out of range")))
        })
        .transpose()
}

impl TryFrom<MemberRow> for FamilyMember {
    type Error = StorageError;

    fn try_from(r: MemberRow) -> Result<Self, Self::Error> {
        Ok(FamilyMember {
            id: Some(r.id),
            household_id: HouseholdId(r.household_id),
            name: r.name,
            relationship: r.relationship,
            birth_date: r.birth_date,
            gender: r.gender,
            employment_status: r.employment_status,
            school_start_age: age(r.school_start_age)?,
            retirement_age: age(r.retirement_age)?,
            memo: r.memo,
        })
    }
}

pub async fn insert_family_member(
    pool: &DbPool,
    member: &FamilyMember,
) -> Result<FamilyMember, StorageError> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO family_members (
            household_id, name, relationship, birth_date, gender, employment_status,
            school_start_age, retirement_age, memo
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(member.household_id.0)
    .bind(&member.name)
    .bind(&member.relationship)
    .bind(member.birth_date)
    .bind(&member.gender)
    .bind(&member.employment_status)
    .bind(member.school_start_age.map(i64::from))
    .bind(member.retirement_age.map(i64::from))
    .bind(&member.memo)
    .fetch_one(pool)
    .await?;

    Ok(FamilyMember {
        id: Some(id),
        ..member.clone()
    })
}

pub async fn get_family_members(
    pool: &DbPool,
    household_id: HouseholdId,
) -> Result<Vec<FamilyMember>, StorageError> {
    let rows = sqlx::query_as::<_, MemberRow>(
        r#"
        SELECT id, household_id, name, relationship, birth_date, gender, employment_status,
               school_start_age, retirement_age, memo
        FROM family_members
        WHERE household_id = ?
        ORDER BY id
        "#,
    )
    .bind(household_id.0)
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(FamilyMember::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::fresh_db;

    async fn household(pool: &DbPool, name: &str) -> HouseholdId {
        let household = Household::new(name).unwrap();
        insert_household(pool, &household).await.unwrap().id.unwrap()
    }

    #[tokio::test]
    async fn household_round_trip() {
        let (_dir, pool) = fresh_db().await;
        let a = insert_household(&pool, &Household::new("Sato").unwrap()).await.unwrap();
        let b = insert_household(&pool, &Household::new("Suzuki").unwrap()).await.unwrap();

        assert_eq!(get_all_households(&pool).await.unwrap(), vec![a.clone(), b]);
        assert_eq!(get_household(&pool, a.id.unwrap()).await.unwrap(), Some(a));
        assert_eq!(get_household(&pool, HouseholdId(999)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn members_belong_to_their_household() {
        let (_dir, pool) = fresh_db().await;
        let h = household(&pool, "Sato").await;
        let other = household(&pool, "Ito").await;

        let mut child = FamilyMember::new(h, "Yui", "daughter");
        child.birth_date = NaiveDate::from_ymd_opt(2018, 4, 2);
        child.school_start_age = Some(6);
        let stored = insert_family_member(&pool, &child).await.unwrap();
        insert_family_member(&pool, &FamilyMember::new(other, "Jun", "self")).await.unwrap();

        let members = get_family_members(&pool, h).await.unwrap();
        assert_eq!(members, vec![stored]);
        assert_eq!(members[0].school_start_age, Some(6));
    }

    #[tokio::test]
    async fn member_of_unknown_household_is_rejected() {
        let (_dir, pool) = fresh_db().await;
        let ghost = FamilyMember::new(HouseholdId(5), "Ghost", "self");
        let result = insert_family_member(&pool, &ghost).await;
        assert!(matches!(result, Err(StorageError::Database(_))));
    }
}
