use hearth_core::{Category, CategoryId, CategoryType};

use crate::db::{corrupt, DbPool, StorageError};

type CategoryRow = (i64, String, String, Option<String>);

fn category_from_row(
    (id, category_type, name, parent_type): CategoryRow,
) -> Result<Category, StorageError> {
    let category_type: CategoryType = category_type.parse().map_err(|e| corrupt("categories", e))?;
    let parent_type = parent_type
        .map(|p| p.parse::<CategoryType>())
        .transpose()
        .map_err(|e| corrupt("categories", e))?;

    Ok(Category {
        id: Some(CategoryId(id)),
        category_type,
        name,
        parent_type,
    })
}

pub async fn insert_category(pool: &DbPool, category: &Category) -> Result<Category, StorageError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO categories (category_type, name, parent_type) VALUES (?, ?, ?) RETURNING id",
    )
    .bind(category.category_type.as_str())
    .bind(&category.name)
    .bind(category.parent_type.map(CategoryType::as_str))
    .fetch_one(pool)
    .await?;

    Ok(Category {
        id: Some(CategoryId(id)),
        ..category.clone()
    })
}

pub async fn get_all_categories(pool: &DbPool) -> Result<Vec<Category>, StorageError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, category_type, name, parent_type FROM categories ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(category_from_row).collect()
}

pub async fn get_categories_by_parent_type(
    pool: &DbPool,
    parent_type: CategoryType,
) -> Result<Vec<Category>, StorageError> {
    let rows = sqlx::query_as::<_, CategoryRow>(
        "SELECT id, category_type, name, parent_type FROM categories WHERE parent_type = ? ORDER BY id",
    )
    .bind(parent_type.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(category_from_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::fresh_db;

    #[tokio::test]
    async fn filter_by_parent_type() {
        let (_dir, pool) = fresh_db().await;
        let food = Category::new(CategoryType::Expense, "Food")
            .unwrap()
            .with_parent(CategoryType::Expense);
        let food = insert_category(&pool, &food).await.unwrap();
        let salary = insert_category(&pool, &Category::new(CategoryType::Income, "Salary").unwrap())
            .await
            .unwrap();

        let expense = get_categories_by_parent_type(&pool, CategoryType::Expense).await.unwrap();
        assert_eq!(expense, vec![food.clone()]);
        let savings = get_categories_by_parent_type(&pool, CategoryType::Savings).await.unwrap();
        assert!(savings.is_empty());
        assert_eq!(get_all_categories(&pool).await.unwrap(), vec![food, salary]);
    }
}
