//! Menu Model and Database Operations
//!
//! Menus are navigation entries ordered by `seat_number`, optionally
//! pointing at a category or an external link.

use serde::{Deserialize, Serialize};
use sqlx::SqliteExecutor;

/// Menu row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Menu {
    pub id: i64,
    pub title: String,
    pub seat_number: i64,
    #[serde(rename = "category")]
    pub category_id: Option<i64>,
    pub link: Option<String>,
}

pub async fn list_menus<'e, E: SqliteExecutor<'e>>(executor: E) -> Result<Vec<Menu>, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        "SELECT id, title, seat_number, category_id, link FROM menus ORDER BY seat_number, id",
    )
    .fetch_all(executor)
    .await
}

pub async fn get_menu<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<Option<Menu>, sqlx::Error> {
    sqlx::query_as::<_, Menu>("SELECT id, title, seat_number, category_id, link FROM menus WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Insert a menu; `menu.id` is ignored
pub async fn insert_menu<'e, E: SqliteExecutor<'e>>(executor: E, menu: &Menu) -> Result<Menu, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        INSERT INTO menus (title, seat_number, category_id, link)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, seat_number, category_id, link
        "#,
    )
    .bind(&menu.title)
    .bind(menu.seat_number)
    .bind(menu.category_id)
    .bind(&menu.link)
    .fetch_one(executor)
    .await
}

pub async fn update_menu<'e, E: SqliteExecutor<'e>>(executor: E, menu: &Menu) -> Result<Menu, sqlx::Error> {
    sqlx::query_as::<_, Menu>(
        r#"
        UPDATE menus
        SET title = $1, seat_number = $2, category_id = $3, link = $4
        WHERE id = $5
        RETURNING id, title, seat_number, category_id, link
        "#,
    )
    .bind(&menu.title)
    .bind(menu.seat_number)
    .bind(menu.category_id)
    .bind(&menu.link)
    .bind(menu.id)
    .fetch_one(executor)
    .await
}

pub async fn delete_menu<'e, E: SqliteExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM menus WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::test_support::test_pool;

    fn menu(title: &str, seat_number: i64) -> Menu {
        Menu {
            id: 0,
            title: title.to_string(),
            seat_number,
            category_id: None,
            link: None,
        }
    }

    #[tokio::test]
    async fn test_listed_by_seat_number() {
        let pool = test_pool().await;
        insert_menu(&pool, &menu("About", 2)).await.unwrap();
        insert_menu(&pool, &menu("Home", 0)).await.unwrap();
        insert_menu(&pool, &menu("Blog", 1)).await.unwrap();

        let titles: Vec<String> = list_menus(&pool).await.unwrap().into_iter().map(|m| m.title).collect();
        assert_eq!(titles, vec!["Home", "Blog", "About"]);
    }

    #[tokio::test]
    async fn test_negative_seat_is_rejected_by_schema() {
        let pool = test_pool().await;
        assert!(insert_menu(&pool, &menu("Bad", -1)).await.is_err());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let pool = test_pool().await;
        let mut created = insert_menu(&pool, &menu("Home", 0)).await.unwrap();

        created.link = Some("https://example.com".to_string());
        let updated = update_menu(&pool, &created).await.unwrap();
        assert_eq!(updated.link.as_deref(), Some("https://example.com"));

        assert!(delete_menu(&pool, created.id).await.unwrap());
        assert!(get_menu(&pool, created.id).await.unwrap().is_none());
    }
}
