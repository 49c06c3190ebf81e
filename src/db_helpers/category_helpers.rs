use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::{data_formats::CreateCategoryRequest, errors::RequestError, models::Category};

const CATEGORY_COLUMNS: &str = "id, title, description, slug, is_published, created_at";

/// Slugs are restricted to ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub(super) async fn fetch_category_by_slug(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<Option<Category>, sqlx::Error> {
    let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = ?1");
    sqlx::query_as::<Sqlite, Category>(&query)
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await
}

pub async fn create_category_in_db(
    pool: &SqlitePool,
    CreateCategoryRequest {
        title,
        description,
        slug,
        is_published,
    }: CreateCategoryRequest,
) -> Result<Category, RequestError> {
    if title.trim().is_empty() || title.chars().count() > 256 {
        return Err(RequestError::RunTimeError(
            "Title must be between 1 and 256 characters",
        ));
    }
    if !is_valid_slug(&slug) {
        return Err(RequestError::RunTimeError(
            "Slug may only contain latin letters, digits, hyphens and underscores",
        ));
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        INSERT INTO categories (title, description, slug, is_published, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&title)
    .bind(&description)
    .bind(&slug)
    .bind(is_published)
    .bind(Utc::now())
    .execute(&mut tx)
    .await?;
    let category = fetch_category_by_slug(&mut tx, &slug)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(category)
}

/// Posts in the category survive with their category cleared.
pub async fn delete_category_in_db(pool: &SqlitePool, slug: &str) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM categories WHERE slug = ?1")
        .bind(slug)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Category not found"));
    }
    tx.commit().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::is_valid_slug;

    #[test]
    fn slugs_are_url_safe() {
        assert!(is_valid_slug("travel_notes-2024"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("путешествия"));
        assert!(!is_valid_slug("a/b"));
    }
}
