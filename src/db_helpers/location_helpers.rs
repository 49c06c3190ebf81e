use chrono::Utc;
use sqlx::{Sqlite, SqlitePool};

use crate::{data_formats::CreateLocationRequest, errors::RequestError, models::Location};

pub async fn create_location_in_db(
    pool: &SqlitePool,
    CreateLocationRequest { name, is_published }: CreateLocationRequest,
) -> Result<Location, RequestError> {
    if name.trim().is_empty() || name.chars().count() > 256 {
        return Err(RequestError::RunTimeError(
            "Name must be between 1 and 256 characters",
        ));
    }
    let mut tx = pool.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO locations (name, is_published, created_at)
        VALUES (?1, ?2, ?3)
        "#,
    )
    .bind(name)
    .bind(is_published)
    .bind(Utc::now())
    .execute(&mut tx)
    .await?
    .last_insert_rowid();

    let location = sqlx::query_as::<Sqlite, Location>(
        "SELECT id, name, is_published, created_at FROM locations WHERE id = ?1",
    )
    .bind(id)
    .fetch_one(&mut tx)
    .await?;
    tx.commit().await?;
    Ok(location)
}

/// Posts at the location survive with their location cleared.
pub async fn delete_location_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM locations WHERE id = ?1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Location not found"));
    }
    tx.commit().await?;
    Ok(())
}
