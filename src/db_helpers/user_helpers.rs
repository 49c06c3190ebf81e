use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    authentication::hash_password_argon2,
    data_formats::{RegisterRequest, UpdateUserRequest},
    errors::RequestError,
    models::User,
};

use super::{fetch_user_by_id, QueryBuilder};

/// Expects `user.password` to already hold the argon2 hash.
pub async fn insert_user(pool: &SqlitePool, user: &RegisterRequest) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let id = sqlx::query(
        r#"
        INSERT INTO users (username, email, first_name, last_name, password, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.password)
    .bind(Utc::now())
    .execute(&mut tx)
    .await?
    .last_insert_rowid();
    let user = fetch_user_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(user)
}

pub async fn update_user_in_db(
    pool: &SqlitePool,
    id: i64,
    UpdateUserRequest {
        first_name,
        last_name,
        username,
        email,
        password,
    }: UpdateUserRequest,
) -> Result<User, RequestError> {
    let password = match password {
        Some(password) => Some(
            hash_password_argon2(password)
                .await
                .map_err(|_| RequestError::ServerError)?,
        ),
        None => None,
    };

    let mut tx = pool.begin().await?;
    let update = QueryBuilder::new("UPDATE users SET ".to_owned(), Some(", "))
        .add_param("first_name", first_name)
        .add_param("last_name", last_name)
        .add_param("username", username)
        .add_param("email", email)
        .add_param("password", password)
        .build();

    if let Some((query, params)) = update {
        let query = format!("{query} WHERE id = ?{}", params.len() + 1);
        let mut query = sqlx::query(&query);
        for param in params {
            query = query.bind(param);
        }
        query.bind(id).execute(&mut tx).await?;
    }

    let result = fetch_user_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::NotFound("User not found"))?;
    tx.commit().await?;
    Ok(result)
}

/// Removes the account together with its posts and comments.
pub async fn delete_user_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("User not found"));
    }
    tx.commit().await?;
    Ok(())
}
