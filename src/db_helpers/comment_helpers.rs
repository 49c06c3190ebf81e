use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::{data_formats::CommentRequest, errors::RequestError, models::Comment};

use super::ensure_user_exists;

const COMMENT_QUERY: &str = r#"
        SELECT comments.id         AS "id",
               comments.text       AS "text",
               comments.created_at AS "created_at",
               comments.post_id    AS "post_id",
               comments.author_id  AS "author_id",
               users.username      AS "author_username"
        FROM   comments
            JOIN users
                ON users.id = comments.author_id
"#;

async fn fetch_comment_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Comment>, sqlx::Error> {
    let query = format!("{COMMENT_QUERY} WHERE comments.id = ?1");
    sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

fn validate_comment(CommentRequest { text }: &CommentRequest) -> Result<(), RequestError> {
    if text.trim().is_empty() {
        return Err(RequestError::RunTimeError("Comment text must not be empty"));
    }
    Ok(())
}

pub async fn add_comment_to_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    post_id: i64,
    request: CommentRequest,
) -> Result<Comment, RequestError> {
    validate_comment(&request)?;
    let mut tx = pool.begin().await?;
    ensure_user_exists(&mut tx, author_id).await?;

    let post = sqlx::query("SELECT 1 FROM posts WHERE id = ?1")
        .bind(post_id)
        .fetch_optional(&mut tx)
        .await?;
    if post.is_none() {
        return Err(RequestError::NotFound("Post not found"));
    }

    let id = sqlx::query(
        r#"
        INSERT INTO comments (text, created_at, post_id, author_id)
        VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(request.text)
    .bind(Utc::now())
    .bind(post_id)
    .bind(author_id)
    .execute(&mut tx)
    .await?
    .last_insert_rowid();

    let comment = fetch_comment_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn get_comment_by_id_in_db(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let comment = fetch_comment_by_id(&mut tx, id).await?;
    tx.commit().await?;
    Ok(comment)
}

/// Oldest first.
pub async fn get_comments_for_post_in_db(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Vec<Comment>, RequestError> {
    let mut tx = pool.begin().await?;
    let query = format!(
        "{COMMENT_QUERY} WHERE comments.post_id = ?1 ORDER BY comments.created_at ASC, comments.id ASC"
    );
    let comments = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(post_id)
        .fetch_all(&mut tx)
        .await?;
    tx.commit().await?;
    Ok(comments)
}

pub async fn update_comment_in_db(
    pool: &SqlitePool,
    id: i64,
    request: CommentRequest,
) -> Result<Comment, RequestError> {
    validate_comment(&request)?;
    let mut tx = pool.begin().await?;
    let result = sqlx::query("UPDATE comments SET text = ?1 WHERE id = ?2")
        .bind(request.text)
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Comment not found"));
    }
    let comment = fetch_comment_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::NotFound("Comment not found"))?;
    tx.commit().await?;
    Ok(comment)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM comments WHERE id = ?1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Comment not found"));
    }
    tx.commit().await?;
    Ok(())
}
