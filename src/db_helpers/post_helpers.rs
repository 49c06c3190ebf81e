use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::data_formats::{CreatePostRequest, UpdatePostRequest};
use crate::errors::RequestError;
use crate::feed::{compose_feed, AnnotatedPost, FeedScope};
use crate::models::{Category, Post};
use crate::visibility::resolve_post_for_detail;

use super::{category_helpers::fetch_category_by_slug, ensure_user_exists, fetch_user_by_username};

const POST_QUERY: &str = r#"
            SELECT posts.id                  AS "id",
                   posts.title               AS "title",
                   posts.text                AS "text",
                   posts.image               AS "image",
                   posts.pub_date            AS "pub_date",
                   posts.is_published        AS "is_published",
                   posts.created_at          AS "created_at",
                   posts.author_id           AS "author_id",
                   users.username            AS "author_username",
                   posts.category_id         AS "category_id",
                   categories.slug           AS "category_slug",
                   categories.title          AS "category_title",
                   categories.is_published   AS "category_is_published",
                   posts.location_id         AS "location_id",
                   locations.name            AS "location_name",
                   locations.is_published    AS "location_is_published"
            FROM   posts
                JOIN users
                    ON users.id = posts.author_id
                LEFT JOIN categories
                    ON categories.id = posts.category_id
                LEFT JOIN locations
                    ON locations.id = posts.location_id
"#;

const MAX_TITLE_LENGTH: usize = 256;

// ----------------- Connection-level queries -----------------

async fn fetch_post_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Post>, sqlx::Error> {
    let query = format!("{POST_QUERY} WHERE posts.id = ?1");
    sqlx::query_as::<Sqlite, Post>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Unordered candidates; `None` leaves that dimension unrestricted.
async fn fetch_posts(
    conn: &mut SqliteConnection,
    category_id: Option<i64>,
    author_id: Option<i64>,
) -> Result<Vec<Post>, sqlx::Error> {
    let query = format!(
        "{POST_QUERY} WHERE (posts.category_id = ?1 OR ?1 IS NULL) AND (posts.author_id = ?2 OR ?2 IS NULL)"
    );
    sqlx::query_as::<Sqlite, Post>(&query)
        .bind(category_id)
        .bind(author_id)
        .fetch_all(&mut *conn)
        .await
}

async fn fetch_comment_counts(
    conn: &mut SqliteConnection,
) -> Result<HashMap<i64, i64>, sqlx::Error> {
    let counts = sqlx::query_as::<Sqlite, (i64, i64)>(
        "SELECT post_id, COUNT(*) FROM comments GROUP BY post_id",
    )
    .fetch_all(&mut *conn)
    .await?;
    Ok(counts.into_iter().collect())
}

async fn validate_post_request(
    conn: &mut SqliteConnection,
    request: &CreatePostRequest,
) -> Result<(), RequestError> {
    let title_length = request.title.trim().chars().count();
    if title_length == 0 || title_length > MAX_TITLE_LENGTH {
        return Err(RequestError::RunTimeError(
            "Title must be between 1 and 256 characters",
        ));
    }
    if let Some(category_id) = request.category_id {
        let exists = sqlx::query("SELECT 1 FROM categories WHERE id = ?1")
            .bind(category_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(RequestError::RunTimeError("Category not found"));
        }
    }
    if let Some(location_id) = request.location_id {
        let exists = sqlx::query("SELECT 1 FROM locations WHERE id = ?1")
            .bind(location_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(RequestError::RunTimeError("Location not found"));
        }
    }
    Ok(())
}

async fn fetch_published_category(
    conn: &mut SqliteConnection,
    slug: &str,
) -> Result<Category, RequestError> {
    fetch_category_by_slug(conn, slug)
        .await?
        .filter(|category| category.publication.is_published)
        .ok_or(RequestError::NotFound("Category not found"))
}

// ----------------- Post Queries -----------------

pub async fn get_post_by_id_in_db(pool: &SqlitePool, id: i64) -> Result<Option<Post>, RequestError> {
    let mut tx = pool.begin().await?;
    let post = fetch_post_by_id(&mut tx, id).await?;
    tx.commit().await?;
    Ok(post)
}

/// Loads a post for its detail page, hiding it from viewers who may not see it.
pub async fn get_post_for_detail_in_db(
    pool: &SqlitePool,
    id: i64,
    viewer: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Post, RequestError> {
    let post = get_post_by_id_in_db(pool, id).await?;
    resolve_post_for_detail(post, viewer, now)
}

/// Resolves `scope`, then runs the feed pipeline over its posts.
///
/// `viewer_is_owner` is honoured as given; handlers only set it when the
/// viewer is the author the scope names.
pub async fn compose_feed_in_db(
    pool: &SqlitePool,
    scope: &FeedScope,
    viewer_is_owner: bool,
    now: DateTime<Utc>,
) -> Result<Vec<AnnotatedPost>, RequestError> {
    let mut tx = pool.begin().await?;
    let candidates = match scope {
        FeedScope::All => fetch_posts(&mut tx, None, None).await?,
        FeedScope::Category(slug) => {
            let category = fetch_published_category(&mut tx, slug).await?;
            fetch_posts(&mut tx, Some(category.id), None).await?
        }
        FeedScope::Author(username) => {
            let author = fetch_user_by_username(&mut tx, username)
                .await?
                .ok_or(RequestError::NotFound("User not found"))?;
            fetch_posts(&mut tx, None, Some(author.id)).await?
        }
    };
    let comment_counts = fetch_comment_counts(&mut tx).await?;
    tx.commit().await?;
    Ok(compose_feed(candidates, &comment_counts, viewer_is_owner, now))
}

/// The category page: the category and its public feed, read together.
pub async fn compose_category_feed_in_db(
    pool: &SqlitePool,
    slug: &str,
    now: DateTime<Utc>,
) -> Result<(Category, Vec<AnnotatedPost>), RequestError> {
    let mut tx = pool.begin().await?;
    let category = fetch_published_category(&mut tx, slug).await?;
    let candidates = fetch_posts(&mut tx, Some(category.id), None).await?;
    let comment_counts = fetch_comment_counts(&mut tx).await?;
    tx.commit().await?;
    Ok((category, compose_feed(candidates, &comment_counts, false, now)))
}

pub async fn create_post_in_db(
    pool: &SqlitePool,
    author_id: i64,
    request: CreatePostRequest,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;
    ensure_user_exists(&mut tx, author_id).await?;
    validate_post_request(&mut tx, &request).await?;
    let CreatePostRequest {
        title,
        text,
        image,
        pub_date,
        is_published,
        category_id,
        location_id,
    } = request;

    let id = sqlx::query(
        r#"
        INSERT INTO posts (title, text, image, pub_date, is_published, created_at, author_id, category_id, location_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(image)
    .bind(pub_date)
    .bind(is_published)
    .bind(Utc::now())
    .bind(author_id)
    .bind(category_id)
    .bind(location_id)
    .execute(&mut tx)
    .await?
    .last_insert_rowid();

    let post = fetch_post_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::ServerError)?;
    tx.commit().await?;
    Ok(post)
}

/// Callers check ownership first; this only writes.
pub async fn update_post_in_db(
    pool: &SqlitePool,
    id: i64,
    request: UpdatePostRequest,
) -> Result<Post, RequestError> {
    let mut tx = pool.begin().await?;
    validate_post_request(&mut tx, &request).await?;
    let CreatePostRequest {
        title,
        text,
        image,
        pub_date,
        is_published,
        category_id,
        location_id,
    } = request;

    let result = sqlx::query(
        r#"
        UPDATE posts
        SET title = ?1, text = ?2, image = ?3, pub_date = ?4, is_published = ?5, category_id = ?6, location_id = ?7
        WHERE id = ?8
        "#,
    )
    .bind(title)
    .bind(text)
    .bind(image)
    .bind(pub_date)
    .bind(is_published)
    .bind(category_id)
    .bind(location_id)
    .bind(id)
    .execute(&mut tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Post not found"));
    }

    let post = fetch_post_by_id(&mut tx, id)
        .await?
        .ok_or(RequestError::NotFound("Post not found"))?;
    tx.commit().await?;
    Ok(post)
}

/// Comments go with the post through the foreign-key cascade.
pub async fn delete_post_in_db(pool: &SqlitePool, id: i64) -> Result<(), RequestError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query("DELETE FROM posts WHERE id = ?1")
        .bind(id)
        .execute(&mut tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(RequestError::NotFound("Post not found"));
    }
    tx.commit().await?;
    Ok(())
}
