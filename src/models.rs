use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, FromRow, Row};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Publication state shared by categories, locations and posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Publication {
    fn from_columns(row: &SqliteRow, published: &str, created: &str) -> Result<Self, sqlx::Error> {
        Ok(Publication {
            is_published: row.try_get(published)?,
            created_at: row.try_get(created)?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub publication: Publication,
}

#[derive(Debug, Clone)]
pub struct Location {
    pub id: i64,
    pub name: String,
    pub publication: Publication,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorRef {
    pub id: i64,
    pub username: String,
}

/// The slice of a category a post carries along from the join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRef {
    pub id: i64,
    pub name: String,
    pub is_published: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
    pub publication: Publication,
    pub author: AuthorRef,
    pub category: Option<CategoryRef>,
    pub location: Option<LocationRef>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub post_id: i64,
    pub author_id: i64,
    pub author_username: String,
}

impl<'r> FromRow<'r, SqliteRow> for Category {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Category {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            slug: row.try_get("slug")?,
            publication: Publication::from_columns(row, "is_published", "created_at")?,
        })
    }
}

impl<'r> FromRow<'r, SqliteRow> for Location {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Location {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            publication: Publication::from_columns(row, "is_published", "created_at")?,
        })
    }
}

// Expects the column aliases produced by `POST_QUERY` in the post helpers.
impl<'r> FromRow<'r, SqliteRow> for Post {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let category = match row.try_get::<Option<i64>, _>("category_id")? {
            Some(id) => Some(CategoryRef {
                id,
                slug: row.try_get("category_slug")?,
                title: row.try_get("category_title")?,
                is_published: row.try_get("category_is_published")?,
            }),
            None => None,
        };
        let location = match row.try_get::<Option<i64>, _>("location_id")? {
            Some(id) => Some(LocationRef {
                id,
                name: row.try_get("location_name")?,
                is_published: row.try_get("location_is_published")?,
            }),
            None => None,
        };
        Ok(Post {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            text: row.try_get("text")?,
            image: row.try_get("image")?,
            pub_date: row.try_get("pub_date")?,
            publication: Publication::from_columns(row, "is_published", "created_at")?,
            author: AuthorRef {
                id: row.try_get("author_id")?,
                username: row.try_get("author_username")?,
            },
            category,
            location,
        })
    }
}

impl AsRef<Post> for Post {
    fn as_ref(&self) -> &Post {
        self
    }
}
