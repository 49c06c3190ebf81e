use sqlx::{SqliteConnection, SqlitePool};

use crate::{errors::RequestError, models::User};

mod category_helpers;
mod comment_helpers;
mod location_helpers;
mod post_helpers;
mod profile_helpers;
mod user_helpers;

pub use category_helpers::*;
pub use comment_helpers::*;
pub use location_helpers::*;
pub use post_helpers::*;
pub use profile_helpers::*;
pub use user_helpers::*;

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, password, created_at";

/// Accumulates `column = ?N` fragments for partial updates.
struct QueryBuilder {
    query: String,
    params: Vec<String>,
    seperator: Option<&'static str>,
    counter: usize,
}

impl QueryBuilder {
    fn new(initial: String, seperator: Option<&'static str>) -> Self {
        Self {
            query: initial,
            params: vec![],
            seperator,
            counter: 0,
        }
    }

    fn add_param(mut self, column: &str, param: Option<String>) -> Self {
        if let Some(value) = param {
            let filter = format!("{} = ?{}", column, self.params.len() + 1);
            self.query.push_str(&filter);
            if let Some(seperator) = self.seperator {
                self.query.push_str(seperator);
            }
            self.params.push(value);
            self.counter += 1;
        }
        self
    }

    fn trim(mut self) -> Self {
        if let Some(seperator) = self.seperator {
            self.query = self.query.trim_end_matches(seperator).to_string();
        }
        self
    }

    /// Returns `None` when no column was set.
    fn build(mut self) -> Option<(String, Vec<String>)> {
        self = self.trim();
        if self.counter == 0 {
            return None;
        }
        Some((self.query, self.params))
    }
}

// ----------------- Helper Functions -----------------

async fn fetch_user_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");
    sqlx::query_as::<_, User>(&query)
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_user_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Tokens outlive accounts; writes on behalf of a deleted user stop here.
async fn ensure_user_exists(conn: &mut SqliteConnection, id: i64) -> Result<(), RequestError> {
    fetch_user_by_id(conn, id)
        .await?
        .map(|_| ())
        .ok_or(RequestError::NotAuthorized("User no longer exists"))
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = fetch_user_by_username(&mut tx, username).await?;
    tx.commit().await?;
    Ok(result)
}

pub async fn get_user_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, RequestError> {
    let mut tx = pool.begin().await?;
    let result = fetch_user_by_id(&mut tx, id).await?;
    tx.commit().await?;
    Ok(result)
}
