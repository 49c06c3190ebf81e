use sqlx::SqlitePool;

use crate::{errors::RequestError, models::User};

use super::fetch_user_by_username;

pub async fn get_profile_by_username_in_db(
    pool: &SqlitePool,
    username: &str,
) -> Result<User, RequestError> {
    let mut tx = pool.begin().await?;
    let profile = fetch_user_by_username(&mut tx, username).await?;
    tx.commit().await?;
    profile.ok_or(RequestError::NotFound("User not found"))
}
