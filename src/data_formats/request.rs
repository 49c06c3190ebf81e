use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ----------------- User Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "firstName")]
    pub first_name: String,
    #[serde(default, rename = "lastName")]
    pub last_name: String,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct UpdateUserRequest {
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

// ----------------- Post Request -----------------
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreatePostRequest {
    pub title: String,
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: DateTime<Utc>,
    #[serde(default = "published_by_default", rename = "isPublished")]
    pub is_published: bool,
    #[serde(default, rename = "categoryId")]
    pub category_id: Option<i64>,
    #[serde(default, rename = "locationId")]
    pub location_id: Option<i64>,
}

/// Full replacement of a post's editable fields.
pub type UpdatePostRequest = CreatePostRequest;

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CommentRequest {
    pub text: String,
}

// ----------------- Category / Location Request -----------------
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateCategoryRequest {
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(default = "published_by_default", rename = "isPublished")]
    pub is_published: bool,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CreateLocationRequest {
    pub name: String,
    #[serde(default = "published_by_default", rename = "isPublished")]
    pub is_published: bool,
}

fn published_by_default() -> bool {
    true
}
