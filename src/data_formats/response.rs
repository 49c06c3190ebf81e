use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::feed::{AnnotatedPost, Page};
use crate::models::{Category, Comment, Location, Post, User};

use super::wrapper::MultiplePostsWrapper;

#[derive(Deserialize, Serialize, Debug)]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub token: String,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileResponse {
    pub username: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    #[serde(rename = "dateJoined")]
    pub date_joined: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct AuthorResponse {
    pub id: i64,
    pub username: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostCategoryResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostLocationResponse {
    pub id: i64,
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostResponse {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub image: Option<String>,
    #[serde(rename = "pubDate")]
    pub pub_date: DateTime<Utc>,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    pub author: AuthorResponse,
    pub category: Option<PostCategoryResponse>,
    pub location: Option<PostLocationResponse>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct AnnotatedPostResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    #[serde(rename = "commentCount")]
    pub comment_count: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CommentResponse {
    pub id: i64,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "postId")]
    pub post_id: i64,
    pub author: AuthorResponse,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct CategoryResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub slug: String,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "isPublished")]
    pub is_published: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn new(
        User {
            username,
            email,
            first_name,
            last_name,
            ..
        }: User,
        token: String,
    ) -> Self {
        UserResponse {
            username,
            email,
            first_name,
            last_name,
            token,
        }
    }
}

impl ProfileResponse {
    pub fn new(
        User {
            username,
            first_name,
            last_name,
            created_at,
            ..
        }: User,
    ) -> Self {
        ProfileResponse {
            username,
            first_name,
            last_name,
            date_joined: created_at.to_rfc3339(),
        }
    }
}

impl PostResponse {
    pub fn new(
        Post {
            id,
            title,
            text,
            image,
            pub_date,
            publication,
            author,
            category,
            location,
        }: Post,
    ) -> Self {
        PostResponse {
            id,
            title,
            text,
            image,
            pub_date,
            is_published: publication.is_published,
            created_at: publication.created_at,
            author: AuthorResponse {
                id: author.id,
                username: author.username,
            },
            category: category.map(|category| PostCategoryResponse {
                id: category.id,
                slug: category.slug,
                title: category.title,
            }),
            // Hidden locations are shown as if none was set.
            location: location
                .filter(|location| location.is_published)
                .map(|location| PostLocationResponse {
                    id: location.id,
                    name: location.name,
                }),
        }
    }
}

impl AnnotatedPostResponse {
    pub fn new(AnnotatedPost { post, comment_count }: AnnotatedPost) -> Self {
        AnnotatedPostResponse {
            post: PostResponse::new(post),
            comment_count,
        }
    }
}

impl MultiplePostsWrapper {
    pub fn new(page: Page<AnnotatedPost>) -> Self {
        MultiplePostsWrapper {
            posts: page
                .items
                .into_iter()
                .map(AnnotatedPostResponse::new)
                .collect(),
            posts_count: page.total,
            page: page.number,
            num_pages: page.num_pages,
        }
    }
}

impl CommentResponse {
    pub fn new(
        Comment {
            id,
            text,
            created_at,
            post_id,
            author_id,
            author_username,
        }: Comment,
    ) -> Self {
        CommentResponse {
            id,
            text,
            created_at,
            post_id,
            author: AuthorResponse {
                id: author_id,
                username: author_username,
            },
        }
    }
}

impl CategoryResponse {
    pub fn new(
        Category {
            id,
            title,
            description,
            slug,
            publication,
        }: Category,
    ) -> Self {
        CategoryResponse {
            id,
            title,
            description,
            slug,
            is_published: publication.is_published,
            created_at: publication.created_at,
        }
    }
}

impl LocationResponse {
    pub fn new(
        Location {
            id,
            name,
            publication,
        }: Location,
    ) -> Self {
        LocationResponse {
            id,
            name,
            is_published: publication.is_published,
            created_at: publication.created_at,
        }
    }
}
