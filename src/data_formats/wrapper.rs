use serde::{Deserialize, Serialize};

use super::response::{
    AnnotatedPostResponse, CategoryResponse, CommentResponse, PostResponse, ProfileResponse,
};

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper<T> {
    pub user: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ProfileWrapper {
    pub profile: ProfileResponse,
    #[serde(flatten)]
    pub posts: MultiplePostsWrapper,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper<T> {
    pub comment: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostWrapper<T> {
    pub post: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct PostDetailWrapper {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultiplePostsWrapper {
    pub posts: Vec<AnnotatedPostResponse>,
    #[serde(rename = "postsCount")]
    pub posts_count: usize,
    pub page: usize,
    #[serde(rename = "numPages")]
    pub num_pages: usize,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryWrapper<T> {
    pub category: T,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CategoryPostsWrapper {
    pub category: CategoryResponse,
    #[serde(flatten)]
    pub posts: MultiplePostsWrapper,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LocationWrapper<T> {
    pub location: T,
}

impl<T> UserWrapper<T> {
    pub fn wrap_with_user_data(request: T) -> UserWrapper<T> {
        UserWrapper { user: request }
    }
}
