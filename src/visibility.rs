//! Which posts a viewer is allowed to see.
//!
//! Every function here is pure. Callers capture `now` once per request and
//! pass the same instant to every check so one evaluation never straddles a
//! publication boundary.

use chrono::{DateTime, Utc};

use crate::{errors::RequestError, feed::order_posts, models::Post};

/// The rule applied to anyone who is not the post's author.
///
/// A post without a category is never publicly visible.
pub fn is_publicly_visible(post: &Post, now: DateTime<Utc>) -> bool {
    post.publication.is_published
        && post.pub_date <= now
        && post
            .category
            .as_ref()
            .map_or(false, |category| category.is_published)
}

pub fn is_visible_to(post: &Post, viewer: Option<i64>, now: DateTime<Utc>) -> bool {
    viewer == Some(post.author.id) || is_publicly_visible(post, now)
}

/// Filters `candidates` down to what `viewer` may see, in feed order.
pub fn visible_posts<I>(candidates: I, viewer: Option<i64>, now: DateTime<Utc>) -> Vec<Post>
where
    I: IntoIterator<Item = Post>,
{
    let mut posts: Vec<Post> = candidates
        .into_iter()
        .filter(|post| is_visible_to(post, viewer, now))
        .collect();
    order_posts(&mut posts);
    posts
}

/// Resolves a post for its detail page.
///
/// Hidden posts answer with the same `NotFound` as missing ones.
pub fn resolve_post_for_detail(
    post: Option<Post>,
    viewer: Option<i64>,
    now: DateTime<Utc>,
) -> Result<Post, RequestError> {
    match post {
        Some(post) if is_visible_to(&post, viewer, now) => Ok(post),
        _ => Err(RequestError::NotFound("Post not found")),
    }
}
