use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{errors::RequestError, models::Post, visibility::is_publicly_visible};

pub const PAGE_SIZE: usize = 10;

/// The base collection a feed is drawn from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedScope {
    All,
    Category(String),
    Author(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedPost {
    pub post: Post,
    pub comment_count: i64,
}

impl AsRef<Post> for AnnotatedPost {
    fn as_ref(&self) -> &Post {
        &self.post
    }
}

/// Newest publication first; equal dates fall back to insertion order.
pub fn order_posts<T: AsRef<Post>>(posts: &mut [T]) {
    posts.sort_by(|a, b| {
        let (a, b) = (a.as_ref(), b.as_ref());
        b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id))
    });
}

/// Filter, annotate, order.
///
/// `viewer_is_owner` skips the publication rule entirely; it is only ever set
/// for an author looking at their own profile.
pub fn compose_feed(
    candidates: Vec<Post>,
    comment_counts: &HashMap<i64, i64>,
    viewer_is_owner: bool,
    now: DateTime<Utc>,
) -> Vec<AnnotatedPost> {
    let mut feed: Vec<AnnotatedPost> = candidates
        .into_iter()
        .filter(|post| viewer_is_owner || is_publicly_visible(post, now))
        .map(|post| AnnotatedPost {
            comment_count: comment_counts.get(&post.id).copied().unwrap_or(0),
            post,
        })
        .collect();
    order_posts(&mut feed);
    feed
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: usize,
    pub num_pages: usize,
    pub total: usize,
}

/// Cuts one 1-based page out of `items`.
///
/// The first page of an empty feed exists; any other page outside
/// `1..=num_pages` does not.
pub fn paginate<T>(items: Vec<T>, page: usize) -> Result<Page<T>, RequestError> {
    let total = items.len();
    let num_pages = std::cmp::max(1, (total + PAGE_SIZE - 1) / PAGE_SIZE);
    if page == 0 || page > num_pages {
        return Err(RequestError::NotFound("Page not found"));
    }
    let items = items
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    Ok(Page {
        items,
        number: page,
        num_pages,
        total,
    })
}
