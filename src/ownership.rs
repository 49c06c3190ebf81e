use crate::models::{Comment, Post};

/// A resource that belongs to exactly one user.
pub trait Authored {
    fn author_id(&self) -> i64;
}

impl Authored for Post {
    fn author_id(&self) -> i64 {
        self.author.id
    }
}

impl Authored for Comment {
    fn author_id(&self) -> i64 {
        self.author_id
    }
}

/// Only the author may edit or delete. There is no staff override.
pub fn can_mutate<R: Authored + ?Sized>(resource: &R, viewer: Option<i64>) -> bool {
    viewer == Some(resource.author_id())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visibility::tests::{now, post};

    #[test]
    fn only_the_author_may_mutate_a_post() {
        let p = post(1, 7);
        assert!(can_mutate(&p, Some(7)));
        assert!(!can_mutate(&p, Some(8)));
        assert!(!can_mutate(&p, None));
    }

    #[test]
    fn only_the_author_may_mutate_a_comment() {
        let comment = Comment {
            id: 1,
            text: "Nice".to_string(),
            created_at: now(),
            post_id: 1,
            author_id: 3,
            author_username: "user3".to_string(),
        };
        assert!(can_mutate(&comment, Some(3)));
        assert!(!can_mutate(&comment, Some(7)));
        assert!(!can_mutate(&comment, None));
    }
}
