use chrono::Utc;

use crate::models::comments::Comment;
use crate::store::{Entity, JsonStore};
use crate::{Error, Result};

#[derive(Clone)]
pub struct CommentsService {
    store: JsonStore,
}

impl CommentsService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Author-only edit: the caller proves authorship by sending the
    /// comment's own userId. Without a body there is nothing to change and
    /// the comment is returned as is.
    pub async fn edit(
        &self,
        comment_id: u64,
        user_id: Option<u64>,
        body: Option<String>,
    ) -> Result<Comment> {
        let mut comment = self
            .store
            .find::<Comment>(comment_id)
            .await
            .ok_or_else(Comment::not_found)?;

        if user_id != Some(comment.user_id) {
            return Err(Error::Forbidden(
                "Unauthorized: You can only edit your own comments",
            ));
        }

        if let Some(body) = body {
            comment.body = body;
            comment.updated_at = Utc::now();
            comment = self.store.update(comment).await?;
        }

        Ok(comment)
    }

    pub async fn delete(&self, comment_id: u64, user_id: Option<u64>) -> Result<()> {
        let comment = self
            .store
            .find::<Comment>(comment_id)
            .await
            .ok_or_else(Comment::not_found)?;

        if user_id != Some(comment.user_id) {
            return Err(Error::Forbidden(
                "Unauthorized: You can only delete your own comments",
            ));
        }

        self.store.remove::<Comment>(comment.id).await
    }
}
