use std::collections::HashMap;

use chrono::Utc;
use serde_json::Value;

use crate::models::comments::{Comment, CommentWithUserDto};
use crate::models::posts::{Post, PostDetailsDto};
use crate::models::query::{ListParams, SortOrder};
use crate::models::users::{PublicUserDto, User};
use crate::store::{Entity, JsonStore};
use crate::Result;

#[derive(Clone)]
pub struct PostsService {
    store: JsonStore,
}

impl PostsService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// Post joined with its author and comments, each comment carrying its
    /// own author. No password survives the join.
    pub async fn post_details(&self, post_id: u64) -> Result<PostDetailsDto> {
        let post = self
            .store
            .find::<Post>(post_id)
            .await
            .ok_or_else(Post::not_found)?;

        let users = self.users_by_id().await;
        let author = users.get(&post.user_id).ok_or_else(User::not_found)?;

        let comments = self
            .store
            .all::<Comment>()
            .await
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .map(|comment| {
                let user = users.get(&comment.user_id).map(PublicUserDto::from_user);
                CommentWithUserDto { comment, user }
            })
            .collect();

        Ok(PostDetailsDto {
            id: post.id,
            title: post.title,
            body: post.body,
            image_url: post.image_url,
            created_at: post.created_at,
            updated_at: post.updated_at,
            user: PublicUserDto::from_user(author),
            comments,
        })
    }

    /// A post's comments with embedded authors, sorted and paginated.
    /// Defaults to the latest activity first: `_sort=updatedAt&_order=desc`,
    /// page 1, 10 per page. An unknown post simply yields an empty list.
    pub async fn comments_for_post(
        &self,
        post_id: u64,
        params: ListParams,
    ) -> Result<Vec<Value>> {
        let params = ListParams {
            page: Some(params.page.unwrap_or(1)),
            limit: Some(params.limit.unwrap_or(10)),
            sort: Some(params.sort.unwrap_or_else(|| "updatedAt".to_string())),
            order: Some(params.order.unwrap_or(SortOrder::Desc)),
        };

        let rows = self
            .store
            .all::<Comment>()
            .await
            .into_iter()
            .filter(|comment| comment.post_id == post_id)
            .map(|comment| serde_json::to_value(&comment))
            .collect::<core::result::Result<Vec<Value>, _>>()?;

        let users = self.users_by_id().await;
        let rows = params
            .apply(rows)
            .into_iter()
            .map(|mut row| {
                let user = row
                    .get("userId")
                    .and_then(Value::as_u64)
                    .and_then(|id| users.get(&id))
                    .map(PublicUserDto::from_user);
                row["user"] = serde_json::to_value(&user)?;
                Ok(row)
            })
            .collect::<Result<Vec<Value>>>()?;

        Ok(rows)
    }

    /// Create a comment under a post; both the post and the author must
    /// exist. The new comment comes back with its author embedded.
    pub async fn create_comment(
        &self,
        post_id: u64,
        user_id: u64,
        body: String,
    ) -> Result<CommentWithUserDto> {
        self.store
            .find::<Post>(post_id)
            .await
            .ok_or_else(Post::not_found)?;
        let user = self
            .store
            .find::<User>(user_id)
            .await
            .ok_or_else(User::not_found)?;

        let now = Utc::now();
        let comment = Comment {
            id: 0, // assigned on insert
            post_id,
            user_id,
            body,
            created_at: now,
            updated_at: now,
        };
        let comment = self.store.insert(comment).await;

        Ok(CommentWithUserDto {
            comment,
            user: Some(PublicUserDto::from_user(&user)),
        })
    }

    async fn users_by_id(&self) -> HashMap<u64, User> {
        self.store
            .all::<User>()
            .await
            .into_iter()
            .map(|user| (user.id, user))
            .collect()
    }
}
