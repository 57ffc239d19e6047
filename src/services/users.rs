use std::collections::HashSet;

use crate::models::comments::Comment;
use crate::models::posts::Post;
use crate::models::users::{PublicUserDto, User, UserDetailsDto};
use crate::store::{Entity, JsonStore};
use crate::{Error, Result};

#[derive(Clone)]
pub struct UsersService {
    store: JsonStore,
}

impl UsersService {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    /// User joined with everything they authored.
    pub async fn user_details(&self, user_id: u64) -> Result<UserDetailsDto> {
        let user = self
            .store
            .find::<User>(user_id)
            .await
            .ok_or_else(User::not_found)?;

        let posts: Vec<Post> = self
            .store
            .all::<Post>()
            .await
            .into_iter()
            .filter(|post| post.user_id == user_id)
            .collect();
        let comments: Vec<Comment> = self
            .store
            .all::<Comment>()
            .await
            .into_iter()
            .filter(|comment| comment.user_id == user_id)
            .collect();

        Ok(UserDetailsDto {
            user: PublicUserDto::from_user(&user),
            posts,
            comments,
        })
    }

    /// Symmetric toggle: bookmarked posts gain the id if absent, lose it if
    /// present.
    pub async fn toggle_bookmark(&self, user_id: u64, post_id: u64) -> Result<PublicUserDto> {
        let mut user = self
            .store
            .find::<User>(user_id)
            .await
            .ok_or_else(User::not_found)?;
        self.store
            .find::<Post>(post_id)
            .await
            .ok_or_else(Post::not_found)?;

        match user.bookmarked_posts.iter().position(|&id| id == post_id) {
            Some(idx) => {
                user.bookmarked_posts.remove(idx);
            }
            None => user.bookmarked_posts.push(post_id),
        }

        let user = self.store.update(user).await?;
        Ok(PublicUserDto::from_user(&user))
    }

    /// Replace the friend list wholesale; every id must name an existing user.
    pub async fn replace_friends(
        &self,
        user_id: u64,
        friend_ids: Vec<u64>,
    ) -> Result<PublicUserDto> {
        let mut user = self
            .store
            .find::<User>(user_id)
            .await
            .ok_or_else(User::not_found)?;

        let known: HashSet<u64> = self
            .store
            .all::<User>()
            .await
            .iter()
            .map(|user| user.id)
            .collect();
        if !friend_ids.iter().all(|id| known.contains(id)) {
            return Err(Error::BadRequest(
                "Invalid friendId(s) provided".to_string(),
            ));
        }

        user.friend_ids = friend_ids;
        let user = self.store.update(user).await?;
        Ok(PublicUserDto::from_user(&user))
    }
}
