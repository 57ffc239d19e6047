use chrono::Utc;

use crate::generator;
use crate::models::users::{AuthResponseDto, PublicUserDto, User};
use crate::store::JsonStore;
use crate::{Error, Result};

#[derive(Clone)]
pub struct AuthService {
    store: JsonStore,
    secret: String,
}

impl AuthService {
    pub fn new(store: JsonStore, secret: String) -> Self {
        Self { store, secret }
    }

    pub fn verify_secret(&self, secret: &str) -> Result<()> {
        if secret == self.secret {
            Ok(())
        } else {
            Err(Error::Forbidden("Unauthentication"))
        }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponseDto> {
        let users = self.store.all::<User>().await;
        let user = users
            .iter()
            .find(|user| user.username == username && user.password == password)
            .ok_or(Error::Unauthorized("Login failure!"))?;

        Ok(AuthResponseDto {
            secret: self.secret.clone(),
            user: PublicUserDto::from_user(user),
        })
    }

    pub async fn register(
        &self,
        username: String,
        email: String,
        password: String,
    ) -> Result<AuthResponseDto> {
        let users = self.store.all::<User>().await;
        if users.iter().any(|user| user.email == email) {
            return Err(Error::Conflict("Email already registered."));
        }
        if users.iter().any(|user| user.username == username) {
            return Err(Error::Conflict("username already registered."));
        }

        let now = Utc::now();
        let user = User {
            id: 0, // assigned on insert
            full_name: username.clone(),
            username,
            password,
            email,
            about: generator::paragraphs(&mut rand::thread_rng()),
            avatar: generator::AVATAR_URL.to_string(),
            cover: None,
            created_at: now,
            updated_at: now,
            friend_ids: vec![],
            bookmarked_posts: vec![],
        };
        let user = self.store.insert(user).await;

        Ok(AuthResponseDto {
            secret: self.secret.clone(),
            user: PublicUserDto::from_user(&user),
        })
    }
}
