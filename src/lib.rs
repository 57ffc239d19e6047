use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    auth::AuthService, comments::CommentsService, posts::PostsService, users::UsersService,
};
use crate::store::JsonStore;

pub use self::errors::{Error, Result};

pub mod config;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: JsonStore,
    pub auth_service: AuthService,
    pub users_service: UsersService,
    pub posts_service: PostsService,
    pub comments_service: CommentsService,
}

impl AppState {
    pub fn new(config: Config, store: JsonStore) -> Self {
        Self {
            auth_service: AuthService::new(store.clone(), config.secret.clone()),
            users_service: UsersService::new(store.clone()),
            posts_service: PostsService::new(store.clone()),
            comments_service: CommentsService::new(store.clone()),
            store,
            config,
        }
    }
}

pub type SharedState = Arc<AppState>;
