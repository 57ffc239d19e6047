pub mod auth;
pub mod comments;
pub mod crud;
pub mod posts;
pub mod users;
