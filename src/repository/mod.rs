use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::RepoError,
    models::{Image, NewImage, NewPost, NewUser, Page, Post, UpdateUser, User},
};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryRepository;
pub use postgres::PostgresRepository;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository Trait
///
/// Per-entity CRUD over users, posts and images, with no transport or
/// authorization concerns. Get/Update/Delete of a missing id fail with
/// `RepoError::NotFound`; listings are ordered by id ascending.
///
/// `Send + Sync + async_trait` make `Arc<dyn Repository>` shareable across
/// Axum's task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn create_user(&self, user: NewUser) -> RepoResult<User>;
    async fn get_user(&self, id: i64) -> RepoResult<User>;
    async fn get_user_by_email(&self, email: &str) -> RepoResult<User>;
    async fn list_users(&self, page: Page) -> RepoResult<Vec<User>>;
    async fn update_user(&self, user: UpdateUser) -> RepoResult<User>;
    async fn delete_user(&self, id: i64) -> RepoResult<()>;

    // --- Posts ---
    async fn create_post(&self, post: NewPost) -> RepoResult<Post>;
    async fn get_post(&self, id: i64) -> RepoResult<Post>;
    async fn list_posts(&self, page: Page) -> RepoResult<Vec<Post>>;
    // Only the text changes; owner and created_at are preserved.
    async fn update_post(&self, id: i64, text: String) -> RepoResult<Post>;
    async fn delete_post(&self, id: i64) -> RepoResult<()>;

    // --- Images ---
    async fn create_image(&self, image: NewImage) -> RepoResult<Image>;
    async fn get_image(&self, id: i64) -> RepoResult<Image>;
    async fn list_images(&self, post_id: i64, page: Page) -> RepoResult<Vec<Image>>;
    async fn update_image(&self, id: i64, image_path: String) -> RepoResult<Image>;
    async fn delete_image(&self, id: i64) -> RepoResult<()>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer across the application state.
pub type RepositoryState = Arc<dyn Repository>;
