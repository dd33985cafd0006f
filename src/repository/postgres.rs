use async_trait::async_trait;
use sqlx::PgPool;

use super::{RepoResult, Repository};
use crate::{
    error::RepoError,
    models::{Image, NewImage, NewPost, NewUser, Page, Post, UpdateUser, User},
};

const USER_COLUMNS: &str = "id, user_str_id, email, password, created_at";
const POST_COLUMNS: &str = "id, user_id, text, created_at";
const IMAGE_COLUMNS: &str = "id, post_id, image_path, created_at";

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// Every statement is parameterized; no SQL is assembled from caller input.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Zero affected rows means the id did not exist.
fn expect_affected(rows_affected: u64) -> RepoResult<()> {
    if rows_affected == 0 {
        Err(RepoError::NotFound)
    } else {
        Ok(())
    }
}

#[async_trait]
impl Repository for PostgresRepository {
    /// create_user
    ///
    /// Unique violations on `email` or `user_str_id` surface as `RepoError::Conflict`.
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let sql = format!(
            "INSERT INTO users (user_str_id, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.user_str_id)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn get_user(&self, id: i64) -> RepoResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 LIMIT 1");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<User> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1 LIMIT 1");
        sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn list_users(&self, page: Page) -> RepoResult<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, User>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn update_user(&self, user: UpdateUser) -> RepoResult<User> {
        let sql = format!(
            "UPDATE users SET user_str_id = $2, email = $3, password = $4 WHERE id = $1 RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.id)
            .bind(user.user_str_id)
            .bind(user.email)
            .bind(user.password_hash)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn delete_user(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_affected(result.rows_affected())
    }

    /// create_post
    ///
    /// The `posts.user_id` foreign key rejects owners that do not exist.
    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let sql = format!("INSERT INTO posts (user_id, text) VALUES ($1, $2) RETURNING {POST_COLUMNS}");
        sqlx::query_as::<_, Post>(&sql)
            .bind(post.user_id)
            .bind(post.text)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn get_post(&self, id: i64) -> RepoResult<Post> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 LIMIT 1");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn list_posts(&self, page: Page) -> RepoResult<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Post>(&sql)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn update_post(&self, id: i64, text: String) -> RepoResult<Post> {
        let sql = format!("UPDATE posts SET text = $2 WHERE id = $1 RETURNING {POST_COLUMNS}");
        sqlx::query_as::<_, Post>(&sql)
            .bind(id)
            .bind(text)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn delete_post(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_affected(result.rows_affected())
    }

    async fn create_image(&self, image: NewImage) -> RepoResult<Image> {
        let sql = format!(
            "INSERT INTO images (post_id, image_path) VALUES ($1, $2) RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&sql)
            .bind(image.post_id)
            .bind(image.image_path)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn get_image(&self, id: i64) -> RepoResult<Image> {
        let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1 LIMIT 1");
        sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn list_images(&self, post_id: i64, page: Page) -> RepoResult<Vec<Image>> {
        let sql = format!(
            "SELECT {IMAGE_COLUMNS} FROM images WHERE post_id = $1 ORDER BY id LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Image>(&sql)
            .bind(post_id)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn update_image(&self, id: i64, image_path: String) -> RepoResult<Image> {
        let sql = format!(
            "UPDATE images SET image_path = $2 WHERE id = $1 RETURNING {IMAGE_COLUMNS}"
        );
        sqlx::query_as::<_, Image>(&sql)
            .bind(id)
            .bind(image_path)
            .fetch_one(&self.pool)
            .await
            .map_err(RepoError::from)
    }

    async fn delete_image(&self, id: i64) -> RepoResult<()> {
        let result = sqlx::query("DELETE FROM images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_affected(result.rows_affected())
    }
}
