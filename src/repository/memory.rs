use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{RepoResult, Repository};
use crate::{
    error::RepoError,
    models::{Image, NewImage, NewPost, NewUser, Page, Post, UpdateUser, User},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    images: BTreeMap<i64, Image>,
    next_user_id: i64,
    next_post_id: i64,
    next_image_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

fn window<T>(rows: impl Iterator<Item = T>, page: Page) -> Vec<T> {
    rows.skip(page.offset.max(0) as usize)
        .take(page.limit.max(0) as usize)
        .collect()
}

/// InMemoryRepository
///
/// A deterministic `Repository` double. Ids are assigned sequentially from 1 per
/// table, listings come back in id order, and the same uniqueness, foreign-key
/// and cascade rules as the Postgres schema are applied.
#[derive(Default)]
pub struct InMemoryRepository {
    tables: RwLock<Tables>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn ensure_unique_user(&self, id: Option<i64>, user_str_id: &str, email: &str) -> RepoResult<()> {
        let clash = self.users.values().find(|u| {
            Some(u.id) != id && (u.email == email || u.user_str_id == user_str_id)
        });
        match clash {
            Some(u) if u.email == email => Err(RepoError::Conflict(format!(
                "email {email:?} already exists"
            ))),
            Some(_) => Err(RepoError::Conflict(format!(
                "user_str_id {user_str_id:?} already exists"
            ))),
            None => Ok(()),
        }
    }

    fn remove_post_cascade(&mut self, post_id: i64) -> Option<Post> {
        let post = self.posts.remove(&post_id)?;
        self.images.retain(|_, image| image.post_id != post_id);
        Some(post)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique_user(None, &user.user_str_id, &user.email)?;

        let id = next_id(&mut tables.next_user_id);
        let row = User {
            id,
            user_str_id: user.user_str_id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        tables.users.insert(id, row.clone());
        Ok(row)
    }

    async fn get_user(&self, id: i64) -> RepoResult<User> {
        let tables = self.tables.read().await;
        tables.users.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn get_user_by_email(&self, email: &str) -> RepoResult<User> {
        let tables = self.tables.read().await;
        tables
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(RepoError::NotFound)
    }

    async fn list_users(&self, page: Page) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        Ok(window(tables.users.values().cloned(), page))
    }

    async fn update_user(&self, user: UpdateUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        tables.ensure_unique_user(Some(user.id), &user.user_str_id, &user.email)?;

        let row = tables.users.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        row.user_str_id = user.user_str_id;
        row.email = user.email;
        row.password_hash = user.password_hash;
        Ok(row.clone())
    }

    async fn delete_user(&self, id: i64) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.remove_post_cascade(post_id);
        }
        Ok(())
    }

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&post.user_id) {
            return Err(RepoError::Constraint(format!(
                "user {} does not exist",
                post.user_id
            )));
        }

        let id = next_id(&mut tables.next_post_id);
        let row = Post {
            id,
            user_id: post.user_id,
            text: post.text,
            created_at: Utc::now(),
        };
        tables.posts.insert(id, row.clone());
        Ok(row)
    }

    async fn get_post(&self, id: i64) -> RepoResult<Post> {
        let tables = self.tables.read().await;
        tables.posts.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn list_posts(&self, page: Page) -> RepoResult<Vec<Post>> {
        let tables = self.tables.read().await;
        Ok(window(tables.posts.values().cloned(), page))
    }

    async fn update_post(&self, id: i64, text: String) -> RepoResult<Post> {
        let mut tables = self.tables.write().await;
        let row = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        row.text = text;
        Ok(row.clone())
    }

    async fn delete_post(&self, id: i64) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .remove_post_cascade(id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }

    async fn create_image(&self, image: NewImage) -> RepoResult<Image> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&image.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                image.post_id
            )));
        }

        let id = next_id(&mut tables.next_image_id);
        let row = Image {
            id,
            post_id: image.post_id,
            image_path: image.image_path,
            created_at: Utc::now(),
        };
        tables.images.insert(id, row.clone());
        Ok(row)
    }

    async fn get_image(&self, id: i64) -> RepoResult<Image> {
        let tables = self.tables.read().await;
        tables.images.get(&id).cloned().ok_or(RepoError::NotFound)
    }

    async fn list_images(&self, post_id: i64, page: Page) -> RepoResult<Vec<Image>> {
        let tables = self.tables.read().await;
        let rows = tables
            .images
            .values()
            .filter(|image| image.post_id == post_id)
            .cloned();
        Ok(window(rows, page))
    }

    async fn update_image(&self, id: i64, image_path: String) -> RepoResult<Image> {
        let mut tables = self.tables.write().await;
        let row = tables.images.get_mut(&id).ok_or(RepoError::NotFound)?;
        row.image_path = image_path;
        Ok(row.clone())
    }

    async fn delete_image(&self, id: i64) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        tables
            .images
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}
