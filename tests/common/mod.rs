#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bulletin_board::{
    AppConfig, AppState, InMemoryRepository,
    error::RepoError,
    models::{Image, NewImage, NewPost, NewUser, Page, Post, UpdateUser, User},
    repository::{RepoResult, Repository},
};
use chrono::Utc;

pub const OWNER_ID: i64 = 1;
pub const STRANGER_ID: i64 = 2;
pub const POST_ID: i64 = 10;

// --- MOCK REPOSITORY IMPLEMENTATION ---

/// How the mock answers `get_post`.
#[derive(Clone)]
pub enum Lookup {
    Found(Post),
    Missing,
    Broken,
}

/// Central control point for handler tests. Handlers depend on the trait, so the
/// trait is mocked; every call is recorded by name.
pub struct MockRepoControl {
    pub post_lookup: Lookup,
    pub image: Option<Image>,
    pub posts_to_return: Vec<Post>,
    pub fail_writes: bool,
    // `get_post` still succeeds, but the row is gone by the time it is written.
    pub vanish_after_lookup: bool,
    pub calls: Mutex<Vec<&'static str>>,
}

impl Default for MockRepoControl {
    fn default() -> Self {
        MockRepoControl {
            post_lookup: Lookup::Found(sample_post(POST_ID, OWNER_ID)),
            image: None,
            posts_to_return: vec![],
            fail_writes: false,
            vanish_after_lookup: false,
            calls: Mutex::new(vec![]),
        }
    }
}

impl MockRepoControl {
    fn record(&self, name: &'static str) {
        self.calls.lock().unwrap().push(name);
    }

    pub fn called(&self, name: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| *c == name)
    }

    fn write_result<T>(&self, value: T) -> RepoResult<T> {
        if self.vanish_after_lookup {
            Err(RepoError::NotFound)
        } else if self.fail_writes {
            Err(RepoError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(value)
        }
    }
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn create_user(&self, user: NewUser) -> RepoResult<User> {
        self.record("create_user");
        self.write_result(User {
            id: OWNER_ID,
            user_str_id: user.user_str_id,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        })
    }
    async fn get_user(&self, _id: i64) -> RepoResult<User> {
        self.record("get_user");
        Err(RepoError::NotFound)
    }
    async fn get_user_by_email(&self, _email: &str) -> RepoResult<User> {
        self.record("get_user_by_email");
        Err(RepoError::NotFound)
    }
    async fn list_users(&self, _page: Page) -> RepoResult<Vec<User>> {
        Ok(vec![])
    }
    async fn update_user(&self, _user: UpdateUser) -> RepoResult<User> {
        Err(RepoError::NotFound)
    }
    async fn delete_user(&self, _id: i64) -> RepoResult<()> {
        Err(RepoError::NotFound)
    }

    async fn create_post(&self, post: NewPost) -> RepoResult<Post> {
        self.record("create_post");
        self.write_result(Post {
            id: POST_ID,
            user_id: post.user_id,
            text: post.text,
            created_at: Utc::now(),
        })
    }
    async fn get_post(&self, _id: i64) -> RepoResult<Post> {
        self.record("get_post");
        match &self.post_lookup {
            Lookup::Found(post) => Ok(post.clone()),
            Lookup::Missing => Err(RepoError::NotFound),
            Lookup::Broken => Err(RepoError::Database(sqlx::Error::PoolTimedOut)),
        }
    }
    async fn list_posts(&self, _page: Page) -> RepoResult<Vec<Post>> {
        self.record("list_posts");
        Ok(self.posts_to_return.clone())
    }
    async fn update_post(&self, id: i64, text: String) -> RepoResult<Post> {
        self.record("update_post");
        let mut post = match &self.post_lookup {
            Lookup::Found(post) => post.clone(),
            _ => sample_post(id, OWNER_ID),
        };
        post.text = text;
        self.write_result(post)
    }
    async fn delete_post(&self, _id: i64) -> RepoResult<()> {
        self.record("delete_post");
        self.write_result(())
    }

    async fn create_image(&self, image: NewImage) -> RepoResult<Image> {
        self.record("create_image");
        self.write_result(Image {
            id: 1,
            post_id: image.post_id,
            image_path: image.image_path,
            created_at: Utc::now(),
        })
    }
    async fn get_image(&self, _id: i64) -> RepoResult<Image> {
        self.record("get_image");
        self.image.clone().ok_or(RepoError::NotFound)
    }
    async fn list_images(&self, _post_id: i64, _page: Page) -> RepoResult<Vec<Image>> {
        self.record("list_images");
        Ok(self.image.clone().into_iter().collect())
    }
    async fn update_image(&self, id: i64, image_path: String) -> RepoResult<Image> {
        self.record("update_image");
        self.write_result(Image {
            id,
            post_id: POST_ID,
            image_path,
            created_at: Utc::now(),
        })
    }
    async fn delete_image(&self, _id: i64) -> RepoResult<()> {
        self.record("delete_image");
        self.write_result(())
    }
}

// --- TEST UTILITIES ---

pub fn sample_post(id: i64, owner: i64) -> Post {
    Post {
        id,
        user_id: owner,
        text: format!("post {id}"),
        created_at: Utc::now(),
    }
}

pub fn sample_image(id: i64, post_id: i64) -> Image {
    Image {
        id,
        post_id,
        image_path: format!("https://cdn.example.com/{id}.jpg"),
        created_at: Utc::now(),
    }
}

/// AppState over a shared mock, returning the mock so calls can be inspected.
pub fn mock_state(control: MockRepoControl) -> (AppState, Arc<MockRepoControl>) {
    let repo = Arc::new(control);
    let state = AppState::new(repo.clone(), AppConfig::default());
    (state, repo)
}

/// AppState over a fresh in-memory repository.
pub fn memory_state() -> (AppState, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let state = AppState::new(repo.clone(), AppConfig::default());
    (state, repo)
}

/// Inserts a user row directly, bypassing hashing.
pub async fn seed_user(repo: &InMemoryRepository, handle: &str) -> User {
    repo.create_user(NewUser {
        user_str_id: handle.to_string(),
        email: format!("{handle}@email.com"),
        password_hash: "not-a-real-hash".to_string(),
    })
    .await
    .unwrap()
}
