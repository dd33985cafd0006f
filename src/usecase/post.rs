use crate::{
    error::UsecaseError,
    models::{CreatePostRequest, NewPost, PostResponse, UpdatePostRequest},
    repository::RepositoryState,
};

use super::page_window;

/// PostUsecase
///
/// Maps post requests onto repository rows and rows back onto `PostResponse`.
#[derive(Clone)]
pub struct PostUsecase {
    repo: RepositoryState,
}

impl PostUsecase {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    /// Persists a post owned by `owner_id`. The request text has already been validated.
    pub async fn create_post(
        &self,
        owner_id: i64,
        req: CreatePostRequest,
    ) -> Result<PostResponse, UsecaseError> {
        let post = self
            .repo
            .create_post(NewPost {
                user_id: owner_id,
                text: req.text,
            })
            .await?;
        tracing::info!(post_id = post.id, owner_id, "post created");
        Ok(post.into())
    }

    pub async fn get_post_by_id(&self, id: i64) -> Result<PostResponse, UsecaseError> {
        Ok(self.repo.get_post(id).await?.into())
    }

    pub async fn get_all_posts(
        &self,
        page_id: i64,
        page_size: i64,
    ) -> Result<Vec<PostResponse>, UsecaseError> {
        let page = page_window(page_id, page_size)?;
        let posts = self.repo.list_posts(page).await?;
        Ok(posts.into_iter().map(PostResponse::from).collect())
    }

    pub async fn update_post(
        &self,
        id: i64,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, UsecaseError> {
        Ok(self.repo.update_post(id, req.text).await?.into())
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), UsecaseError> {
        self.repo.delete_post(id).await?;
        tracing::info!(post_id = id, "post deleted");
        Ok(())
    }
}
