use crate::{
    error::{RepoError, UsecaseError},
    models::{ImageRequest, ImageResponse, NewImage},
    repository::RepositoryState,
};

use super::page_window;

/// ImageUsecase
///
/// Image operations scoped to a parent post. An image reached through a post it
/// does not belong to is reported as `NotFound`.
#[derive(Clone)]
pub struct ImageUsecase {
    repo: RepositoryState,
}

impl ImageUsecase {
    pub fn new(repo: RepositoryState) -> Self {
        Self { repo }
    }

    pub async fn create_image(
        &self,
        post_id: i64,
        req: ImageRequest,
    ) -> Result<ImageResponse, UsecaseError> {
        let image = self
            .repo
            .create_image(NewImage {
                post_id,
                image_path: req.image_path,
            })
            .await?;
        tracing::info!(image_id = image.id, post_id, "image attached");
        Ok(image.into())
    }

    pub async fn get_image(
        &self,
        post_id: i64,
        image_id: i64,
    ) -> Result<ImageResponse, UsecaseError> {
        let image = self.repo.get_image(image_id).await?;
        if image.post_id != post_id {
            return Err(RepoError::NotFound.into());
        }
        Ok(image.into())
    }

    pub async fn list_images(
        &self,
        post_id: i64,
        page_id: i64,
        page_size: i64,
    ) -> Result<Vec<ImageResponse>, UsecaseError> {
        let page = page_window(page_id, page_size)?;
        let images = self.repo.list_images(post_id, page).await?;
        Ok(images.into_iter().map(ImageResponse::from).collect())
    }

    pub async fn update_image(
        &self,
        image_id: i64,
        req: ImageRequest,
    ) -> Result<ImageResponse, UsecaseError> {
        Ok(self.repo.update_image(image_id, req.image_path).await?.into())
    }

    pub async fn delete_image(&self, image_id: i64) -> Result<(), UsecaseError> {
        self.repo.delete_image(image_id).await?;
        Ok(())
    }
}
