use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::guard::load_owned_post;
use crate::{
    AppState,
    auth::AuthUser,
    error::ApiError,
    extract::{ValidatedJson, ValidatedQuery},
    models::{ImageRequest, ImageResponse, PageQuery},
};

/// Image lookups that miss, or hit an image of another post, collapse into the
/// same 401 as the post guard.
fn image_lookup_error(op: &str, err: crate::error::UsecaseError) -> ApiError {
    if err.is_not_found() {
        ApiError::unauthorized()
    } else {
        ApiError::from_usecase(op, err)
    }
}

#[utoipa::path(
    post,
    path = "/posts/{id}/images",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = ImageRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Attached", body = ImageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn create_image(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<ImageRequest>,
) -> Result<(StatusCode, Json<ImageResponse>), ApiError> {
    load_owned_post(&state.posts, &caller, post_id).await?;

    let image = state
        .images
        .create_image(post_id, payload)
        .await
        .map_err(|e| ApiError::from_usecase("create_image", e))?;
    Ok((StatusCode::CREATED, Json(image)))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/images",
    params(("id" = i64, Path, description = "Post ID"), PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Images of the post", body = [ImageResponse]),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn list_images(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(post_id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Vec<ImageResponse>>, ApiError> {
    load_owned_post(&state.posts, &caller, post_id).await?;

    state
        .images
        .list_images(post_id, query.page_id, query.page_size)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_usecase("list_images", e))
}

#[utoipa::path(
    get,
    path = "/posts/{id}/images/{image_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("image_id" = i64, Path, description = "Image ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Found", body = ImageResponse),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn get_image(
    caller: AuthUser,
    State(state): State<AppState>,
    Path((post_id, image_id)): Path<(i64, i64)>,
) -> Result<Json<ImageResponse>, ApiError> {
    load_owned_post(&state.posts, &caller, post_id).await?;

    state
        .images
        .get_image(post_id, image_id)
        .await
        .map(Json)
        .map_err(|e| image_lookup_error("get_image", e))
}

#[utoipa::path(
    put,
    path = "/posts/{id}/images/{image_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("image_id" = i64, Path, description = "Image ID")
    ),
    request_body = ImageRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = ImageResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn update_image(
    caller: AuthUser,
    State(state): State<AppState>,
    Path((post_id, image_id)): Path<(i64, i64)>,
    ValidatedJson(payload): ValidatedJson<ImageRequest>,
) -> Result<Json<ImageResponse>, ApiError> {
    load_owned_post(&state.posts, &caller, post_id).await?;
    state
        .images
        .get_image(post_id, image_id)
        .await
        .map_err(|e| image_lookup_error("get_image", e))?;

    state
        .images
        .update_image(image_id, payload)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_usecase("update_image", e))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}/images/{image_id}",
    params(
        ("id" = i64, Path, description = "Post ID"),
        ("image_id" = i64, Path, description = "Image ID")
    ),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn delete_image(
    caller: AuthUser,
    State(state): State<AppState>,
    Path((post_id, image_id)): Path<(i64, i64)>,
) -> Result<StatusCode, ApiError> {
    load_owned_post(&state.posts, &caller, post_id).await?;
    state
        .images
        .get_image(post_id, image_id)
        .await
        .map_err(|e| image_lookup_error("get_image", e))?;

    state
        .images
        .delete_image(image_id)
        .await
        .map_err(|e| ApiError::from_usecase("delete_image", e))?;
    Ok(StatusCode::NO_CONTENT)
}
