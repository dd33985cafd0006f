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
    models::{CreatePostRequest, PageQuery, PostResponse, UpdatePostRequest},
};

/// get_all_posts
///
/// [Authenticated Route] Lists posts in id order, `page_size` per page.
/// A page past the end is an empty list, not an error.
#[utoipa::path(
    get,
    path = "/posts",
    params(PageQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Posts", body = [PostResponse]),
        (status = 400, description = "Bad query"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_all_posts(
    _caller: AuthUser,
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PageQuery>,
) -> Result<Json<Vec<PostResponse>>, ApiError> {
    state
        .posts
        .get_all_posts(query.page_id, query.page_size)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_usecase("get_all_posts", e))
}

/// create_post
///
/// [Authenticated Route] Creates a post owned by the caller. The owner is taken
/// from the verified claims, never from the body.
#[utoipa::path(
    post,
    path = "/posts",
    request_body = CreatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Created", body = PostResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_post(
    AuthUser { id }: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), ApiError> {
    let post = state
        .posts
        .create_post(id, payload)
        .await
        .map_err(|e| ApiError::from_usecase("create_post", e))?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// get_post_by_id
///
/// [Authenticated Route] Returns one of the caller's own posts.
#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Found", body = PostResponse),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn get_post_by_id(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = load_owned_post(&state.posts, &caller, id).await?;
    Ok(Json(post))
}

/// update_post
///
/// [Authenticated Route] Replaces the text of one of the caller's posts. The
/// owner and creation timestamp are preserved.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    request_body = UpdatePostRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated", body = PostResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn update_post(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>, ApiError> {
    load_owned_post(&state.posts, &caller, id).await?;

    state
        .posts
        .update_post(id, payload)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_usecase("update_post", e))
}

/// delete_post
///
/// [Authenticated Route] Deletes one of the caller's posts and its images.
#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = i64, Path, description = "Post ID")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Missing token, or not the owner")
    )
)]
pub async fn delete_post(
    caller: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    load_owned_post(&state.posts, &caller, id).await?;

    state
        .posts
        .delete_post(id)
        .await
        .map_err(|e| ApiError::from_usecase("delete_post", e))?;
    Ok(StatusCode::NO_CONTENT)
}
