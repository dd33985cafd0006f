use axum::{Json, extract::State, http::StatusCode};

use crate::{
    AppState,
    error::{ApiError, AuthError, UsecaseError},
    extract::ValidatedJson,
    models::{LoginRequest, SignUpRequest, TokenResponse, UserResponse},
};

/// signup
///
/// [Public Route] Registers a user. The response never carries the password or
/// its hash. A duplicate email or handle is reported as a 500.
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Registered", body = UserResponse),
        (status = 400, description = "Validation failed"),
        (status = 500, description = "Duplicate user or storage failure")
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SignUpRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .users
        .sign_up(payload)
        .await
        .map_err(|e| ApiError::from_usecase("sign_up", e))?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// login
///
/// [Public Route] Exchanges email and password for a bearer token valid for 12 hours.
/// Unknown email and wrong password produce the identical 401.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    match state.users.login(payload).await {
        Ok(token) => Ok(Json(TokenResponse { token })),
        Err(UsecaseError::Auth(AuthError::InvalidCredentials)) => {
            Err(ApiError::invalid_credentials())
        }
        Err(e) => Err(ApiError::from_usecase("login", e)),
    }
}
