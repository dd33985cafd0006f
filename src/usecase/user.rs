use std::sync::LazyLock;

use crate::{
    auth::{self, CredentialState},
    error::{AuthError, RepoError, UsecaseError},
    models::{LoginRequest, NewUser, SignUpRequest, UserResponse},
    repository::RepositoryState,
};

/// Hash checked when the email is unknown, so both login failures cost one argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| auth::hash_password("bulletin-board-dummy-password").ok());

/// Argon2 is CPU-bound; keep it off the async workers.
async fn hash_blocking(plain: String) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || auth::hash_password(&plain))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

async fn verify_blocking(plain: String, hash: String) -> Result<(), AuthError> {
    tokio::task::spawn_blocking(move || auth::verify_password(&plain, &hash))
        .await
        .map_err(|e| AuthError::Hashing(e.to_string()))?
}

/// Spends one verification on the dummy hash. The first call also builds it, so
/// both steps stay on the blocking pool.
async fn verify_dummy_blocking(plain: String) {
    let _ = tokio::task::spawn_blocking(move || {
        if let Some(dummy) = DUMMY_HASH.as_deref() {
            let _ = auth::verify_password(&plain, dummy);
        }
    })
    .await;
}

/// UserUsecase
///
/// Sign-up and login. Owns the only path by which a plaintext password reaches
/// storage (hashed) or leaves as a token.
#[derive(Clone)]
pub struct UserUsecase {
    repo: RepositoryState,
    credentials: CredentialState,
}

impl UserUsecase {
    pub fn new(repo: RepositoryState, credentials: CredentialState) -> Self {
        Self { repo, credentials }
    }

    /// Hashes the password, persists the user and returns it without the hash.
    /// A duplicate email or handle surfaces as `RepoError::Conflict`.
    pub async fn sign_up(&self, req: SignUpRequest) -> Result<UserResponse, UsecaseError> {
        let password_hash = hash_blocking(req.password).await?;

        let user = self
            .repo
            .create_user(NewUser {
                user_str_id: req.user_str_id,
                email: req.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "user signed up");
        Ok(user.into())
    }

    /// Returns a signed token for valid credentials.
    ///
    /// An unknown email and a wrong password both fail with
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, req: LoginRequest) -> Result<String, UsecaseError> {
        let user = match self.repo.get_user_by_email(&req.email).await {
            Ok(user) => user,
            Err(RepoError::NotFound) => {
                verify_dummy_blocking(req.password).await;
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e.into()),
        };

        verify_blocking(req.password, user.password_hash).await?;

        Ok(self.credentials.issue_token(user.id)?)
    }
}
