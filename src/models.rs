use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use ts_rs::TS;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Largest page a list endpoint will return.
pub const MAX_PAGE_SIZE: i64 = 100;

// --- Storage Rows (Mapped to Database) ---

/// User
///
/// Row of the `users` table. Carries the password hash, so it is deliberately not
/// `Serialize`; responses go through `UserResponse`.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct User {
    pub id: i64,
    // Public, unique, alphanumeric handle.
    pub user_str_id: String,
    pub email: String,
    /// PHC-formatted argon2 hash. Column name is `password`.
    #[sqlx(rename = "password")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Post
///
/// Row of the `posts` table. `user_id` is the owner and never changes.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Post {
    pub id: i64,
    pub user_id: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Image
///
/// Row of the `images` table, attached to exactly one post.
#[derive(Debug, Clone, FromRow, PartialEq)]
pub struct Image {
    pub id: i64,
    pub post_id: i64,
    pub image_path: String,
    pub created_at: DateTime<Utc>,
}

// --- Repository Parameters ---

#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub user_str_id: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateUser {
    pub id: i64,
    pub user_str_id: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub user_id: i64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewImage {
    pub post_id: i64,
    pub image_path: String,
}

/// A `(limit, offset)` window over an id-ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

// --- Request Payloads (Input Schemas) ---

/// SignUpRequest
///
/// Input payload for POST /signup.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[validate(length(min = 1, max = 64), custom(function = "alphanumeric"))]
    #[schema(example = "abc123")]
    pub user_str_id: String,
    #[validate(email, length(max = 255))]
    #[schema(example = "a@email.com")]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// LoginRequest
///
/// Input payload for POST /login.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 128))]
    pub password: String,
}

/// Body of POST /posts. The owner always comes from the verified claims.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
}

/// Body of PUT /posts/{id}.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdatePostRequest {
    #[validate(length(min = 1, max = 10000))]
    pub text: String,
}

/// Body of POST /posts/{id}/images and PUT /posts/{id}/images/{image_id}.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ImageRequest {
    #[validate(length(min = 1, max = 2048))]
    #[schema(example = "https://cdn.example.com/abc.jpg")]
    pub image_path: String,
}

/// PageQuery
///
/// `?page_id=&page_size=` for list endpoints. Both are 1-based and required.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub page_id: i64,
    #[validate(range(min = 1, max = MAX_PAGE_SIZE))]
    pub page_size: i64,
}

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric")
            .with_message("must contain only ASCII letters and digits".into()))
    }
}

// --- Response Payloads (Output Schemas) ---

/// UserResponse
///
/// The public view of a user. Never includes the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct UserResponse {
    pub id: i64,
    pub user_str_id: String,
    pub email: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_str_id: user.user_str_id,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct PostResponse {
    pub id: i64,
    // Owner id.
    pub user_id: i64,
    pub text: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            user_id: post.user_id,
            text: post.text,
            created_at: post.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct ImageResponse {
    pub id: i64,
    pub post_id: i64,
    pub image_path: String,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
}

impl From<Image> for ImageResponse {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            post_id: image.post_id,
            image_path: image.image_path,
            created_at: image.created_at,
        }
    }
}

/// Body of a successful POST /login.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema, PartialEq)]
#[ts(export)]
pub struct TokenResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup(user_str_id: &str, email: &str, password: &str) -> SignUpRequest {
        SignUpRequest {
            user_str_id: user_str_id.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn signup_accepts_valid_input() {
        assert!(signup("abc123", "a@email.com", "secret").validate().is_ok());
    }

    #[test]
    fn signup_rejects_non_alphanumeric_handle() {
        let errors = signup("abc_123", "a@email.com", "secret")
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("user_str_id"));

        assert!(signup("", "a@email.com", "secret").validate().is_err());
    }

    #[test]
    fn signup_rejects_bad_email_and_short_password() {
        let errors = signup("abc123", "not-an-email", "12345")
            .validate()
            .unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn page_query_bounds() {
        assert!(PageQuery { page_id: 1, page_size: 1 }.validate().is_ok());
        assert!(PageQuery { page_id: 0, page_size: 5 }.validate().is_err());
        assert!(PageQuery { page_id: 1, page_size: 0 }.validate().is_err());
        assert!(PageQuery { page_id: 1, page_size: MAX_PAGE_SIZE + 1 }.validate().is_err());
    }

    #[test]
    fn empty_post_text_is_rejected() {
        let req = CreatePostRequest { text: String::new() };
        assert!(req.validate().is_err());
    }

    #[test]
    fn user_response_omits_password() {
        let user = User {
            id: 7,
            user_str_id: "abc123".into(),
            email: "a@email.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["user_str_id"], "abc123");
    }
}
