use crate::{
    auth::AuthUser,
    error::ApiError,
    models::PostResponse,
    usecase::PostUsecase,
};

/// authorize_owner
///
/// The single ownership rule: the caller may act only on resources whose owner
/// id equals the id in the verified claims. A mismatch is 401, never 403, so the
/// response does not distinguish "not yours" from "does not exist".
pub fn authorize_owner(caller: &AuthUser, owner_id: i64) -> Result<(), ApiError> {
    if caller.id == owner_id {
        Ok(())
    } else {
        tracing::warn!(caller_id = caller.id, owner_id, "ownership check failed");
        Err(ApiError::unauthorized())
    }
}

/// load_owned_post
///
/// Loads the target post and applies [`authorize_owner`]. A missing post yields
/// the same 401 as a foreign one; any other lookup failure is a 500.
pub async fn load_owned_post(
    posts: &PostUsecase,
    caller: &AuthUser,
    post_id: i64,
) -> Result<PostResponse, ApiError> {
    let post = match posts.get_post_by_id(post_id).await {
        Ok(post) => post,
        Err(e) if e.is_not_found() => {
            tracing::warn!(caller_id = caller.id, post_id, "post lookup found nothing");
            return Err(ApiError::unauthorized());
        }
        Err(e) => return Err(ApiError::from_usecase("get_post_by_id", e)),
    };

    authorize_owner(caller, post.user_id)?;
    Ok(post)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn owner_passes() {
        assert!(authorize_owner(&AuthUser { id: 3 }, 3).is_ok());
    }

    #[test]
    fn non_owner_is_unauthorized() {
        let err = authorize_owner(&AuthUser { id: 3 }, 4).unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }
}
