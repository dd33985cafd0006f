//! Use cases: transport-independent orchestration over the repository.
//!
//! Use cases perform no authorization. Handlers resolve the caller and check
//! ownership before delegating here.

use crate::{error::UsecaseError, models::Page};

pub mod image;
pub mod post;
pub mod user;

pub use image::ImageUsecase;
pub use post::PostUsecase;
pub use user::UserUsecase;

/// Turns a 1-based `(page_id, page_size)` into a `(limit, offset)` window with
/// `offset = (page_id - 1) * page_size`. A page past the end simply yields an
/// empty listing downstream.
pub fn page_window(page_id: i64, page_size: i64) -> Result<Page, UsecaseError> {
    let invalid = || UsecaseError::InvalidPage { page_id, page_size };
    if page_id < 1 || page_size < 1 {
        return Err(invalid());
    }
    let offset = (page_id - 1).checked_mul(page_size).ok_or_else(invalid)?;
    Ok(Page {
        limit: page_size,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_page_starts_at_zero() {
        assert_eq!(page_window(1, 5).unwrap(), Page { limit: 5, offset: 0 });
    }

    #[test]
    fn second_page_skips_one_page() {
        assert_eq!(page_window(2, 5).unwrap(), Page { limit: 5, offset: 5 });
    }

    #[test]
    fn non_positive_inputs_are_rejected() {
        assert!(page_window(0, 5).is_err());
        assert!(page_window(1, 0).is_err());
        assert!(page_window(-3, 5).is_err());
    }

    #[test]
    fn overflowing_offset_is_rejected() {
        assert!(page_window(i64::MAX, 100).is_err());
    }
}
