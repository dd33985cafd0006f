//! HTTP handlers.
//!
//! Every post-scoped handler walks the same states: identity extracted
//! (`AuthUser`), request validated (`ValidatedJson`/`ValidatedQuery`),
//! ownership authorized (`guard::load_owned_post`), then executed through a use case.

pub mod guard;
pub mod images;
pub mod posts;
pub mod users;

pub use images::{create_image, delete_image, get_image, list_images, update_image};
pub use posts::{create_post, delete_post, get_all_posts, get_post_by_id, update_post};
pub use users::{login, signup};
