pub mod db;
pub mod models;
pub mod mutations;
pub mod queries;

pub use models::{NewPost, PostRecord, PostSummary, PostUpdate};
pub use mutations::{create_post, delete_post, update_post};
pub use queries::{get_post_by_id, get_post_by_slug, latest_posts, list_posts, list_posts_page};
