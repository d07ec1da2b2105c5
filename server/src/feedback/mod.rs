//! Guest feedback on posts and projects: comments, ratings and likes.

pub mod models;
pub mod mutations;
pub mod queries;

pub use models::{CommentRecord, FeedbackInput, FeedbackReceipt, FeedbackSummary, FeedbackTarget};
pub use mutations::submit_feedback;
pub use queries::feedback_summary;
