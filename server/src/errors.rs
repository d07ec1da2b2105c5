use thiserror::Error;

use crate::content::slug::SlugError;
use crate::media::MediaError;

pub type ContentResult<T> = Result<T, ContentError>;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("title must contain at least one letter or digit")]
    InvalidTitle,

    #[error("could not assign a unique slug for `{0}`")]
    DuplicateSlug(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ContentError {
    /// True when the caller can fix the request and try again.
    pub fn is_user_error(&self) -> bool {
        match self {
            ContentError::InvalidTitle
            | ContentError::NotFound(_)
            | ContentError::Validation(_) => true,
            ContentError::Media(err) => err.is_user_error(),
            ContentError::DuplicateSlug(_) | ContentError::Database(_) => false,
        }
    }
}

impl From<SlugError> for ContentError {
    fn from(err: SlugError) -> Self {
        match err {
            SlugError::InvalidTitle => ContentError::InvalidTitle,
            SlugError::Exhausted { base, .. } => ContentError::DuplicateSlug(base),
        }
    }
}

pub fn bad_user_input(message: impl Into<String>) -> ContentError {
    ContentError::Validation(message.into())
}
