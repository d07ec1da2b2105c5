//! Image uploads: type checks, resizing, re-encoding and storage.

pub mod db;
pub mod normalize;

use thiserror::Error;

pub use db::{
    ImageSource, StoredImage, get_post_image, get_project_image, get_uploaded_image,
    store_uploaded_image,
};
pub use normalize::{EncodedImage, ImageAttachment, normalize_image, prepare_attachment};

/// Extensions accepted for uploads, compared case-insensitively
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("file type not allowed: {0}")]
    UnsupportedFile(String),

    #[error("could not decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("could not encode image as {format}: {source}")]
    Encode {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },

    #[error("image processing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl MediaError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, MediaError::UnsupportedFile(_) | MediaError::Decode(_))
    }
}

/// Whether `filename` carries one of the [`ALLOWED_EXTENSIONS`].
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Mimetype implied by an allowed filename's extension.
pub fn mimetype_for_filename(filename: &str) -> Option<&'static str> {
    let (_, ext) = filename.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mimetype_for_filename() {
        assert_eq!(mimetype_for_filename("a.PNG"), Some("image/png"));
        assert_eq!(mimetype_for_filename("a.jpeg"), Some("image/jpeg"));
        assert_eq!(mimetype_for_filename("a.jpg"), Some("image/jpeg"));
        assert_eq!(mimetype_for_filename("a.gif"), Some("image/gif"));
        assert_eq!(mimetype_for_filename("a.webp"), None);
        assert_eq!(mimetype_for_filename("gif"), None);
    }

    #[test]
    fn test_allowed_file() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.JPG"));
        assert!(allowed_file("archive.tar.jpeg"));
        assert!(allowed_file("anim.Gif"));
        assert!(!allowed_file("photo.bmp"));
        assert!(!allowed_file("png"));
        assert!(!allowed_file("photo."));
        assert!(!allowed_file("script.png.exe"));
    }

    #[test]
    fn test_user_errors() {
        assert!(MediaError::UnsupportedFile("x.exe".into()).is_user_error());
        let decode = image::load_from_memory(b"not an image").unwrap_err();
        assert!(MediaError::Decode(decode).is_user_error());
    }
}
