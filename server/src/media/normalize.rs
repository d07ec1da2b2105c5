use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat};
use serde::Serialize;
use tokio::task;

use super::{MediaError, allowed_file};

/// Re-encoded image bytes and the mimetype of the encoding actually used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodedImage {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub mimetype: String,
    pub width: u32,
    pub height: u32,
}

/// A normalized image ready to be attached to a post or project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub filename: String,
    pub image: EncodedImage,
}

/// Decode `bytes`, shrink it into `max_size` if given, and re-encode it.
///
/// The output format follows `declared_mimetype` when it names JPEG, PNG or
/// GIF. Anything else keeps the detected source format when it can be
/// encoded, and falls back to JPEG. Images are never enlarged.
pub fn normalize_image(
    bytes: &[u8],
    declared_mimetype: &str,
    max_size: Option<(u32, u32)>,
) -> Result<EncodedImage, MediaError> {
    let detected = image::guess_format(bytes).ok();
    let img = image::load_from_memory(bytes).map_err(MediaError::Decode)?;

    let img = match max_size {
        Some((max_width, max_height)) if img.width() > max_width || img.height() > max_height => {
            img.thumbnail(max_width, max_height)
        }
        _ => img,
    };

    let format = output_format(declared_mimetype, detected);
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::Gif => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img,
    };

    let mut data = Vec::new();
    img.write_to(&mut Cursor::new(&mut data), format)
        .map_err(|source| MediaError::Encode {
            format: format.to_mime_type(),
            source,
        })?;

    let (width, height) = img.dimensions();
    Ok(EncodedImage {
        data,
        mimetype: format.to_mime_type().to_string(),
        width,
        height,
    })
}

fn output_format(declared_mimetype: &str, detected: Option<ImageFormat>) -> ImageFormat {
    match declared_mimetype.trim().to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => ImageFormat::Jpeg,
        "image/png" => ImageFormat::Png,
        "image/gif" => ImageFormat::Gif,
        _ => match detected {
            Some(
                format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Gif | ImageFormat::Bmp),
            ) => format,
            _ => ImageFormat::Jpeg,
        },
    }
}

/// Check the filename and normalize an upload on the blocking pool.
pub async fn prepare_attachment(
    filename: &str,
    bytes: Vec<u8>,
    declared_mimetype: &str,
    max_size: Option<(u32, u32)>,
) -> Result<ImageAttachment, MediaError> {
    if !allowed_file(filename) {
        tracing::warn!("Rejected upload with disallowed file type: {}", filename);
        return Err(MediaError::UnsupportedFile(filename.to_string()));
    }

    let declared = declared_mimetype.to_string();
    let image = task::spawn_blocking(move || normalize_image(&bytes, &declared, max_size))
        .await?
        .inspect_err(|err| tracing::error!("Failed to process image {}: {}", filename, err))?;

    Ok(ImageAttachment {
        filename: filename.to_string(),
        image,
    })
}
