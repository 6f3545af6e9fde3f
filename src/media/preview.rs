/// Preview generation for queued files and gallery images
///
/// Decoding and resizing are CPU-bound, so they run on the blocking pool.

use iced::widget::image::Handle;
use image::imageops::FilterType;

use crate::error::PreviewError;
use crate::state::data::MediaFile;

/// Longest edge of a queue preview
pub const PREVIEW_SIZE: u32 = 128;

/// Longest edge of a gallery grid thumbnail
pub const GALLERY_THUMB_SIZE: u32 = 256;

/// Decoded RGBA thumbnail ready to hand to the renderer
#[derive(Debug, Clone, PartialEq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Thumbnail {
    pub fn into_handle(self) -> Handle {
        Handle::from_rgba(self.width, self.height, self.pixels)
    }
}

/// Read a queued file and render its preview
pub async fn generate_preview(file: MediaFile) -> Result<Thumbnail, PreviewError> {
    let bytes = file
        .read_bytes()
        .await
        .map_err(|e| PreviewError::Read(e.to_string()))?;

    thumbnail_from_bytes(bytes, PREVIEW_SIZE).await
}

/// Render a thumbnail from encoded image bytes on the blocking pool
pub async fn thumbnail_from_bytes(bytes: Vec<u8>, max_edge: u32) -> Result<Thumbnail, PreviewError> {
    tokio::task::spawn_blocking(move || render_thumbnail(&bytes, max_edge))
        .await
        .map_err(|e| PreviewError::Join(e.to_string()))?
}

/// Decode encoded image bytes and shrink them to fit `max_edge`.
///
/// Images already smaller than `max_edge` keep their size.
pub fn render_thumbnail(bytes: &[u8], max_edge: u32) -> Result<Thumbnail, PreviewError> {
    let img = image::load_from_memory(bytes)?;

    let img = if img.width() > max_edge || img.height() > max_edge {
        img.resize(max_edge, max_edge, FilterType::Lanczos3)
    } else {
        img
    };

    let rgba = img.to_rgba8();
    Ok(Thumbnail {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn encoded_png(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 90]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_large_image_is_shrunk_keeping_aspect() {
        let thumb = render_thumbnail(&encoded_png(400, 200), PREVIEW_SIZE).unwrap();
        assert_eq!(thumb.width, 128);
        assert_eq!(thumb.height, 64);
        assert_eq!(thumb.pixels.len(), (128 * 64 * 4) as usize);
    }

    #[test]
    fn test_small_image_keeps_size() {
        let thumb = render_thumbnail(&encoded_png(20, 30), PREVIEW_SIZE).unwrap();
        assert_eq!((thumb.width, thumb.height), (20, 30));
        assert_eq!(&thumb.pixels[..4], &[200, 40, 90, 255]);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        let result = render_thumbnail(b"definitely not an image", PREVIEW_SIZE);
        assert!(matches!(result, Err(PreviewError::Decode(_))));
    }

    #[tokio::test]
    async fn test_generate_preview_from_memory() {
        let file = MediaFile::from_bytes("face.png", "image/png", encoded_png(300, 300));
        let thumb = generate_preview(file).await.unwrap();
        assert_eq!((thumb.width, thumb.height), (128, 128));
    }

    #[tokio::test]
    async fn test_generate_preview_reports_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        std::fs::write(&path, encoded_png(4, 4)).unwrap();
        let file = MediaFile::from_path(path.clone()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        let result = generate_preview(file).await;
        assert!(matches!(result, Err(PreviewError::Read(_))));
    }
}
