// src/services/image_processor.rs
use crate::errors::StudioError;
use crate::models::SelectedFile;
use base64::{Engine as _, engine::general_purpose};
use image::ImageFormat as ImgFormat;
use std::path::Path;

const OCTET_STREAM: &str = "application/octet-stream";

pub struct ImageProcessor;

impl ImageProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Declared media type for raw bytes: magic bytes first, then the file
    /// extension.
    pub fn sniff_content_type(&self, data: &[u8], path: Option<&Path>) -> String {
        image::guess_format(data)
            .ok()
            .or_else(|| path.and_then(|p| ImgFormat::from_path(p).ok()))
            .and_then(mime_for)
            .unwrap_or(OCTET_STREAM)
            .to_string()
    }

    /// Reads a file from disk the way a file picker hands it over.
    pub async fn load_file(&self, path: &Path) -> Result<SelectedFile, StudioError> {
        let data = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = self.sniff_content_type(&data, Some(path));

        Ok(SelectedFile::new(filename, content_type, data))
    }

    /// `data:` URI used as the preview image source.
    pub fn preview_data_uri(&self, file: &SelectedFile) -> String {
        let content_type = if file.content_type.is_empty() {
            OCTET_STREAM
        } else {
            file.content_type.as_str()
        };
        format!(
            "data:{};base64,{}",
            content_type,
            general_purpose::STANDARD.encode(&file.data)
        )
    }
}

impl Default for ImageProcessor {
    fn default() -> Self {
        Self::new()
    }
}

fn mime_for(format: ImgFormat) -> Option<&'static str> {
    match format {
        ImgFormat::Png => Some("image/png"),
        ImgFormat::Jpeg => Some("image/jpeg"),
        ImgFormat::Gif => Some("image/gif"),
        ImgFormat::WebP => Some("image/webp"),
        ImgFormat::Bmp => Some("image/bmp"),
        ImgFormat::Tiff => Some("image/tiff"),
        ImgFormat::Ico => Some("image/x-icon"),
        ImgFormat::Avif => Some("image/avif"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];

    #[test]
    fn magic_bytes_win_over_extension() {
        let processor = ImageProcessor::new();
        assert_eq!(
            processor.sniff_content_type(PNG_MAGIC, Some(Path::new("photo.jpg"))),
            "image/png"
        );
    }

    #[test]
    fn extension_is_the_fallback() {
        let processor = ImageProcessor::new();
        assert_eq!(
            processor.sniff_content_type(b"not an image", Some(Path::new("room.webp"))),
            "image/webp"
        );
        assert_eq!(
            processor.sniff_content_type(b"plain text", Some(Path::new("notes.txt"))),
            OCTET_STREAM
        );
    }

    #[test]
    fn preview_uses_declared_type() {
        let processor = ImageProcessor::new();
        let file = SelectedFile::new("a.png", "image/png", b"abc".to_vec());
        assert_eq!(processor.preview_data_uri(&file), "data:image/png;base64,YWJj");

        let untyped = SelectedFile::new("blob", "", b"abc".to_vec());
        assert_eq!(
            processor.preview_data_uri(&untyped),
            "data:application/octet-stream;base64,YWJj"
        );
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let result = ImageProcessor::new()
            .load_file(Path::new("/nonexistent/room.png"))
            .await;
        assert!(matches!(result, Err(StudioError::Io(_))));
    }
}
