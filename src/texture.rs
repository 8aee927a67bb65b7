//! Texture descriptors: where a display texture comes from and, once loaded,
//! its decoded pixels.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the encoded image lives
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    File(PathBuf),
    /// Encoded image bytes produced in-process (the generated chart)
    Memory { label: String, bytes: Arc<[u8]> },
}

impl TextureSource {
    pub fn memory(label: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self::Memory {
            label: label.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Display for TextureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory { label, bytes } => write!(f, "{label} ({} bytes in memory)", bytes.len()),
        }
    }
}

/// How the display samples a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureSettings {
    /// Pixels are sRGB encoded
    pub srgb: bool,
    /// Horizontal repeat with repeat wrapping; negative mirrors the image
    pub repeat_u: f32,
}

impl TextureSettings {
    /// Settings for the inside of the cylinder: seen from within, the image
    /// reads correctly only when mirrored horizontally
    pub const fn for_cylinder() -> Self {
        Self {
            srgb: true,
            repeat_u: -1.0,
        }
    }

    /// (scale u, scale v, offset u, offset v) for texture coordinates.
    /// A negative repeat is offset by its magnitude so coordinates stay in
    /// [0, 1] and the image is mirrored about its center.
    pub fn uv_transform(&self) -> [f32; 4] {
        let offset = if self.repeat_u < 0.0 { -self.repeat_u } else { 0.0 };
        [self.repeat_u, 1.0, offset, 0.0]
    }
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            srgb: true,
            repeat_u: 1.0,
        }
    }
}

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    pub settings: TextureSettings,
}

impl TextureImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
            settings: TextureSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: TextureSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// A texture source plus its decoded image once loading succeeded
#[derive(Debug, Clone)]
pub struct TextureDescriptor {
    source: TextureSource,
    image: Option<Arc<TextureImage>>,
}

impl TextureDescriptor {
    pub fn new(source: TextureSource) -> Self {
        Self { source, image: None }
    }

    pub fn source(&self) -> &TextureSource {
        &self.source
    }

    pub fn image(&self) -> Option<&Arc<TextureImage>> {
        self.image.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub(crate) fn attach(&mut self, image: TextureImage) {
        self.image = Some(Arc::new(image));
    }

    /// Point at a new source; the previous image no longer applies
    pub fn replace_source(&mut self, source: TextureSource) {
        self.source = source;
        self.image = None;
    }
}

impl From<PathBuf> for TextureDescriptor {
    fn from(path: PathBuf) -> Self {
        Self::new(TextureSource::File(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_starts_unloaded() {
        let descriptor = TextureDescriptor::from(PathBuf::from("a.png"));
        assert!(!descriptor.is_loaded());
        assert_eq!(descriptor.source().to_string(), "a.png");
    }

    #[test]
    fn replace_source_drops_image() {
        let mut descriptor = TextureDescriptor::new(TextureSource::memory("chart", vec![1, 2, 3]));
        descriptor.attach(TextureImage::new(1, 1, vec![0, 0, 0, 255]));
        assert!(descriptor.is_loaded());

        descriptor.replace_source(TextureSource::File(PathBuf::from("b.png")));
        assert!(!descriptor.is_loaded());
    }

    #[test]
    fn memory_source_display_mentions_size() {
        let source = TextureSource::memory("chart", vec![0; 42]);
        assert_eq!(source.to_string(), "chart (42 bytes in memory)");
    }

    #[test]
    fn cylinder_settings_mirror_horizontally() {
        let settings = TextureSettings::for_cylinder();
        assert!(settings.srgb);
        assert_eq!(settings.repeat_u, -1.0);
        assert_eq!(settings.uv_transform(), [-1.0, 1.0, 1.0, 0.0]);
        assert_eq!(TextureSettings::default().uv_transform(), [1.0, 1.0, 0.0, 0.0]);
    }
}
