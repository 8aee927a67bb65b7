use futures::future::LocalBoxFuture;
use futures::FutureExt;

use crate::error::LoadError;
use crate::texture::{TextureImage, TextureSettings, TextureSource};
use crate::traits::ImageFetcher;

/// Decodes any format the `image` crate recognizes into RGBA8, configured
/// for the inside of the cylinder
pub fn decode_texture(index: usize, source: &TextureSource, bytes: &[u8]) -> Result<TextureImage, LoadError> {
    let decoded = image::load_from_memory(bytes).map_err(|e| LoadError::Decode {
        index,
        source_name: source.to_string(),
        message: e.to_string(),
    })?;

    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    log::debug!("Decoded texture {index}: {width}x{height} from {source}");

    Ok(TextureImage::new(width, height, rgba.into_raw()).with_settings(TextureSettings::for_cylinder()))
}

/// Reads texture sources from disk or memory
#[derive(Debug, Clone, Copy, Default)]
pub struct FileFetcher;

impl FileFetcher {
    pub fn new() -> Self {
        Self
    }

    fn fetch_now(&self, index: usize, source: &TextureSource) -> Result<TextureImage, LoadError> {
        match source {
            TextureSource::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| LoadError::Read {
                    index,
                    source_name: source.to_string(),
                    message: e.to_string(),
                })?;
                decode_texture(index, source, &bytes)
            }
            TextureSource::Memory { bytes, .. } => decode_texture(index, source, bytes),
        }
    }
}

impl ImageFetcher for FileFetcher {
    fn fetch<'a>(
        &'a self,
        index: usize,
        source: &'a TextureSource,
    ) -> LocalBoxFuture<'a, Result<TextureImage, LoadError>> {
        async move { self.fetch_now(index, source) }.boxed_local()
    }
}
