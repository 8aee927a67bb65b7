//! Sequential texture loading.
//!
//! Sources are fetched one at a time in descriptor order. Each decoded image
//! is attached to its descriptor before the next fetch starts, and the first
//! failure ends the sequence. Only a fully loaded sequence yields
//! [`AssetsReady`], which the scene builder requires.

use crate::error::LoadError;
use crate::texture::TextureDescriptor;
use crate::traits::ImageFetcher;

/// Proof that every descriptor of a sequence holds a decoded image.
///
/// Only [`AssetLoader`] creates it; building the scene consumes it.
#[derive(Debug)]
pub struct AssetsReady {
    count: usize,
}

impl AssetsReady {
    /// Number of loaded descriptors
    pub fn count(&self) -> usize {
        self.count
    }

    #[cfg(test)]
    pub(crate) fn for_tests(count: usize) -> Self {
        Self { count }
    }
}

pub struct AssetLoader<F: ImageFetcher> {
    fetcher: F,
}

impl<F: ImageFetcher> AssetLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Load every descriptor in order, stopping at the first failure.
    pub async fn load_all(&self, descriptors: &mut [TextureDescriptor]) -> Result<AssetsReady, LoadError> {
        if descriptors.is_empty() {
            return Err(LoadError::NoTextures);
        }

        let count = descriptors.len();
        for (index, descriptor) in descriptors.iter_mut().enumerate() {
            log::debug!("Loading texture {}/{}: {}", index + 1, count, descriptor.source());
            let image = self.fetcher.fetch(index, descriptor.source()).await?;
            log::info!(
                "Loaded texture {} ({}x{}) from {}",
                index,
                image.width,
                image.height,
                descriptor.source()
            );
            descriptor.attach(image);
        }

        Ok(AssetsReady { count })
    }

    /// Load every descriptor, then hand the token and the loaded
    /// descriptors to `on_ready`. On failure the error is logged and
    /// returned, and `on_ready` never runs.
    pub async fn load_then<T>(
        &self,
        descriptors: &mut [TextureDescriptor],
        on_ready: impl FnOnce(AssetsReady, &[TextureDescriptor]) -> T,
    ) -> Result<T, LoadError> {
        match self.load_all(descriptors).await {
            Ok(ready) => Ok(on_ready(ready, descriptors)),
            Err(e) => {
                log::error!("Texture loading failed: {e}");
                Err(e)
            }
        }
    }
}
