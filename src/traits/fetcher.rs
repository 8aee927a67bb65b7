use futures::future::LocalBoxFuture;

use crate::error::LoadError;
use crate::texture::{TextureImage, TextureSource};

/// Image source access - reads and decodes one texture source
///
/// Futures are local: loading runs on the thread that owns the preview.
pub trait ImageFetcher {
    /// Fetch and decode the source of descriptor `index`
    fn fetch<'a>(
        &'a self,
        index: usize,
        source: &'a TextureSource,
    ) -> LocalBoxFuture<'a, Result<TextureImage, LoadError>>;
}
