pub mod sequence;
pub mod texture;

pub use sequence::{AssetLoader, AssetsReady};
pub use texture::{decode_texture, FileFetcher};
