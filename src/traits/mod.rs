pub mod fetcher;
pub mod renderer;

pub use fetcher::*;
pub use renderer::*;
