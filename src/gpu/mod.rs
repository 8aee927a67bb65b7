pub mod context;
pub mod renderer;

pub use context::GpuContext;
pub use renderer::WgpuRenderer;
