pub mod canvas;
pub mod clock;
pub mod frame;
pub mod input;
pub mod viewport;

pub use canvas::{Canvas, DrawOp, Rgba};
pub use clock::FrameClock;
pub use frame::FrameInfo;
pub use input::{InputAction, KeyInput, NavigationKey, WinitInput};
pub use viewport::Viewport;
