use crate::core::{FrameClock, FrameInfo};
use crate::traits::SceneRenderer;

use super::session::PreviewSession;

/// Per-frame driver: measures the time since the previous frame and advances
/// the session by it
#[derive(Debug, Default)]
pub struct RenderLoop {
    clock: FrameClock,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart timing, e.g. after the window was hidden
    pub fn resume(&mut self) {
        self.clock.reset();
    }

    pub fn frame<R: SceneRenderer>(&mut self, session: &mut PreviewSession<R>) -> anyhow::Result<FrameInfo> {
        let info = self.clock.tick();
        session.advance(info.delta)?;
        if info.number > 0 && info.number % 600 == 0 {
            log::debug!("Frame {} at {:.1}s ({:.2} ms)", info.number, info.time, info.delta * 1000.0);
        }
        Ok(info)
    }

    pub fn frames(&self) -> u64 {
        self.clock.frame_number()
    }
}
