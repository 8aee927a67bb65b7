use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Pixels of trackpad scroll that count as one wheel notch
const PIXELS_PER_LINE: f32 = 100.0;

/// Direction to move through the texture sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationKey {
    Next,
    Previous,
}

/// Key press addressed to the preview
///
/// `trusted` is false for synthetic events the platform generated itself
/// (for example keys held while the window gained focus).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: NavigationKey,
    pub trusted: bool,
}

/// What a window event asks the preview to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputAction {
    Navigate(KeyInput),
    /// Orbit by a pointer drag, in pixels
    Rotate { dx: f32, dy: f32 },
    /// Zoom by wheel notches, positive towards the target
    Zoom(f32),
    Quit,
}

/// Adapter that turns Winit window events into preview actions
#[derive(Debug, Clone, Default)]
pub struct WinitInput {
    /// Left button held, orbit drag in progress
    dragging: bool,
    /// Current pointer position (relative to window)
    pointer: Option<(f32, f32)>,
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent, returning the action it maps to
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputAction> {
        match event {
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => match event.physical_key {
                PhysicalKey::Code(code) => {
                    Self::map_key(code, event.state.is_pressed(), *is_synthetic)
                }
                PhysicalKey::Unidentified(_) => None,
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.set_dragging(*state == ElementState::Pressed);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(position.x as f32, position.y as f32)
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer = None;
                None
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let notches = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32 / PIXELS_PER_LINE,
                };
                (notches != 0.0).then_some(InputAction::Zoom(notches))
            }
            _ => None,
        }
    }

    /// Map a physical key to an action; only presses count
    pub fn map_key(code: KeyCode, pressed: bool, synthetic: bool) -> Option<InputAction> {
        if !pressed {
            return None;
        }
        let trusted = !synthetic;
        match code {
            KeyCode::ArrowRight => Some(InputAction::Navigate(KeyInput {
                key: NavigationKey::Next,
                trusted,
            })),
            KeyCode::ArrowLeft => Some(InputAction::Navigate(KeyInput {
                key: NavigationKey::Previous,
                trusted,
            })),
            KeyCode::Escape if trusted => Some(InputAction::Quit),
            _ => None,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
    }

    /// Record a pointer move; yields a rotation while dragging
    pub fn move_pointer(&mut self, x: f32, y: f32) -> Option<InputAction> {
        let previous = self.pointer.replace((x, y));
        match previous {
            Some((old_x, old_y)) if self.dragging => Some(InputAction::Rotate {
                dx: x - old_x,
                dy: y - old_y,
            }),
            _ => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn pointer(&self) -> Option<(f32, f32)> {
        self.pointer
    }
}
