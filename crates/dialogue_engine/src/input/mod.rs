//! Input events delivered to a mode
//!
//! Handlers return `true` when they consume an event, which stops the host
//! from forwarding it further.

/// Keys a dialogue mode reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Confirm the selected option
    Enter,
    /// Release the pointer
    Escape,
    /// Previous option
    Up,
    /// Next option
    Down,
}

/// Mouse buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button
    Left,
    /// Right mouse button
    Right,
    /// Middle mouse button
    Middle,
}

/// One window input event; positions are window pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed
    KeyDown(KeyCode),
    /// Mouse button pressed at a position
    MouseButtonDown {
        /// Which button
        button: MouseButton,
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
    /// Pointer moved
    MouseMotion {
        /// Horizontal position
        x: f32,
        /// Vertical position
        y: f32,
    },
}

impl InputEvent {
    /// Pointer position carried by the event, if any
    pub const fn position(&self) -> Option<(f32, f32)> {
        match *self {
            Self::MouseButtonDown { x, y, .. } | Self::MouseMotion { x, y } => Some((x, y)),
            Self::KeyDown(_) => None,
        }
    }
}
