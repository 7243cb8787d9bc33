//! The painter contract — the application side of a session.

use crate::geometry::{Point, Size};
use crate::session::Canvas;

/// Keyboard modifier flags as reported by the browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// One decoded key event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    /// The produced character or named key ("a", "Enter", ...).
    pub key: String,
    /// The physical key code ("KeyA", "Space", ...).
    pub code: String,
    pub modifiers: KeyModifiers,
}

/// Application-supplied drawing logic, one instance per connection.
///
/// `setup` runs exactly once after the protocol upgrade; `calculate` then
/// `render` run on every tick. Input callbacks default to no-ops so a
/// painter only implements what it reacts to.
pub trait Painter: Send {
    /// Issue initial setup/render calls against a fresh canvas.
    fn setup(&mut self, canvas: &mut Canvas);

    /// Advance simulation state for the next frame. `canvas_size` is
    /// `None` until the client has reported its first resize.
    fn calculate(&mut self, canvas_id: u64, canvas_size: Option<Size>);

    /// Issue draw commands for the current frame.
    fn render(&mut self, canvas: &mut Canvas);

    /// Target frame rate; the transport derives the tick interval from it.
    fn frames_per_second(&self) -> u32 {
        10
    }

    fn on_click(&mut self, _location: Point) {}
    fn on_mouse_down(&mut self, _location: Point) {}
    fn on_mouse_up(&mut self, _location: Point) {}
    fn on_window_mouse_up(&mut self, _location: Point) {}
    fn on_mouse_move(&mut self, _location: Point) {}
    fn on_key_down(&mut self, _input: &KeyInput) {}
    fn on_key_up(&mut self, _input: &KeyInput) {}
    fn on_canvas_resize(&mut self, _size: Size) {}
    fn on_window_resize(&mut self, _size: Size) {}
}
