//! Drawable primitives — opaque producers of canvas wire commands.
//!
//! The session never inspects these strings; it appends them to the batch
//! in call order and the client interprets them.

use crate::geometry::{Point, Rect};

/// Anything that can render itself as one wire command.
pub trait Drawable {
    fn draw_command(&self) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct Rectangle {
    pub rect: Rect,
    pub filled: bool,
}

impl Rectangle {
    pub const fn new(rect: Rect, filled: bool) -> Self {
        Self { rect, filled }
    }
}

impl Drawable for Rectangle {
    fn draw_command(&self) -> String {
        format!(
            "rect|{}|{}|{}|{}|{}",
            self.rect.top_left.x,
            self.rect.top_left.y,
            self.rect.size.width,
            self.rect.size.height,
            self.filled
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ellipse {
    pub center: Point,
    pub radius_x: i32,
    pub radius_y: i32,
    pub filled: bool,
}

impl Drawable for Ellipse {
    fn draw_command(&self) -> String {
        format!(
            "ellipse|{}|{}|{}|{}|{}",
            self.center.x, self.center.y, self.radius_x, self.radius_y, self.filled
        )
    }
}

#[derive(Debug, Clone)]
pub struct Text {
    pub location: Point,
    pub text: String,
    pub font: String,
}

impl Drawable for Text {
    fn draw_command(&self) -> String {
        format!(
            "text|{}|{}|{}|{}",
            self.location.x, self.location.y, self.font, self.text
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClearRect {
    pub rect: Rect,
}

impl Drawable for ClearRect {
    fn draw_command(&self) -> String {
        format!(
            "clearRect|{}|{}|{}|{}",
            self.rect.top_left.x, self.rect.top_left.y, self.rect.size.width, self.rect.size.height
        )
    }
}

/// Sets the fill color (or a registered gradient/pattern id) for
/// subsequent fills.
#[derive(Debug, Clone)]
pub struct FillStyle {
    pub style: String,
}

impl FillStyle {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
        }
    }
}

impl Drawable for FillStyle {
    fn draw_command(&self) -> String {
        format!("fillStyle|{}", self.style)
    }
}

#[derive(Debug, Clone)]
pub struct StrokeStyle {
    pub style: String,
}

impl StrokeStyle {
    pub fn new(style: impl Into<String>) -> Self {
        Self {
            style: style.into(),
        }
    }
}

impl Drawable for StrokeStyle {
    fn draw_command(&self) -> String {
        format!("strokeStyle|{}", self.style)
    }
}
