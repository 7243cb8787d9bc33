//! Demo painter: a rectangle bouncing around the canvas.
//!
//! Click to toggle fill, press any key to cycle the color.

use easel_engine::drawables::{ClearRect, FillStyle, Rectangle, Text};
use easel_engine::{Canvas, KeyInput, Painter, Point, Rect, Size};

const BOX_SIZE: Size = Size::new(60, 60);
const COLORS: &[&str] = &["crimson", "royalblue", "seagreen", "darkorange"];

pub struct DemoPainter {
    position: Point,
    velocity: Point,
    filled: bool,
    color_index: usize,
    bounds: Size,
}

impl DemoPainter {
    pub fn new() -> Self {
        Self {
            position: Point::new(50, 50),
            velocity: Point::new(4, 3),
            filled: true,
            color_index: 0,
            bounds: Size::new(800, 600),
        }
    }
}

impl Painter for DemoPainter {
    fn setup(&mut self, canvas: &mut Canvas) {
        canvas.set_canvas_size(self.bounds);
        canvas.display_statistics(true);
    }

    fn calculate(&mut self, _canvas_id: u64, canvas_size: Option<Size>) {
        if let Some(size) = canvas_size {
            self.bounds = size;
        }

        self.position.x += self.velocity.x;
        self.position.y += self.velocity.y;

        if self.position.x <= 0 || self.position.x + BOX_SIZE.width >= self.bounds.width {
            self.velocity.x = -self.velocity.x;
        }
        if self.position.y <= 0 || self.position.y + BOX_SIZE.height >= self.bounds.height {
            self.velocity.y = -self.velocity.y;
        }
    }

    fn render(&mut self, canvas: &mut Canvas) {
        canvas.render(&[
            &ClearRect {
                rect: Rect::new(Point::new(0, 0), self.bounds),
            },
            &FillStyle::new(COLORS[self.color_index]),
            &Rectangle::new(Rect::new(self.position, BOX_SIZE), self.filled),
            &Text {
                location: Point::new(10, 20),
                text: "click: toggle fill / any key: cycle color".into(),
                font: "14px sans-serif".into(),
            },
        ]);
    }

    fn frames_per_second(&self) -> u32 {
        30
    }

    fn on_click(&mut self, _location: Point) {
        self.filled = !self.filled;
    }

    fn on_key_down(&mut self, _input: &KeyInput) {
        self.color_index = (self.color_index + 1) % COLORS.len();
    }

    fn on_canvas_resize(&mut self, size: Size) {
        self.bounds = size;
    }
}
