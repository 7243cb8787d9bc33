//! Resource objects — server-side handles to assets the client must
//! materialize asynchronously (images, audio, gradients, patterns,
//! text-metric probes).
//!
//! After registration via [`Canvas::setup`](crate::session::Canvas::setup)
//! the session owns the object; painters keep the [`ResourceId`] and query
//! readiness through the session.

use uuid::Uuid;

/// Opaque resource identifier, unique within a session for its lifetime.
pub type ResourceId = Uuid;

/// A producer of its own client-side setup command.
pub trait ResourceObject: Send {
    fn id(&self) -> ResourceId;

    /// The wire command instructing the client to create this resource.
    fn setup_command(&self) -> String;

    /// Closed-set downcast used when routing text measurement reports.
    fn as_text_metric(&self) -> Option<&TextMetricProbe> {
        None
    }

    fn as_text_metric_mut(&mut self) -> Option<&mut TextMetricProbe> {
        None
    }
}

/// A remote image loaded from a URL.
#[derive(Debug, Clone)]
pub struct Image {
    id: ResourceId,
    pub url: String,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
        }
    }
}

impl ResourceObject for Image {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        format!("createImage|{}|{}", self.id, self.url)
    }
}

/// A remote audio clip loaded from a URL.
#[derive(Debug, Clone)]
pub struct Audio {
    id: ResourceId,
    pub url: String,
    pub looping: bool,
}

impl Audio {
    pub fn new(url: impl Into<String>, looping: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            looping,
        }
    }
}

impl ResourceObject for Audio {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        format!("createAudio|{}|{}|{}", self.id, self.url, self.looping)
    }
}

/// One gradient color stop.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    /// Offset along the gradient line, 0.0 to 1.0.
    pub position: f64,
    pub color: String,
}

impl ColorStop {
    pub fn new(position: f64, color: impl Into<String>) -> Self {
        Self {
            position,
            color: color.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LinearGradient {
    id: ResourceId,
    pub start: crate::geometry::Point,
    pub end: crate::geometry::Point,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(
        start: crate::geometry::Point,
        end: crate::geometry::Point,
        stops: Vec<ColorStop>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            stops,
        }
    }
}

impl ResourceObject for LinearGradient {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        let mut command = format!(
            "createLinearGradient|{}|{}|{}|{}|{}",
            self.id, self.start.x, self.start.y, self.end.x, self.end.y
        );
        for stop in &self.stops {
            command.push_str(&format!("|{}|{}", stop.position, stop.color));
        }
        command
    }
}

#[derive(Debug, Clone)]
pub struct RadialGradient {
    id: ResourceId,
    pub start_center: crate::geometry::Point,
    pub start_radius: i32,
    pub end_center: crate::geometry::Point,
    pub end_radius: i32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(
        start_center: crate::geometry::Point,
        start_radius: i32,
        end_center: crate::geometry::Point,
        end_radius: i32,
        stops: Vec<ColorStop>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_center,
            start_radius,
            end_center,
            end_radius,
            stops,
        }
    }
}

impl ResourceObject for RadialGradient {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        let mut command = format!(
            "createRadialGradient|{}|{}|{}|{}|{}|{}|{}",
            self.id,
            self.start_center.x,
            self.start_center.y,
            self.start_radius,
            self.end_center.x,
            self.end_center.y,
            self.end_radius
        );
        for stop in &self.stops {
            command.push_str(&format!("|{}|{}", stop.position, stop.color));
        }
        command
    }
}

/// How a pattern tiles its source image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Repetition {
    #[default]
    Repeat,
    RepeatX,
    RepeatY,
    NoRepeat,
}

impl Repetition {
    fn as_str(self) -> &'static str {
        match self {
            Repetition::Repeat => "repeat",
            Repetition::RepeatX => "repeat-x",
            Repetition::RepeatY => "repeat-y",
            Repetition::NoRepeat => "no-repeat",
        }
    }
}

/// A fill pattern built from a previously registered image.
#[derive(Debug, Clone)]
pub struct Pattern {
    id: ResourceId,
    pub image_id: ResourceId,
    pub repetition: Repetition,
}

impl Pattern {
    pub fn new(image_id: ResourceId, repetition: Repetition) -> Self {
        Self {
            id: Uuid::new_v4(),
            image_id,
            repetition,
        }
    }
}

impl ResourceObject for Pattern {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        format!(
            "createPattern|{}|{}|{}",
            self.id,
            self.image_id,
            self.repetition.as_str()
        )
    }
}

/// Full text measurement report from the client.
///
/// The optional fields are not implemented by every browser; absence is a
/// valid "unsupported here" state, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub actual_bounding_box_left: f64,
    pub actual_bounding_box_right: f64,
    pub actual_bounding_box_ascent: f64,
    pub actual_bounding_box_descent: f64,
    pub font_bounding_box_ascent: Option<f64>,
    pub font_bounding_box_descent: Option<f64>,
    pub em_height_ascent: Option<f64>,
    pub em_height_descent: Option<f64>,
    pub hanging_baseline: Option<f64>,
    pub alphabetic_baseline: Option<f64>,
    pub ideographic_baseline: Option<f64>,
}

/// Asks the client to measure a piece of text in a given font.
#[derive(Debug, Clone)]
pub struct TextMetricProbe {
    id: ResourceId,
    pub font: String,
    pub text: String,
    metrics: Option<TextMetrics>,
}

impl TextMetricProbe {
    pub fn new(font: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            font: font.into(),
            text: text.into(),
            metrics: None,
        }
    }

    /// The client's measurement, once it has reported one.
    pub fn metrics(&self) -> Option<TextMetrics> {
        self.metrics
    }

    pub(crate) fn set_metrics(&mut self, metrics: TextMetrics) {
        self.metrics = Some(metrics);
    }
}

impl ResourceObject for TextMetricProbe {
    fn id(&self) -> ResourceId {
        self.id
    }

    fn setup_command(&self) -> String {
        format!("createTextMetric|{}|{}|{}", self.id, self.font, self.text)
    }

    fn as_text_metric(&self) -> Option<&TextMetricProbe> {
        Some(self)
    }

    fn as_text_metric_mut(&mut self) -> Option<&mut TextMetricProbe> {
        Some(self)
    }
}
