//! Per-connection session: the canvas surface, the resource registry, and
//! the tick-driven protocol cycle.
//!
//! One `Session` belongs to one connection and is driven from one task, so
//! none of its entry points ever run concurrently and no locking is
//! needed. The transport calls `ready` once after the upgrade, `recurring`
//! on every tick, and `reception` for each inbound frame, transmitting
//! whatever frame `ready`/`recurring` hand back.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{error, warn};

use crate::batcher::CommandBatcher;
use crate::drawables::Drawable;
use crate::geometry::Size;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::painter::Painter;
use crate::protocol::InboundEvent;
use crate::resources::{ResourceId, ResourceObject, TextMetrics};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

struct Registered {
    object: Box<dyn ResourceObject>,
    lifecycle: Lifecycle,
}

/// The drawing surface handed to painter callbacks: the outbound batcher,
/// the resource registry, and the client-reported dimensions.
pub struct Canvas {
    id: u64,
    batcher: CommandBatcher,
    resources: HashMap<ResourceId, Registered>,
    canvas_size: Option<Size>,
    window_size: Option<Size>,
}

impl Canvas {
    fn new() -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            batcher: CommandBatcher::new(),
            resources: HashMap::new(),
            canvas_size: None,
            window_size: None,
        }
    }

    /// Process-lifetime unique session id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Client-reported canvas dimensions; `None` until the first
    /// `onCanvasResize` arrives. Never defaulted to zero.
    pub fn canvas_size(&self) -> Option<Size> {
        self.canvas_size
    }

    /// Client-reported window dimensions; `None` until the first
    /// `onWindowResize` arrives.
    pub fn window_size(&self) -> Option<Size> {
        self.window_size
    }

    /// Queue draw commands for the given drawables, in call order.
    pub fn render(&mut self, objects: &[&dyn Drawable]) {
        for object in objects {
            self.batcher.enqueue(object.draw_command());
        }
    }

    /// Register resources and queue their setup commands. The session owns
    /// the objects from here on; the returned ids (in registration order)
    /// are the painter's handles for readiness queries.
    pub fn setup(&mut self, objects: Vec<Box<dyn ResourceObject>>) -> Vec<ResourceId> {
        let mut ids = Vec::with_capacity(objects.len());
        for object in objects {
            let id = object.id();
            self.batcher.enqueue(object.setup_command());

            let mut registered = Registered {
                object,
                lifecycle: Lifecycle::new(),
            };
            registered
                .lifecycle
                .advance(id, LifecycleState::TransmissionQueued);
            self.resources.insert(id, registered);
            ids.push(id);
        }
        ids
    }

    /// Ask the client to resize its canvas element.
    pub fn set_canvas_size(&mut self, size: Size) {
        self.batcher
            .enqueue(format!("canvasSetSize|{}|{}", size.width, size.height));
    }

    /// Toggle the client-side statistics overlay.
    pub fn display_statistics(&mut self, enabled: bool) {
        self.batcher.enqueue(format!("displayStatistics|{enabled}"));
    }

    /// True iff the client has reported the resource usable.
    pub fn is_ready(&self, id: ResourceId) -> bool {
        self.resources
            .get(&id)
            .is_some_and(|r| r.lifecycle.is_ready())
    }

    /// True iff the client failed to materialize the resource.
    pub fn is_resource_error(&self, id: ResourceId) -> bool {
        self.resources
            .get(&id)
            .is_some_and(|r| r.lifecycle.is_resource_error())
    }

    /// Measurement for a text-metric probe, once the client has reported.
    pub fn text_metrics(&self, id: ResourceId) -> Option<TextMetrics> {
        self.resources
            .get(&id)
            .and_then(|r| r.object.as_text_metric())
            .and_then(|probe| probe.metrics())
    }
}

/// The per-connection aggregate: an externally supplied painter plus its
/// canvas. Painter and canvas are separate fields so painter callbacks can
/// borrow the canvas mutably.
pub struct Session {
    painter: Box<dyn Painter>,
    canvas: Canvas,
}

impl Session {
    pub fn new(painter: Box<dyn Painter>) -> Self {
        Self {
            painter,
            canvas: Canvas::new(),
        }
    }

    pub fn id(&self) -> u64 {
        self.canvas.id
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Delay the transport should wait before the next `recurring` call,
    /// derived from the painter's declared frame rate.
    pub fn tick_interval(&self) -> Duration {
        let fps = self.painter.frames_per_second().max(1);
        Duration::from_millis((1000.0 / f64::from(fps)).round() as u64)
    }

    /// First step of the protocol cycle: runs exactly once after the
    /// upgrade completes. Returns the frame to transmit, if any.
    pub fn ready(&mut self) -> Option<String> {
        self.painter.setup(&mut self.canvas);
        self.canvas.batcher.flush()
    }

    /// One tick: advance the painter, collect its draw commands, flush.
    pub fn recurring(&mut self) -> Option<String> {
        self.painter
            .calculate(self.canvas.id, self.canvas.canvas_size);
        self.painter.render(&mut self.canvas);
        self.canvas.batcher.flush()
    }

    /// Handle one inbound frame. Malformed or unknown events are logged
    /// and dropped without side effects; nothing here ends the session.
    pub fn reception(&mut self, text: &str) {
        match InboundEvent::parse(text) {
            Ok(event) => self.apply(event),
            Err(e) => warn!(session = self.canvas.id, error = %e, "dropping inbound frame"),
        }
    }

    fn apply(&mut self, event: InboundEvent) {
        match event {
            InboundEvent::Click(location) => self.painter.on_click(location),
            InboundEvent::MouseDown(location) => self.painter.on_mouse_down(location),
            InboundEvent::MouseUp(location) => self.painter.on_mouse_up(location),
            InboundEvent::WindowMouseUp(location) => self.painter.on_window_mouse_up(location),
            InboundEvent::MouseMove(location) => self.painter.on_mouse_move(location),

            InboundEvent::KeyDown(input) => self.painter.on_key_down(&input),
            InboundEvent::KeyUp(input) => self.painter.on_key_up(&input),

            InboundEvent::ResourceError { command, id } => {
                self.advance_resource(&command, id, LifecycleState::ResourceError);
            }
            InboundEvent::ResourceLoaded { command, id } => {
                self.advance_resource(&command, id, LifecycleState::Ready);
            }
            InboundEvent::ResourceProcessed { command, id } => {
                self.advance_resource(&command, id, LifecycleState::ProcessedByClient);
            }

            InboundEvent::TextMetricReady { id, metrics } => {
                self.apply_text_metrics(id, metrics);
            }

            InboundEvent::CanvasResize(size) => {
                self.canvas.canvas_size = Some(size);
                self.painter.on_canvas_resize(size);
            }
            InboundEvent::WindowResize(size) => {
                self.canvas.window_size = Some(size);
                self.painter.on_window_resize(size);
            }
        }
    }

    fn advance_resource(&mut self, command: &str, id: ResourceId, target: LifecycleState) {
        match self.canvas.resources.get_mut(&id) {
            Some(registered) => registered.lifecycle.advance(id, target),
            None => {
                error!(session = self.canvas.id, %command, %id, "event for unknown resource");
            }
        }
    }

    fn apply_text_metrics(&mut self, id: ResourceId, metrics: TextMetrics) {
        let Some(registered) = self.canvas.resources.get_mut(&id) else {
            error!(session = self.canvas.id, %id, "text metrics for unknown resource");
            return;
        };
        match registered.object.as_text_metric_mut() {
            Some(probe) => probe.set_metrics(metrics),
            None => {
                error!(session = self.canvas.id, %id, "text metrics for non text-metric resource");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use crate::drawables::{FillStyle, Rectangle};
    use crate::geometry::{Point, Rect};
    use crate::painter::KeyInput;
    use crate::resources::{Image, TextMetricProbe};

    /// Painter that records every callback so tests can assert dispatch.
    struct RecordingPainter {
        log: Arc<Mutex<Vec<String>>>,
        fps: u32,
    }

    impl RecordingPainter {
        fn new(fps: u32) -> (Self, Arc<Mutex<Vec<String>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            (
                Self {
                    log: log.clone(),
                    fps,
                },
                log,
            )
        }

        fn record(&self, entry: String) {
            self.log.lock().unwrap().push(entry);
        }
    }

    impl Painter for RecordingPainter {
        fn setup(&mut self, canvas: &mut Canvas) {
            canvas.render(&[&FillStyle::new("red")]);
        }

        fn calculate(&mut self, canvas_id: u64, canvas_size: Option<Size>) {
            self.record(format!("calculate {canvas_id} {canvas_size:?}"));
        }

        fn render(&mut self, canvas: &mut Canvas) {
            canvas.render(&[&Rectangle::new(
                Rect::new(Point::new(1, 2), Size::new(3, 4)),
                true,
            )]);
        }

        fn frames_per_second(&self) -> u32 {
            self.fps
        }

        fn on_click(&mut self, location: Point) {
            self.record(format!("click {} {}", location.x, location.y));
        }

        fn on_key_down(&mut self, input: &KeyInput) {
            self.record(format!(
                "keydown {} {} {} {} {} {}",
                input.key,
                input.code,
                input.modifiers.ctrl,
                input.modifiers.shift,
                input.modifiers.alt,
                input.modifiers.meta
            ));
        }

        fn on_canvas_resize(&mut self, size: Size) {
            self.record(format!("canvas_resize {} {}", size.width, size.height));
        }

        fn on_window_resize(&mut self, size: Size) {
            self.record(format!("window_resize {} {}", size.width, size.height));
        }
    }

    fn session_with_log(fps: u32) -> (Session, Arc<Mutex<Vec<String>>>) {
        let (painter, log) = RecordingPainter::new(fps);
        (Session::new(Box::new(painter)), log)
    }

    #[test]
    fn test_ready_flushes_setup_commands() {
        let (mut session, _log) = session_with_log(30);
        assert_eq!(session.ready().as_deref(), Some("fillStyle|red"));
        // setup runs once; a tick only carries the rendered frame
        assert_eq!(session.recurring().as_deref(), Some("rect|1|2|3|4|true"));
    }

    #[test]
    fn test_batch_preserves_call_order_across_render_and_setup() {
        let (mut session, _log) = session_with_log(30);
        let _ = session.ready();

        session.canvas.render(&[&FillStyle::new("blue")]);
        let image = Image::new("a.png");
        let setup_command = image.setup_command();
        session.canvas.setup(vec![Box::new(image)]);
        session.canvas.render(&[&FillStyle::new("green")]);

        let frame = session.canvas.batcher.flush().unwrap();
        assert_eq!(
            frame,
            format!("fillStyle|blue||{setup_command}||fillStyle|green")
        );
    }

    #[test]
    fn test_tick_interval_rounds_millis() {
        let (session, _log) = session_with_log(60);
        assert_eq!(session.tick_interval(), Duration::from_millis(17));

        let (session, _log) = session_with_log(10);
        assert_eq!(session.tick_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_click_dispatch_truncates_doubles() {
        let (mut session, log) = session_with_log(30);
        session.reception("onClick|10|20");
        session.reception("onClick|10.5|20.9");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["click 10 20".to_string(), "click 10 20".to_string()]
        );
    }

    #[test]
    fn test_malformed_click_is_dropped_without_side_effects() {
        let (mut session, log) = session_with_log(30);
        session.reception("onClick|10");
        session.reception("onClick|a|b");
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_key_down_dispatch() {
        let (mut session, log) = session_with_log(30);
        session.reception("onKeyDown|a|KeyA|true|false|true|false");
        assert_eq!(
            *log.lock().unwrap(),
            vec!["keydown a KeyA true false true false".to_string()]
        );
    }

    #[test]
    fn test_canvas_resize_stores_size_and_notifies_once() {
        let (mut session, log) = session_with_log(30);
        assert_eq!(session.canvas().canvas_size(), None);
        assert_eq!(session.canvas().window_size(), None);

        session.reception("onCanvasResize|800|600");
        assert_eq!(session.canvas().canvas_size(), Some(Size::new(800, 600)));
        // Window size stays unreported.
        assert_eq!(session.canvas().window_size(), None);
        assert_eq!(
            *log.lock().unwrap(),
            vec!["canvas_resize 800 600".to_string()]
        );
    }

    #[test]
    fn test_calculate_sees_reported_canvas_size() {
        let (mut session, log) = session_with_log(30);
        let _ = session.recurring();
        session.reception("onCanvasResize|640|480");
        let _ = session.recurring();

        let log = log.lock().unwrap();
        let id = session.id();
        assert_eq!(log[0], format!("calculate {id} None"));
        assert_eq!(
            log[2],
            format!(
                "calculate {id} Some(Size {{ width: 640, height: 480 }})"
            )
        );
    }

    #[test]
    fn test_unknown_resource_id_is_a_logged_no_op() {
        let (mut session, log) = session_with_log(30);
        session.reception(&format!("onImageLoaded|{}", uuid::Uuid::new_v4()));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_resource_round_trip() {
        let (mut session, _log) = session_with_log(30);
        let ids = session.canvas.setup(vec![Box::new(Image::new("ship.png"))]);
        let id = ids[0];
        assert!(!session.canvas().is_ready(id));
        assert!(!session.canvas().is_resource_error(id));

        // Flush carries the setup command to the client.
        assert!(session.canvas.batcher.flush().unwrap().contains("createImage"));

        session.reception(&format!("onImageProcessed|{id}"));
        assert!(!session.canvas().is_ready(id));

        session.reception(&format!("onImageLoaded|{id}"));
        assert!(session.canvas().is_ready(id));
        assert!(!session.canvas().is_resource_error(id));

        // A late error event is a regression: logged, and the last report
        // wins per the lifecycle policy.
        session.reception(&format!("onImageError|{id}"));
        assert!(session.canvas().is_resource_error(id));
        assert!(!session.canvas().is_ready(id));
    }

    #[test]
    fn test_text_metrics_require_a_probe() {
        let (mut session, _log) = session_with_log(30);
        let image_id = session.canvas.setup(vec![Box::new(Image::new("a.png"))])[0];
        let probe_id = session
            .canvas
            .setup(vec![Box::new(TextMetricProbe::new("12px serif", "hi"))])[0];

        let report = |id: ResourceId| format!("onTextMetricReady|{id}|42|1|2|||5|6|||||");

        // Type mismatch: logged, dropped.
        session.reception(&report(image_id));
        assert_eq!(session.canvas().text_metrics(image_id), None);

        session.reception(&report(probe_id));
        let metrics = session.canvas().text_metrics(probe_id).unwrap();
        assert_eq!(metrics.width, 42.0);
        assert_eq!(metrics.actual_bounding_box_ascent, 5.0);
        assert_eq!(metrics.font_bounding_box_ascent, None);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let (a, _) = session_with_log(30);
        let (b, _) = session_with_log(30);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_unknown_command_is_dropped() {
        let (mut session, log) = session_with_log(30);
        session.reception("onWarpDrive|9000");
        assert!(log.lock().unwrap().is_empty());
    }
}
