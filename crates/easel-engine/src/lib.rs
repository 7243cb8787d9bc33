//! Canvas session engine — drives a remote browser canvas over a
//! persistent text connection.
//!
//! A server-side [`Painter`] produces drawing instructions; the engine
//! batches them into pipe-delimited wire commands, emits one aggregated
//! frame per tick, and parses inbound browser events (pointer, keyboard,
//! resize, resource lifecycle) back into typed painter callbacks.
//!
//! The engine never touches the network: the transport calls the three
//! [`Session`] entry points (`ready`, `recurring`, `reception`) and sends
//! whatever frames they return. One session belongs to one connection.

pub mod batcher;
pub mod drawables;
pub mod geometry;
pub mod lifecycle;
pub mod painter;
pub mod protocol;
pub mod resources;
pub mod session;

pub use drawables::Drawable;
pub use geometry::{Point, Rect, Size};
pub use lifecycle::LifecycleState;
pub use painter::{KeyInput, KeyModifiers, Painter};
pub use protocol::{InboundEvent, ProtocolError};
pub use resources::{
    Audio, ColorStop, Image, LinearGradient, Pattern, RadialGradient, Repetition,
    ResourceId, ResourceObject, TextMetricProbe, TextMetrics,
};
pub use session::{Canvas, Session};
