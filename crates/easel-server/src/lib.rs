//! WebSocket transport for easel sessions.
//!
//! Owns everything the engine delegates outward: the HTTP listener, the
//! protocol upgrade, text-frame I/O, tick scheduling, and serving the
//! browser bootstrap assets. Each accepted connection gets its own
//! [`easel_engine::Session`] driven from a single task.

pub mod assets;
pub mod config;
pub mod connection;
pub mod server;

pub use config::ServerConfig;
pub use server::{start_server, AppState, PainterFactory};
