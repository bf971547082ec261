//! WebSocket server surface
//!
//! Exposes a hub over HTTP: the upgrade handler gates and attaches viewers,
//! and each viewer gets a pump task that writes its frames to the socket.

pub mod config;
pub mod handler;
pub mod listener;

pub use config::ServerConfig;
pub use handler::{activity_ws, handle_upgrade, serve_viewer};
pub use listener::{router, ActivityServer};
