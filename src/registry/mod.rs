//! Viewer registry for fan-out
//!
//! The registry tracks the viewers that are currently connected and queues
//! frames to each of them. Every viewer owns a bounded `tokio::sync::mpsc`
//! queue; the hub only ever uses `try_send`, so a stalled viewer fills its
//! own queue and is dropped instead of holding up everyone else.
//!
//! # Architecture
//!
//! ```text
//!                         ActivityHub (Mutex)
//!                     ┌─────────────────────────┐
//!                     │ snapshot: SnapshotStore │
//!                     │ registry: HashMap<Id,   │
//!                     │   ViewerConnection {    │
//!                     │     tx: mpsc::Sender,   │
//!                     │   }                     │
//!                     │ >                       │
//!                     └───────────┬─────────────┘
//!                                 │ try_send(Frame)
//!         ┌───────────────────────┼───────────────────────┐
//!         ▼                       ▼                       ▼
//!     [Viewer]                [Viewer]                [Viewer]
//!     rx.recv()               rx.recv()               rx.recv()
//!         │                       │                       │
//!         └──► socket pump ──► WebSocket text frame ──► browser
//! ```

pub mod connection;
pub mod store;

pub use connection::{ConnectionId, SendError, ViewerConnection};
pub use store::{ConnectionRegistry, FanOut};
