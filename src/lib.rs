//! Live activity broadcast hub for A2UI viewers
//!
//! A single producer publishes an opaque payload (by convention JSONL text)
//! and every connected WebSocket viewer receives it. Viewers that connect
//! later receive the latest state immediately. Access can be restricted with
//! a shared token passed as the `activityToken` (or `a2uiToken`) query
//! parameter.
//!
//! # Example
//! ```no_run
//! use a2ui_activity::{ActivityConfig, ActivityServer, ServerConfig};
//!
//! # async fn example() -> a2ui_activity::Result<()> {
//! let activity = ActivityConfig {
//!     enabled: Some(true),
//!     token: Some("secret".into()),
//! };
//! let hub = a2ui_activity::create_hub(Some(&activity));
//! let server = ActivityServer::new(ServerConfig::default(), hub.clone());
//!
//! tokio::spawn(async move { server.run().await });
//! hub.publish("{\"surface\":\"main\"}").await;
//! # Ok(())
//! # }
//! ```
//!
//! Wire messages, one JSON object per text frame:
//!
//! ```text
//! { "type": "a2ui.state", "jsonl": "...", "updatedAt": 1700000000000 }   catch-up
//! { "type": "a2ui.push",  "jsonl": "...", "updatedAt": 1700000000000 }   publish
//! { "type": "a2ui.reset", "updatedAt": 1700000000000 }                   reset
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod hub;
pub mod lifecycle;
pub mod message;
pub mod registry;
pub mod server;
pub mod snapshot;
pub mod stats;

pub use config::ActivityConfig;
pub use error::{Error, Result};
pub use hub::{ActivityHub, HubConfig, HubPhase, Viewer};
pub use lifecycle::create_hub;
pub use message::{ActivityMessage, Frame};
pub use server::{ActivityServer, ServerConfig};
pub use snapshot::Snapshot;
pub use stats::HubStats;
