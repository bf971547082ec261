//! Activity broadcast hub
//!
//! One hub carries one state stream: a producer publishes or resets, every
//! attached viewer receives the change, and viewers joining later receive
//! the current state first.
//!
//! ```text
//!   producer ──publish()/reset_state()──► ActivityHub ──Frame──► Viewer ──► socket
//!                                            ▲
//!   upgrade ──authorize()──► attach() ───────┘ (catch-up frame queued first)
//! ```

pub mod activity;
pub mod config;
pub mod state;
pub mod viewer;

pub use activity::ActivityHub;
pub use config::HubConfig;
pub use state::HubPhase;
pub use viewer::Viewer;
