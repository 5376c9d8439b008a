//! taskwatch: watch a remote task list as a persistent notification.
//!
//! Periodically polls a remote task-list service and renders the currently
//! selected list into a notification payload.
//!
//! # Architecture
//!
//! The poll cycle is a straight pipeline:
//! - **Client**: fetches task records over HTTP (`api`)
//! - **Tree builder**: sorts the batch and assembles the two-level task
//!   forest with precomputed display lines (`tree`)
//! - **Renderer**: produces the notification payload and hands it to a
//!   [`notify::NotificationSink`] (`notify`)
//! - **Poller**: runs the cycle on a fixed delay with explicit
//!   idle/running state (`poller`)
//!
//! The selected list and the credential reference persist in `config.toml`
//! (`config`, `credentials`, `paths`).

pub mod api;
pub mod config;
pub mod credentials;
pub mod error;
pub mod notify;
pub mod paths;
pub mod poller;
pub mod tree;

pub use config::WatchConfig;
pub use error::{Result, TaskwatchError};
