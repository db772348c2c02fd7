//! # ShareSync Host
//!
//! Lifecycle host for the ShareSync convergence engine.
//!
//! This crate provides:
//! - A tokio-backed fixed-rate tick scheduler
//! - `share` / `unshare` command parsing and dispatch
//! - Status delivery to command senders
//! - Join and shutdown hooks
//!
//! # Architecture
//!
//! The host owns one engine per running instance. Commands from a sender are
//! parsed, forwarded to the engine, and the resulting status message is sent
//! back to the sender. The engine's tick is driven by whatever
//! [`sharesync_engine::TickScheduler`] the host was built with; in a tokio
//! application that is [`TokioTickScheduler`].
//!
//! ```rust,ignore
//! use sharesync_host::{BufferedSender, HostConfig, SyncHost, TokioTickScheduler};
//!
//! let scheduler = Arc::new(TokioTickScheduler::current()?);
//! let host = SyncHost::new(HostConfig::default(), provider, scheduler);
//!
//! let sender = BufferedSender::new("admin");
//! host.dispatch(&sender, "share")?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod commands;
mod config;
mod error;
mod host;
mod scheduler;

pub use commands::{BufferedSender, Command, CommandSender, StatusLine};
pub use config::HostConfig;
pub use error::{HostError, HostResult};
pub use host::SyncHost;
pub use scheduler::TokioTickScheduler;
