//! An IRC channel bot.
//!
//! The bot keeps a single connection to one server and one channel alive
//! indefinitely. Line framing, keepalive and the socket itself live in the
//! `irc_transport` crate; this crate holds the protocol logic on top.
//!
//! # Structure
//!
//! A [`Supervisor`] repeatedly builds a [`Transport`](irc_transport::Transport)
//! and a [`Session`], and runs the session until the transport reports a
//! fault. Any fault at all ends the session; the supervisor then starts again
//! from scratch, so no state survives a reconnect.
//!
//! The [`Session`] parses each received line into a [`Message`], answers
//! `PING`s, keeps the channel [`Roster`] up to date, and hands chat messages
//! to a [`MessageRouter`]. Everything happens in arrival order on one task;
//! a router sees the roster exactly as it stands after the preceding lines.
//!
//! # Commands
//!
//! The [`CommandRouter`] treats messages starting with `!` as commands, and
//! looks up handlers registered at compile time via `inventory`. Handler
//! errors are turned into notices to the originating channel or user, and
//! never reach the session. Web links in chat are followed afterwards and
//! their page titles announced the same way.

mod message;
pub use message::*;

mod roster;
pub use roster::*;

pub mod config;
pub use config::{RouterConfig, SessionConfig};

mod session;
pub use session::*;

mod command;
pub use command::*;

mod supervisor;
pub use supervisor::*;

mod tracing_config;
pub use tracing_config::build_subscriber;
