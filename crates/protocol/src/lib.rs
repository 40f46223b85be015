//! Wire types for the node UI control channel.
//!
//! The node exposes a WebSocket endpoint on loopback that speaks a private
//! sub-protocol. Commands travel as bare JSON string literals and responses as
//! JSON objects keyed by response kind.
//!
//! # Main Types
//!
//! - [`Command`] - Commands sent from the UI to the node
//! - [`Response`] - Messages received from the node
//! - [`NodeStatus`] - Status labels reported by lifecycle actions

mod message;
mod status;

pub use message::{Command, Response};
pub use status::NodeStatus;

/// Port the node's UI gateway listens on.
pub const DEFAULT_UI_PORT: u16 = 5333;

/// Host the node's UI gateway binds to.
pub const UI_INTERFACE_HOST: &str = "127.0.0.1";

/// WebSocket sub-protocol the node accepts UI connections on.
pub const UI_PROTOCOL: &str = "SubstratumNode-UI";
