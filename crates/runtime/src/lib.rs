//! Node UI Runtime - Control channel to a locally running node
//!
//! This crate talks to the node's UI gateway, a WebSocket endpoint on
//! loopback that speaks the `SubstratumNode-UI` sub-protocol:
//!
//! - **Transport**: Fresh WebSocket connections with the sub-protocol header
//! - **Connection**: One control session, descriptor request/response, shutdown
//! - **Liveness**: Bounded polling for the node coming up or going down
//! - **Endpoint**: Gateway address with environment overrides
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐
//! │ node-ui-cli  │  Status labels, commands
//! └──────┬───────┘
//!        │
//! ┌──────▼───────┐
//! │  node-ui-    │  This crate
//! │  runtime     │
//! │  ┌─────────┐ │
//! │  │ UiIface │ │  Session + pending descriptor slot
//! │  └─────────┘ │
//! │  ┌─────────┐ │
//! │  │Liveness │ │  Up/down polling with probe connections
//! │  └─────────┘ │
//! │  ┌─────────┐ │
//! │  │ Trans   │ │  WebSocket transport
//! │  └─────────┘ │
//! └──────────────┘
//! ```

pub mod connection;
pub mod endpoint;
pub mod error;
pub mod liveness;
pub mod transport;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types at crate root
pub use connection::UiInterface;
pub use endpoint::UiEndpoint;
pub use error::{Error, Result};
pub use liveness::{POLL_INTERVAL, verify_node_down, verify_node_up};
pub use transport::{TransportReceiver, TransportSender};
