//! Control session with the node.
//!
//! [`UiInterface`] owns at most one live [`Session`] and at most one pending
//! descriptor request. It handles:
//! - Opening, replacing, and closing the session
//! - Resolving the pending descriptor request from inbound messages
//! - Rejecting the pending request whenever its session goes away
//! - The fire-and-forget shutdown command
//!
//! # Message Flow
//!
//! 1. Caller invokes `get_node_descriptor()`
//! 2. A pending slot is filled with a oneshot sender (fails if already filled)
//! 3. `"GetNodeDescriptor"` is written to the session
//! 4. The session's reader task parses each inbound frame
//! 5. A `NodeDescriptor` frame empties the slot and completes the oneshot
//! 6. A transport error or close empties the slot with `SessionLost`

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use node_ui_protocol::{Command, Response};
use parking_lot::Mutex;
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::endpoint::UiEndpoint;
use crate::error::{Error, Result};
use crate::liveness;
use crate::transport::{self, TransportReceiver, TransportSender};

/// A live control connection.
struct Session {
	id: u64,
	sender: TokioMutex<TransportSender>,
	reader: JoinHandle<()>,
}

impl Session {
	async fn send(&self, command: Command) -> Result<()> {
		self.sender.lock().await.send_command(command).await
	}
}

/// The single outstanding descriptor request.
struct PendingDescriptor {
	id: u32,
	tx: oneshot::Sender<Result<String>>,
}

/// State shared between the interface and its session's reader task.
struct Shared {
	session: Mutex<Option<Arc<Session>>>,
	pending: Mutex<Option<PendingDescriptor>>,
}

impl Shared {
	fn current_session(&self) -> Option<Arc<Session>> {
		self.session.lock().clone()
	}

	fn take_session(&self) -> Option<Arc<Session>> {
		self.session.lock().take()
	}

	fn holds_session(&self, id: u64) -> bool {
		self.session.lock().as_ref().is_some_and(|session| session.id == id)
	}

	/// Clears the session slot if it still holds session `id`.
	fn release_session(&self, id: u64) -> bool {
		let mut slot = self.session.lock();
		if slot.as_ref().is_some_and(|session| session.id == id) {
			*slot = None;
			true
		} else {
			false
		}
	}

	fn reject_pending(&self, reason: &str) {
		if let Some(pending) = self.pending.lock().take() {
			debug!(target = "node_ui", request = pending.id, reason, "rejecting pending descriptor request");
			let _ = pending.tx.send(Err(Error::SessionLost(reason.to_string())));
		}
	}

	/// Clears the pending slot if it still holds request `id`.
	fn clear_pending(&self, id: u32) {
		let mut slot = self.pending.lock();
		if slot.as_ref().is_some_and(|pending| pending.id == id) {
			*slot = None;
		}
	}

	fn dispatch(&self, frame: &str) {
		match Response::parse(frame) {
			Ok(Response::NodeDescriptor(descriptor)) => match self.pending.lock().take() {
				Some(pending) => {
					debug!(target = "node_ui", request = pending.id, "descriptor received");
					let _ = pending.tx.send(Ok(descriptor));
				}
				None => warn!(target = "node_ui", "descriptor received with no request pending; ignored"),
			},
			Ok(Response::Unknown(value)) => {
				debug!(target = "node_ui", message = %value, "unrecognized message from node (ignored)");
			}
			Err(e) => warn!(target = "node_ui", error = %e, "failed to parse message from node"),
		}
	}

	/// Closes a session that has already been removed from the slot.
	async fn end_session(&self, session: Arc<Session>, reason: &str) {
		self.reject_pending(reason);
		if let Err(e) = session.sender.lock().await.close().await {
			debug!(target = "node_ui", session = session.id, error = %e, "close failed");
		}
		session.reader.abort();
		info!(target = "node_ui", session = session.id, reason, "session closed");
	}
}

/// Removes the pending slot installed by an abandoned request.
struct PendingGuard {
	id: u32,
	shared: Arc<Shared>,
}

impl Drop for PendingGuard {
	fn drop(&mut self) {
		self.shared.clear_pending(self.id);
	}
}

/// Control channel to one node.
pub struct UiInterface {
	endpoint: UiEndpoint,
	shared: Arc<Shared>,
	last_session_id: AtomicU64,
	last_request_id: AtomicU32,
}

impl UiInterface {
	pub fn new(endpoint: UiEndpoint) -> Self {
		Self {
			endpoint,
			shared: Arc::new(Shared {
				session: Mutex::new(None),
				pending: Mutex::new(None),
			}),
			last_session_id: AtomicU64::new(0),
			last_request_id: AtomicU32::new(0),
		}
	}

	pub fn endpoint(&self) -> &UiEndpoint {
		&self.endpoint
	}

	/// Whether a session is currently held.
	pub fn is_connected(&self) -> bool {
		self.shared.session.lock().is_some()
	}

	/// Opens a session with the node.
	///
	/// A session that is already open is closed first, so a failed attempt
	/// leaves the interface disconnected. On failure any pending descriptor
	/// request is rejected. No retries are made here.
	pub async fn connect(&self) -> Result<()> {
		if let Some(previous) = self.shared.take_session() {
			self.shared.end_session(previous, "session replaced by a new connection").await;
		}

		let (sender, receiver) = match transport::connect(&self.endpoint).await {
			Ok(parts) => parts,
			Err(e) => {
				self.shared.reject_pending("connection to node failed");
				return Err(e);
			}
		};

		let id = self.last_session_id.fetch_add(1, Ordering::SeqCst);
		let displaced = {
			let mut slot = self.shared.session.lock();
			let reader = tokio::spawn(read_loop(Arc::clone(&self.shared), id, receiver));
			slot.replace(Arc::new(Session {
				id,
				sender: TokioMutex::new(sender),
				reader,
			}))
		};
		info!(target = "node_ui", session = id, url = %self.endpoint.url(), "session open");

		// A concurrent connect may have installed its own session meanwhile.
		if let Some(displaced) = displaced {
			self.shared.end_session(displaced, "session replaced by a new connection").await;
		}
		Ok(())
	}

	/// Closes the session without telling the node anything. No-op when disconnected.
	pub async fn disconnect(&self) {
		if let Some(session) = self.shared.take_session() {
			self.shared.end_session(session, "session disconnected").await;
		}
	}

	/// Asks the node for its descriptor.
	///
	/// Only one request may be outstanding: a second caller gets
	/// [`Error::CallAlreadyInProgress`] and nothing is sent. Resolves when the
	/// node answers, or fails with [`Error::SessionLost`] when the session
	/// errors or closes first. There is no timeout.
	pub async fn get_node_descriptor(&self) -> Result<String> {
		let current = self.shared.current_session();
		let (session, id, rx) = {
			let mut slot = self.shared.pending.lock();
			if slot.is_some() {
				return Err(Error::CallAlreadyInProgress);
			}
			let Some(session) = current else {
				return Err(Error::NotConnected);
			};
			let id = self.last_request_id.fetch_add(1, Ordering::SeqCst);
			let (tx, rx) = oneshot::channel();
			*slot = Some(PendingDescriptor { id, tx });
			(session, id, rx)
		};
		let _guard = PendingGuard {
			id,
			shared: Arc::clone(&self.shared),
		};
		// The session may have ended before the slot was filled; nothing would reject it then.
		if !self.shared.holds_session(session.id) {
			return Err(Error::SessionLost("session ended before the request was sent".into()));
		}

		debug!(target = "node_ui", session = session.id, request = id, "requesting node descriptor");
		session.send(Command::GetNodeDescriptor).await?;

		rx.await.map_err(|_| Error::ChannelClosed)?
	}

	/// Tells the node to shut down and closes the session.
	///
	/// Fire-and-forget: no acknowledgement is awaited. The session is cleared
	/// even when the command could not be written.
	pub async fn shutdown(&self) -> Result<()> {
		let session = self.shared.take_session().ok_or(Error::NotConnected)?;
		info!(target = "node_ui", session = session.id, "sending shutdown to node");
		let sent = session.send(Command::Shutdown).await;
		self.shared.end_session(session, "session shut down").await;
		sent
	}

	/// Polls until the node accepts a connection. See [`liveness::verify_node_up`].
	pub async fn verify_node_up(&self, timeout: Duration) -> bool {
		liveness::verify_node_up(&self.endpoint, timeout).await
	}

	/// Polls until the node refuses a connection. See [`liveness::verify_node_down`].
	pub async fn verify_node_down(&self, timeout: Duration) -> bool {
		liveness::verify_node_down(&self.endpoint, timeout).await
	}
}

impl Drop for UiInterface {
	fn drop(&mut self) {
		if let Some(session) = self.shared.take_session() {
			session.reader.abort();
		}
	}
}

impl std::fmt::Debug for UiInterface {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("UiInterface")
			.field("endpoint", &self.endpoint)
			.field("connected", &self.is_connected())
			.finish()
	}
}

/// Drains a session's inbound frames until the transport errors or closes.
async fn read_loop(shared: Arc<Shared>, session_id: u64, mut receiver: TransportReceiver) {
	let reason = loop {
		match receiver.recv().await {
			Some(Ok(frame)) => shared.dispatch(&frame),
			Some(Err(e)) => break e.to_string(),
			None => break "connection closed by node".to_string(),
		}
	};

	if shared.release_session(session_id) {
		info!(target = "node_ui", session = session_id, reason = %reason, "session ended");
		shared.reject_pending(&reason);
	}
}
