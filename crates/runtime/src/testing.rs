//! In-process stand-in for the node's UI gateway.
//!
//! Accepts WebSocket connections on loopback, echoes the requested
//! sub-protocol, records every text frame it receives, and lets a test push
//! frames to (or abruptly drop) the most recent connection. Like the real
//! node, it stops listening once it receives `"ShutdownMessage"`.
//!
//! Test support only: setup failures panic.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;

use crate::endpoint::UiEndpoint;

const WAIT_LIMIT: Duration = Duration::from_secs(5);
const SHUTDOWN_FRAME: &str = r#""ShutdownMessage""#;

enum Control {
	Send(String),
	Drop,
}

#[derive(Default)]
struct State {
	accepted: AtomicUsize,
	protocols: Mutex<Vec<Option<String>>>,
	controls: Mutex<Vec<mpsc::UnboundedSender<Control>>>,
	halted: Notify,
}

pub struct FakeNode {
	endpoint: UiEndpoint,
	state: Arc<State>,
	frames: mpsc::UnboundedReceiver<String>,
	accept_task: JoinHandle<()>,
}

impl FakeNode {
	/// Listens on an ephemeral port.
	pub async fn start() -> Self {
		Self::bind(0).await
	}

	/// Listens on `port`.
	pub async fn bind(port: u16) -> Self {
		let listener = TcpListener::bind(("127.0.0.1", port)).await.unwrap();
		let port = listener.local_addr().unwrap().port();
		let state = Arc::new(State::default());
		let (frames_tx, frames) = mpsc::unbounded_channel();

		let accept_state = Arc::clone(&state);
		let accept_task = tokio::spawn(async move {
			loop {
				tokio::select! {
					accepted = listener.accept() => match accepted {
						Ok((stream, _)) => {
							tokio::spawn(serve(stream, Arc::clone(&accept_state), frames_tx.clone()));
						}
						Err(_) => break,
					},
					_ = accept_state.halted.notified() => break,
				}
			}
		});

		Self {
			endpoint: UiEndpoint::default().with_port(port),
			state,
			frames,
			accept_task,
		}
	}

	pub fn endpoint(&self) -> UiEndpoint {
		self.endpoint.clone()
	}

	/// Number of completed WebSocket handshakes.
	pub fn accepted(&self) -> usize {
		self.state.accepted.load(Ordering::SeqCst)
	}

	/// Sub-protocol requested by each accepted client, in order.
	pub fn requested_protocols(&self) -> Vec<Option<String>> {
		self.state.protocols.lock().clone()
	}

	/// Pushes a text frame to the most recent connection.
	pub fn push(&self, frame: &str) {
		self.latest().send(Control::Send(frame.to_string())).ok();
	}

	/// Drops the most recent connection without a closing handshake.
	pub fn drop_latest(&self) {
		self.latest().send(Control::Drop).ok();
	}

	/// Waits for the next text frame received from any client.
	pub async fn next_frame(&mut self) -> String {
		tokio::time::timeout(WAIT_LIMIT, self.frames.recv())
			.await
			.expect("timed out waiting for a frame")
			.expect("fake node frame channel closed")
	}

	/// Returns a received frame without waiting, if any.
	pub fn try_next_frame(&mut self) -> Option<String> {
		self.frames.try_recv().ok()
	}

	/// Stops listening; later connection attempts are refused.
	pub async fn stop(self) {
		self.accept_task.abort();
		let _ = self.accept_task.await;
	}

	fn latest(&self) -> mpsc::UnboundedSender<Control> {
		self.state.controls.lock().last().cloned().expect("no connection accepted yet")
	}
}

async fn serve(stream: TcpStream, state: Arc<State>, frames: mpsc::UnboundedSender<String>) {
	let (control_tx, mut control_rx) = mpsc::unbounded_channel();

	let handshake_state = Arc::clone(&state);
	let callback = move |request: &Request, mut response: Response| -> Result<Response, ErrorResponse> {
		let requested = request.headers().get(SEC_WEBSOCKET_PROTOCOL).cloned();
		if let Some(protocol) = &requested {
			response.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol.clone());
		}
		handshake_state
			.protocols
			.lock()
			.push(requested.and_then(|p| p.to_str().ok().map(str::to_string)));
		handshake_state.controls.lock().push(control_tx);
		handshake_state.accepted.fetch_add(1, Ordering::SeqCst);
		Ok(response)
	};

	let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(stream, callback).await else {
		return;
	};

	loop {
		tokio::select! {
			frame = ws.next() => match frame {
				Some(Ok(Message::Text(text))) => {
					let shutdown = text == SHUTDOWN_FRAME;
					frames.send(text).ok();
					if shutdown {
						state.halted.notify_one();
						return;
					}
				}
				Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
				Some(Ok(_)) => {}
			},
			control = control_rx.recv() => match control {
				Some(Control::Send(text)) => {
					if ws.send(Message::Text(text)).await.is_err() {
						break;
					}
				}
				Some(Control::Drop) | None => return,
			},
		}
	}
}
