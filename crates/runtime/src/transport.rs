//! WebSocket transport to the node's UI gateway.
//!
//! Every call to [`connect`] performs a brand-new handshake; nothing is pooled
//! or reused between attempts. The returned halves are used independently:
//! the sender by whoever issues commands, the receiver by a single reader task.

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use node_ui_protocol::Command;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::handshake::client::Request;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::http::header::SEC_WEBSOCKET_PROTOCOL;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::debug;

use crate::endpoint::UiEndpoint;
use crate::error::{Error, Result};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of a gateway connection.
#[derive(Debug)]
pub struct TransportSender {
	sink: SplitSink<WsStream, Message>,
}

impl TransportSender {
	/// Sends a text frame.
	pub async fn send_text(&mut self, text: String) -> Result<()> {
		self.sink
			.send(Message::Text(text))
			.await
			.map_err(|e| Error::Transport(format!("send failed: {e}")))
	}

	/// Encodes and sends a command.
	pub async fn send_command(&mut self, command: Command) -> Result<()> {
		let frame = command.to_frame()?;
		debug!(target = "node_ui", frame = %frame, "sending command");
		self.send_text(frame).await
	}

	/// Sends a close frame and flushes the sink.
	pub async fn close(&mut self) -> Result<()> {
		self.sink
			.close()
			.await
			.map_err(|e| Error::Transport(format!("close failed: {e}")))
	}
}

/// Read half of a gateway connection.
#[derive(Debug)]
pub struct TransportReceiver {
	stream: SplitStream<WsStream>,
}

impl TransportReceiver {
	/// Receives the next text payload.
	///
	/// Returns `None` once the peer closes the connection. Control frames are
	/// skipped; binary frames are accepted when they hold UTF-8.
	pub async fn recv(&mut self) -> Option<Result<String>> {
		loop {
			match self.stream.next().await {
				Some(Ok(Message::Text(text))) => return Some(Ok(text)),
				Some(Ok(Message::Binary(data))) => match String::from_utf8(data) {
					Ok(text) => return Some(Ok(text)),
					Err(_) => {
						debug!(target = "node_ui", "skipping non UTF-8 binary frame");
						continue;
					}
				},
				Some(Ok(Message::Close(frame))) => {
					debug!(target = "node_ui", ?frame, "peer closed connection");
					return None;
				}
				Some(Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_))) => continue,
				Some(Err(tungstenite::Error::ConnectionClosed)) | None => return None,
				Some(Err(e)) => return Some(Err(Error::Transport(format!("read failed: {e}")))),
			}
		}
	}
}

/// Builds the handshake request for `endpoint`, advertising its sub-protocol.
pub fn handshake_request(endpoint: &UiEndpoint) -> Result<Request> {
	let url = endpoint.url();
	let mut request = url
		.as_str()
		.into_client_request()
		.map_err(|e| Error::InvalidEndpoint(format!("{url}: {e}")))?;
	let protocol = HeaderValue::from_str(&endpoint.protocol)
		.map_err(|e| Error::InvalidEndpoint(format!("sub-protocol '{}': {e}", endpoint.protocol)))?;
	request.headers_mut().insert(SEC_WEBSOCKET_PROTOCOL, protocol);
	Ok(request)
}

/// Opens a fresh connection to the gateway.
///
/// Resolves once the WebSocket handshake completes, i.e. the connection is
/// open. The handshake fails if the node does not accept the sub-protocol.
pub async fn connect(endpoint: &UiEndpoint) -> Result<(TransportSender, TransportReceiver)> {
	let request = handshake_request(endpoint)?;
	let (stream, _response) = tokio_tungstenite::connect_async(request)
		.await
		.map_err(|source| Error::ConnectionFailed {
			url: endpoint.url(),
			source: Box::new(source),
		})?;

	let (sink, stream) = stream.split();
	Ok((TransportSender { sink }, TransportReceiver { stream }))
}
