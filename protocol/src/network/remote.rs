//! Websocket client for a ledger server.
//!
//! A [`Remote`] owns one connection. Writes go through the sink half under a
//! lock; a spawned reader task owns the stream half and routes each response
//! to the waiting caller by request `id` over a `oneshot` channel. When the
//! stream ends, every pending request is dropped so its caller sees
//! [`SubmitError::ConnectionClosed`] instead of hanging.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use parking_lot::Mutex;
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, trace, warn};

use super::messages::{ServerMessage, SubmitRequest, SubmitResult};
use super::SubmitError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type Pending = Arc<Mutex<HashMap<u64, oneshot::Sender<ServerMessage>>>>;

/// A connected websocket client.
pub struct Remote {
    url: String,
    sink: tokio::sync::Mutex<SplitSink<WsStream, Message>>,
    pending: Pending,
    next_id: AtomicU64,
    reader: JoinHandle<()>,
}

impl Remote {
    /// Opens a websocket connection to `url` (`ws://` or `wss://`).
    pub async fn connect(url: &str) -> Result<Self, SubmitError> {
        debug!(url, "connecting");
        let (ws, _response) = connect_async(url)
            .await
            .map_err(|source| SubmitError::Connect {
                url: url.to_string(),
                source: Box::new(source),
            })?;
        info!(url, "connected");

        let (sink, stream) = ws.split();
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));
        let reader = tokio::spawn(read_loop(stream, Arc::clone(&pending)));

        Ok(Self {
            url: url.to_string(),
            sink: tokio::sync::Mutex::new(sink),
            pending,
            next_id: AtomicU64::new(1),
            reader,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submits a signed blob and waits for the engine result.
    ///
    /// With `timeout` set, gives up after that long. With `None`, waits
    /// until the server answers or the connection drops.
    pub async fn submit(
        &self,
        blob: &[u8],
        timeout: Option<Duration>,
    ) -> Result<SubmitResult, SubmitError> {
        let wait = self.submit_inner(blob);
        let response = match timeout {
            Some(limit) => tokio::time::timeout(limit, wait)
                .await
                .map_err(|_| SubmitError::Timeout(limit))??,
            None => wait.await?,
        };

        if response.is_error() {
            return Err(SubmitError::Server {
                error: response.error.unwrap_or_else(|| "unknown".to_string()),
                message: response.error_message.unwrap_or_default(),
            });
        }

        let result = response
            .result
            .ok_or_else(|| SubmitError::MalformedResponse("response has no result".to_string()))?;
        let result: SubmitResult = serde_json::from_value(result)
            .map_err(|e| SubmitError::MalformedResponse(e.to_string()))?;

        info!(
            engine_result = %result.engine_result,
            code = result.engine_result_code,
            "submit answered"
        );
        Ok(result)
    }

    async fn submit_inner(&self, blob: &[u8]) -> Result<ServerMessage, SubmitError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let blob_hex = hex::encode_upper(blob);
        let request =
            serde_json::to_string(&SubmitRequest::new(id, &blob_hex)).map_err(SubmitError::Encode)?;

        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        debug!(id, bytes = blob.len(), "sending submit");
        if let Err(e) = self.sink.lock().await.send(Message::Text(request)).await {
            self.pending.lock().remove(&id);
            return Err(SubmitError::Send(Box::new(e)));
        }

        rx.await.map_err(|_| SubmitError::ConnectionClosed)
    }

    /// Sends a close frame and stops the reader.
    pub async fn close(self) {
        if let Err(e) = self.sink.lock().await.close().await {
            debug!(error = %e, "close frame not sent");
        }
        self.reader.abort();
    }
}

impl Drop for Remote {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

async fn read_loop(mut stream: SplitStream<WsStream>, pending: Pending) {
    while let Some(frame) = stream.next().await {
        let text = match frame {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(other) => {
                trace!(?other, "ignoring non-text frame");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "websocket read failed");
                break;
            }
        };

        let message: ServerMessage = match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                warn!(error = %e, "unparseable server message");
                continue;
            }
        };

        let Some(id) = message.id else {
            trace!(kind = ?message.kind, "ignoring stream message");
            continue;
        };
        match pending.lock().remove(&id) {
            Some(waiter) => {
                let _ = waiter.send(message);
            }
            None => debug!(id, "response for unknown request"),
        }
    }

    debug!("websocket closed");
    pending.lock().clear();
}

/// Connects to `url`, submits `blob`, and closes the connection.
///
/// `timeout` covers the whole exchange, connection included.
pub async fn submit_blob(
    url: &str,
    blob: &[u8],
    timeout: Option<Duration>,
) -> Result<SubmitResult, SubmitError> {
    let exchange = async {
        let remote = Remote::connect(url).await?;
        let result = remote.submit(blob, None).await;
        remote.close().await;
        result
    };
    match timeout {
        Some(limit) => tokio::time::timeout(limit, exchange)
            .await
            .map_err(|_| SubmitError::Timeout(limit))?,
        None => exchange.await,
    }
}
