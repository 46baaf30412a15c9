//! `tokio-tungstenite` implementation of the transport traits.
//!
//! # Frame mapping
//!
//! | WebSocket message  | Client side                          |
//! |--------------------|--------------------------------------|
//! | `Text`             | [`RawFrame::Text`]                   |
//! | `Binary`           | [`RawFrame::Binary`]                 |
//! | `Ping` / `Pong`    | skipped (tungstenite answers pings)  |
//! | `Close` / EOF      | socket marked closed, `Connection`   |
//!
//! Any transport error also marks the socket closed so the next operation
//! opens a fresh one.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use pixelblaze_core::RawFrame;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, Message as WsMessage},
    MaybeTlsStream, WebSocketStream,
};
use tracing::debug;

use crate::application::transport::{Connector, Socket};
use crate::domain::error::ClientError;

/// Opens WebSocket connections with [`connect_async`].
#[derive(Debug, Default, Clone, Copy)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Socket>, ClientError> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| ClientError::Connection(format!("failed to connect to {url}: {e}")))?;
        debug!("WebSocket handshake with {} done ({})", url, response.status());
        Ok(Box::new(WsSocket::new(stream)))
    }
}

/// One WebSocket connection to the device.
pub struct WsSocket {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
}

impl WsSocket {
    pub fn new(stream: WebSocketStream<MaybeTlsStream<TcpStream>>) -> Self {
        Self { stream, open: true }
    }

    fn fail(&mut self, what: &str, e: WsError) -> ClientError {
        self.open = false;
        ClientError::Connection(format!("{what}: {e}"))
    }
}

#[async_trait]
impl Socket for WsSocket {
    fn is_open(&self) -> bool {
        self.open
    }

    async fn send(&mut self, frame: RawFrame) -> Result<(), ClientError> {
        let message = match frame {
            RawFrame::Text(text) => WsMessage::Text(text),
            RawFrame::Binary(bytes) => WsMessage::Binary(bytes),
        };
        let result = self.stream.send(message).await;
        result.map_err(|e| self.fail("write failed", e))
    }

    async fn recv(&mut self) -> Result<RawFrame, ClientError> {
        loop {
            // `next()` returns `None` once the stream has ended.
            let next = self.stream.next().await;
            match next {
                Some(Ok(WsMessage::Text(text))) => return Ok(RawFrame::Text(text)),
                Some(Ok(WsMessage::Binary(bytes))) => return Ok(RawFrame::Binary(bytes)),
                Some(Ok(WsMessage::Ping(_) | WsMessage::Pong(_) | WsMessage::Frame(_))) => {
                    continue
                }
                Some(Ok(WsMessage::Close(reason))) => {
                    debug!("device sent close frame: {:?}", reason);
                    self.open = false;
                    return Err(ClientError::Connection(
                        "device closed the connection".to_string(),
                    ));
                }
                Some(Err(e)) => return Err(self.fail("read failed", e)),
                None => {
                    self.open = false;
                    return Err(ClientError::Connection("connection ended".to_string()));
                }
            }
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.open = false;
        match self.stream.close(None).await {
            Ok(()) | Err(WsError::ConnectionClosed | WsError::AlreadyClosed) => Ok(()),
            Err(e) => Err(ClientError::Connection(format!("close failed: {e}"))),
        }
    }
}
