//! Scripted transport for unit and integration tests.
//!
//! # Why a scripted socket?
//!
//! A real Pixelblaze is not available in CI, and a real socket cannot be told
//! to "go silent" or "drop the connection now" on cue.  [`ScriptedSocket`]
//! replays a fixed list of incoming frames and records everything written to
//! it, so tests can assert on the exact command text sent to the device.
//!
//! When the script runs out, `recv` never completes.  This is how tests
//! simulate a device that does not answer (the read timeout then fires).
//!
//! # Usage in tests
//!
//! ```ignore
//! let connector = Arc::new(ScriptedConnector::new([
//!     ScriptedSocket::new().frame(RawFrame::Binary(b"\x07\x04a\tFire".to_vec())),
//! ]));
//! let mut client = PixelblazeClient::new(&config, connector.clone());
//!
//! client.list_patterns().await.unwrap();
//! assert_eq!(connector.sent_texts(), [r#"{"listPrograms": true}"#]);
//! ```

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pixelblaze_core::RawFrame;

use crate::application::transport::{Connector, Socket};
use crate::domain::error::ClientError;

/// One scripted event delivered by [`ScriptedSocket::recv`].
#[derive(Debug, Clone)]
enum Incoming {
    Frame(RawFrame),
    Closed,
}

/// Shared record of what the client did to its sockets.
#[derive(Debug, Default)]
struct SocketLog {
    sent: Mutex<Vec<RawFrame>>,
    closes: AtomicUsize,
}

/// A socket that replays scripted frames and records writes.
pub struct ScriptedSocket {
    incoming: VecDeque<Incoming>,
    open: Arc<AtomicBool>,
    log: Arc<SocketLog>,
    fail_send: bool,
    fail_close: bool,
}

impl Default for ScriptedSocket {
    fn default() -> Self {
        Self {
            incoming: VecDeque::new(),
            open: Arc::new(AtomicBool::new(true)),
            log: Arc::new(SocketLog::default()),
            fail_send: false,
            fail_close: false,
        }
    }
}

impl ScriptedSocket {
    /// Creates an open socket with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a frame to the script.
    pub fn frame(mut self, frame: RawFrame) -> Self {
        self.incoming.push_back(Incoming::Frame(frame));
        self
    }

    /// Appends a program-list frame (`0x07` tag) with the given flags byte.
    pub fn program_frame(self, flags: u8, text: &str) -> Self {
        let mut bytes = vec![0x07, flags];
        bytes.extend_from_slice(text.as_bytes());
        self.frame(RawFrame::Binary(bytes))
    }

    /// Appends a remote close: `recv` fails and the socket reports closed.
    pub fn then_close(mut self) -> Self {
        self.incoming.push_back(Incoming::Closed);
        self
    }

    /// Makes every `send` fail as if the transport rejected the write.
    pub fn failing_send(mut self) -> Self {
        self.fail_send = true;
        self
    }

    /// Makes `close` fail.
    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    /// Handle that lets a test flip the socket to "closed" at any time.
    pub fn open_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.open)
    }
}

#[async_trait]
impl Socket for ScriptedSocket {
    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    async fn send(&mut self, frame: RawFrame) -> Result<(), ClientError> {
        if self.fail_send || !self.is_open() {
            return Err(ClientError::Connection("scripted send failure".to_string()));
        }
        self.log
            .sent
            .lock()
            .map_err(|_| ClientError::Connection("socket log poisoned".to_string()))?
            .push(frame);
        Ok(())
    }

    async fn recv(&mut self) -> Result<RawFrame, ClientError> {
        if !self.is_open() {
            return Err(ClientError::Connection("socket is closed".to_string()));
        }
        match self.incoming.pop_front() {
            Some(Incoming::Frame(frame)) => Ok(frame),
            Some(Incoming::Closed) => {
                self.open.store(false, Ordering::SeqCst);
                Err(ClientError::Connection(
                    "device closed the connection".to_string(),
                ))
            }
            // A silent device: never answer.
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) -> Result<(), ClientError> {
        self.log.closes.fetch_add(1, Ordering::SeqCst);
        self.open.store(false, Ordering::SeqCst);
        if self.fail_close {
            return Err(ClientError::Connection("scripted close failure".to_string()));
        }
        Ok(())
    }
}

/// Hands out pre-built [`ScriptedSocket`]s in order, one per connect.
///
/// Once the queue is empty every further connect is refused.
pub struct ScriptedConnector {
    sockets: Mutex<VecDeque<ScriptedSocket>>,
    connects: AtomicUsize,
    log: Arc<SocketLog>,
}

impl ScriptedConnector {
    /// Creates a connector that will return `sockets` in order.
    ///
    /// All sockets share one write log, so [`ScriptedConnector::sent_texts`]
    /// shows every frame sent across reconnects.
    pub fn new(sockets: impl IntoIterator<Item = ScriptedSocket>) -> Self {
        let log = Arc::new(SocketLog::default());
        let sockets = sockets
            .into_iter()
            .map(|mut s| {
                s.log = Arc::clone(&log);
                s
            })
            .collect();
        Self {
            sockets: Mutex::new(sockets),
            connects: AtomicUsize::new(0),
            log,
        }
    }

    /// Number of connect attempts so far (successful or refused).
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Number of `close` calls across all sockets.
    pub fn close_count(&self) -> usize {
        self.log.closes.load(Ordering::SeqCst)
    }

    /// Text of every text frame sent, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.log
            .sent
            .lock()
            .map(|sent| {
                sent.iter()
                    .filter_map(|f| match f {
                        RawFrame::Text(t) => Some(t.clone()),
                        RawFrame::Binary(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Socket>, ClientError> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        let next = self
            .sockets
            .lock()
            .map_err(|_| ClientError::Connection("connector poisoned".to_string()))?
            .pop_front();
        match next {
            Some(socket) => Ok(Box::new(socket)),
            None => Err(ClientError::Connection(format!(
                "connection to {url} refused"
            ))),
        }
    }
}
