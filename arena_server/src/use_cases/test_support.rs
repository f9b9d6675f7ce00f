// In-memory transport and codec doubles for driving connection actors and the server
// loop without sockets.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::{mpsc, watch};

use super::errors::{CodecError, TransportError};
use super::ports::{Codec, Frame, FrameSink, FrameStream, Transport};

type WriteFailures = Arc<Mutex<VecDeque<TransportError>>>;

struct MemorySink {
    written_tx: mpsc::UnboundedSender<Frame>,
    closed_tx: watch::Sender<bool>,
    write_failures: WriteFailures,
    stall_writes: bool,
}

#[async_trait]
impl FrameSink for MemorySink {
    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        if self.stall_writes {
            std::future::pending::<()>().await;
        }
        let scripted = self
            .write_failures
            .lock()
            .expect("write failures mutex poisoned")
            .pop_front();
        if let Some(err) = scripted {
            return Err(err);
        }
        self.written_tx
            .send(frame)
            .map_err(|_| TransportError::Closed)
    }

    async fn close(&mut self) {
        self.closed_tx.send_replace(true);
    }
}

struct MemoryStream {
    inbound_rx: mpsc::UnboundedReceiver<Result<Frame, TransportError>>,
}

#[async_trait]
impl FrameStream for MemoryStream {
    async fn recv_frame(&mut self) -> Result<Frame, TransportError> {
        // A dropped remote end looks like the peer hanging up.
        self.inbound_rx
            .recv()
            .await
            .unwrap_or(Err(TransportError::Closed))
    }
}

/// The test's side of an in-memory connection.
pub(crate) struct RemoteEnd {
    /// Frames the connection wrote, in order.
    pub written: mpsc::UnboundedReceiver<Frame>,
    inbound_tx: mpsc::UnboundedSender<Result<Frame, TransportError>>,
    closed_rx: watch::Receiver<bool>,
    write_failures: WriteFailures,
}

impl RemoteEnd {
    pub(crate) fn push(&self, frame: Result<Frame, TransportError>) {
        let _ = self.inbound_tx.send(frame);
    }

    pub(crate) fn push_text(&self, text: &str) {
        self.push(Ok(Frame::Text(text.to_string())));
    }

    /// The next write fails with `err` instead of being delivered.
    pub(crate) fn fail_next_write(&self, err: TransportError) {
        self.write_failures
            .lock()
            .expect("write failures mutex poisoned")
            .push_back(err);
    }

    pub(crate) fn is_closed(&self) -> bool {
        *self.closed_rx.borrow()
    }

    pub(crate) async fn wait_closed(&self) {
        let mut closed_rx = self.closed_rx.clone();
        let _ = closed_rx.wait_for(|closed| *closed).await;
    }

    /// Drops the inbound side so the next read reports `Closed`.
    pub(crate) fn hang_up(self) -> mpsc::UnboundedReceiver<Frame> {
        self.written
    }
}

fn build_transport(stall_writes: bool) -> (Transport, RemoteEnd) {
    let (written_tx, written) = mpsc::unbounded_channel();
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
    let (closed_tx, closed_rx) = watch::channel(false);
    let write_failures = WriteFailures::default();

    let transport = Transport {
        sink: Box::new(MemorySink {
            written_tx,
            closed_tx,
            write_failures: write_failures.clone(),
            stall_writes,
        }),
        stream: Box::new(MemoryStream { inbound_rx }),
    };
    let remote = RemoteEnd {
        written,
        inbound_tx,
        closed_rx,
        write_failures,
    };
    (transport, remote)
}

pub(crate) fn memory_transport() -> (Transport, RemoteEnd) {
    build_transport(false)
}

/// A transport whose writes never complete, like a client that stopped reading.
pub(crate) fn stalled_transport() -> (Transport, RemoteEnd) {
    build_transport(true)
}

/// Plain-text codec for actor tests. Frames starting with `!` fail to decode.
pub(crate) struct LineCodec;

impl LineCodec {
    pub(crate) const UNENCODABLE: &'static str = "<unencodable>";
}

impl Codec for LineCodec {
    type Outbound = String;
    type Inbound = String;

    fn encode(&self, msg: &String) -> Result<Frame, CodecError> {
        if msg == Self::UNENCODABLE {
            return Err(CodecError::Encode("refusing test value".to_string()));
        }
        Ok(Frame::Text(msg.clone()))
    }

    fn decode(&self, frame: Frame) -> Result<String, CodecError> {
        match frame {
            Frame::Text(text) if text.starts_with('!') => Err(CodecError::Decode(text)),
            Frame::Text(text) => Ok(text),
            Frame::Binary(_) => Err(CodecError::UnsupportedFrame),
        }
    }
}
