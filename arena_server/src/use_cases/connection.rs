// Per-connection actor: bridges one duplex transport to bounded typed queues.
//
// Two independent tasks run per connection. The outbound task drains the send queue,
// encodes and writes. The inbound task reads, decodes and fills the receive queue.
// Both report failures on a shared error queue. Neither knows anything about the game.

use super::errors::ConnectionError;
use super::ports::{Codec, FrameSink, FrameStream, Transport};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tracing::debug;

/// Outbound half handed to whoever produces messages for this connection.
pub struct ConnectionSender<T> {
    send_tx: mpsc::Sender<T>,
    close_tx: Arc<watch::Sender<bool>>,
}

impl<T> Clone for ConnectionSender<T> {
    fn clone(&self) -> Self {
        Self {
            send_tx: self.send_tx.clone(),
            close_tx: self.close_tx.clone(),
        }
    }
}

impl<T> ConnectionSender<T> {
    /// Queues a message, waiting while the queue is full.
    pub async fn send(&self, msg: T) -> Result<(), mpsc::error::SendError<T>> {
        self.send_tx.send(msg).await
    }

    /// Queues a message without waiting; hands it back when the queue is full or closed.
    pub fn try_send(&self, msg: T) -> Result<(), TrySendError<T>> {
        self.send_tx.try_send(msg)
    }

    /// Asks both loops to stop and the transport to close. Idempotent.
    pub fn close(&self) {
        self.close_tx.send_replace(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.close_tx.borrow() || self.send_tx.is_closed()
    }
}

/// Something that came out of a connection.
#[derive(Debug, PartialEq)]
pub enum ConnectionEvent<T> {
    Message(T),
    Error(ConnectionError),
}

/// Inbound half: decoded values plus reported failures.
pub struct ConnectionReceiver<T> {
    recv_rx: mpsc::Receiver<T>,
    error_rx: mpsc::Receiver<ConnectionError>,
}

impl<T> ConnectionReceiver<T> {
    /// Next decoded value; `None` once the inbound loop has stopped.
    pub async fn receive(&mut self) -> Option<T> {
        self.recv_rx.recv().await
    }

    /// Next reported failure; `None` once both loops have stopped.
    pub async fn next_error(&mut self) -> Option<ConnectionError> {
        self.error_rx.recv().await
    }

    /// Whichever of the two sources is ready first; `None` once both are exhausted.
    pub async fn next_event(&mut self) -> Option<ConnectionEvent<T>> {
        tokio::select! {
            Some(msg) = self.recv_rx.recv() => Some(ConnectionEvent::Message(msg)),
            Some(err) = self.error_rx.recv() => Some(ConnectionEvent::Error(err)),
            else => None,
        }
    }
}

/// Starts the inbound and outbound loops for `transport`. Every queue holds at most
/// `capacity` entries.
pub fn spawn_connection<C: Codec>(
    transport: Transport,
    codec: Arc<C>,
    capacity: usize,
) -> (ConnectionSender<C::Outbound>, ConnectionReceiver<C::Inbound>) {
    let (send_tx, send_rx) = mpsc::channel(capacity);
    let (recv_tx, recv_rx) = mpsc::channel(capacity);
    let (error_tx, error_rx) = mpsc::channel(capacity);
    let (close_tx, close_rx) = watch::channel(false);

    tokio::spawn(outbound_loop(
        transport.sink,
        codec.clone(),
        send_rx,
        error_tx.clone(),
        close_rx.clone(),
    ));
    tokio::spawn(inbound_loop(
        transport.stream,
        codec,
        recv_tx,
        error_tx,
        close_rx,
    ));

    (
        ConnectionSender {
            send_tx,
            close_tx: Arc::new(close_tx),
        },
        ConnectionReceiver { recv_rx, error_rx },
    )
}

async fn wait_for_close(close_rx: &mut watch::Receiver<bool>) {
    // A dropped sender also means nobody will ever use this connection again.
    let _ = close_rx.wait_for(|closed| *closed).await;
}

async fn report(error_tx: &mpsc::Sender<ConnectionError>, err: ConnectionError) {
    // The receiver may already be gone during teardown; nothing left to tell.
    let _ = error_tx.send(err).await;
}

async fn outbound_loop<C: Codec>(
    mut sink: Box<dyn FrameSink>,
    codec: Arc<C>,
    mut send_rx: mpsc::Receiver<C::Outbound>,
    error_tx: mpsc::Sender<ConnectionError>,
    mut close_rx: watch::Receiver<bool>,
) {
    loop {
        let msg = tokio::select! {
            msg = send_rx.recv() => match msg {
                Some(msg) => msg,
                None => break,
            },
            _ = wait_for_close(&mut close_rx) => break,
        };

        let frame = match codec.encode(&msg) {
            Ok(frame) => frame,
            Err(err) => {
                report(&error_tx, err.into()).await;
                continue;
            }
        };

        // A stalled peer must not keep a closed connection's task alive.
        let sent = tokio::select! {
            sent = sink.send_frame(frame) => sent,
            _ = wait_for_close(&mut close_rx) => break,
        };
        if let Err(err) = sent {
            let peer_gone = err.is_closed();
            report(&error_tx, ConnectionError::Write(err)).await;
            if peer_gone {
                break;
            }
        }
    }

    sink.close().await;
    debug!("outbound loop stopped");
}

async fn inbound_loop<C: Codec>(
    mut stream: Box<dyn FrameStream>,
    codec: Arc<C>,
    recv_tx: mpsc::Sender<C::Inbound>,
    error_tx: mpsc::Sender<ConnectionError>,
    mut close_rx: watch::Receiver<bool>,
) {
    loop {
        let frame = tokio::select! {
            frame = stream.recv_frame() => frame,
            _ = wait_for_close(&mut close_rx) => break,
        };

        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                report(&error_tx, ConnectionError::Read(err)).await;
                break;
            }
        };

        match codec.decode(frame) {
            Ok(value) => {
                if recv_tx.send(value).await.is_err() {
                    break;
                }
            }
            Err(err) => report(&error_tx, err.into()).await,
        }
    }

    debug!("inbound loop stopped");
}
