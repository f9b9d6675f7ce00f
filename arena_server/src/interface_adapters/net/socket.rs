// Frame transport over an upgraded axum WebSocket.

use crate::use_cases::{Frame, FrameSink, FrameStream, Transport, TransportError};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use futures_util::stream::{SplitSink, SplitStream};
use std::io::ErrorKind;
use std::time::Duration;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::error::ProtocolError;

// Upper bound on flushing the close frame to a peer that stopped reading.
const CLOSE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct WsFrameSink(SplitSink<WebSocket, Message>);

pub struct WsFrameStream(SplitStream<WebSocket>);

/// Splits the socket so reads and writes can run on separate tasks.
pub fn split_socket(socket: WebSocket) -> Transport {
    let (sink, stream) = socket.split();
    Transport {
        sink: Box::new(WsFrameSink(sink)),
        stream: Box::new(WsFrameStream(stream)),
    }
}

#[async_trait]
impl FrameSink for WsFrameSink {
    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError> {
        let msg = match frame {
            Frame::Text(text) => Message::Text(text.into()),
            Frame::Binary(bytes) => Message::Binary(bytes.into()),
        };
        self.0.send(msg).await.map_err(classify_send_error)
    }

    async fn close(&mut self) {
        let _ = tokio::time::timeout(CLOSE_TIMEOUT, self.0.close()).await;
    }
}

#[async_trait]
impl FrameStream for WsFrameStream {
    async fn recv_frame(&mut self) -> Result<Frame, TransportError> {
        loop {
            match self.0.next().await {
                Some(Ok(Message::Text(text))) => return Ok(Frame::Text(text.as_str().to_owned())),
                Some(Ok(Message::Binary(bytes))) => return Ok(Frame::Binary(bytes.to_vec())),
                // axum answers pings itself.
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                Some(Ok(Message::Close(_))) | None => return Err(TransportError::Closed),
                Some(Err(e)) => return Err(TransportError::Io(e.to_string())),
            }
        }
    }
}

/// Separates "the peer is gone" from failures that may clear up on the next write.
fn classify_send_error(err: axum::Error) -> TransportError {
    let inner = err.into_inner();
    match inner.downcast_ref::<tungstenite::Error>() {
        Some(
            tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::SendAfterClosing),
        ) => TransportError::Closed,
        Some(tungstenite::Error::Io(io)) if peer_hung_up(io.kind()) => TransportError::Closed,
        _ => TransportError::Io(inner.to_string()),
    }
}

fn peer_hung_up(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::BrokenPipe | ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::extract::ws::WebSocketUpgrade;
    use axum::routing::get;
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(5);

    // Reads until the peer is gone, then writes until the socket refuses.
    async fn write_after_peer_left(
        socket: WebSocket,
        errors_tx: mpsc::UnboundedSender<TransportError>,
    ) {
        let mut transport = split_socket(socket);
        while transport.stream.recv_frame().await.is_ok() {}

        for _ in 0..100 {
            if let Err(err) = transport.sink.send_frame(Frame::Text("late".into())).await {
                let _ = errors_tx.send(err);
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    async fn serve() -> (String, mpsc::UnboundedReceiver<TransportError>) {
        let (errors_tx, errors_rx) = mpsc::unbounded_channel();
        let app = Router::new().route(
            "/ws",
            get(move |ws: WebSocketUpgrade| {
                let errors_tx = errors_tx.clone();
                async move {
                    ws.on_upgrade(move |socket| write_after_peer_left(socket, errors_tx))
                }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move { axum::serve(listener, app).await });
        (format!("ws://{addr}/ws"), errors_rx)
    }

    async fn first_write_error(
        errors_rx: &mut mpsc::UnboundedReceiver<TransportError>,
    ) -> TransportError {
        timeout(WAIT, errors_rx.recv())
            .await
            .expect("write error in time")
            .expect("write error")
    }

    #[test]
    fn when_io_error_means_peer_left_then_it_counts_as_hang_up() {
        assert!(peer_hung_up(ErrorKind::BrokenPipe));
        assert!(peer_hung_up(ErrorKind::ConnectionReset));
        assert!(!peer_hung_up(ErrorKind::WouldBlock));
    }

    #[tokio::test]
    async fn when_peer_closes_politely_then_later_writes_report_closed() {
        let (url, mut errors_rx) = serve().await;
        let (mut client, _response) = tokio_tungstenite::connect_async(url)
            .await
            .expect("connect");

        client.close(None).await.expect("close frame sent");
        let err = first_write_error(&mut errors_rx).await;

        assert_eq!(err, TransportError::Closed);
        drop(client);
    }

    #[tokio::test]
    async fn when_peer_drops_the_socket_then_later_writes_report_closed() {
        let (url, mut errors_rx) = serve().await;
        let (client, _response) = tokio_tungstenite::connect_async(url)
            .await
            .expect("connect");

        drop(client);
        let err = first_write_error(&mut errors_rx).await;

        assert_eq!(err, TransportError::Closed);
    }
}
