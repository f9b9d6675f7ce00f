use thiserror::Error;

/// Failures reported by a transport adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The peer is gone; nothing more can be read or written.
    #[error("connection closed")]
    Closed,
    #[error("transport i/o failure: {0}")]
    Io(String),
}

impl TransportError {
    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::Closed)
    }
}

/// Failures turning values into frames and back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("failed to decode frame: {0}")]
    Decode(String),
    #[error("failed to encode message: {0}")]
    Encode(String),
    #[error("unsupported frame type")]
    UnsupportedFrame,
}

/// Everything a connection actor can report on its error source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectionError {
    #[error("read failed: {0}")]
    Read(TransportError),
    #[error("write failed: {0}")]
    Write(TransportError),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

impl ConnectionError {
    /// Read failures always end the connection; write failures only when the peer is
    /// gone; codec failures never do.
    pub fn is_fatal(&self) -> bool {
        match self {
            ConnectionError::Read(_) => true,
            ConnectionError::Write(err) => err.is_closed(),
            ConnectionError::Codec(_) => false,
        }
    }
}
