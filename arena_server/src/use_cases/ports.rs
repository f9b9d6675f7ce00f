// Ports the server loop and connection actors depend on; adapters live in interface_adapters.

use async_trait::async_trait;

use super::errors::{CodecError, TransportError};
use super::types::{EncodedEntities, Snapshot};
use crate::domain::{Entity, PlayerInput};

/// One message-oriented transport frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Vec<u8>),
}

/// Write half of a duplex message transport.
#[async_trait]
pub trait FrameSink: Send + 'static {
    async fn send_frame(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Best-effort close; errors are swallowed because the connection is being dropped.
    async fn close(&mut self);
}

/// Read half of a duplex message transport.
#[async_trait]
pub trait FrameStream: Send + 'static {
    /// Next data frame. Control frames are handled by the adapter.
    async fn recv_frame(&mut self) -> Result<Frame, TransportError>;
}

/// Both halves of an accepted connection.
pub struct Transport {
    pub sink: Box<dyn FrameSink>,
    pub stream: Box<dyn FrameStream>,
}

/// Value <-> frame conversion for one connection direction pair.
pub trait Codec: Send + Sync + 'static {
    type Outbound: Send + 'static;
    type Inbound: Send + 'static;

    fn encode(&self, msg: &Self::Outbound) -> Result<Frame, CodecError>;
    fn decode(&self, frame: Frame) -> Result<Self::Inbound, CodecError>;
}

/// Codec used by the server loop: snapshots out, inputs in, with the shared entity
/// list encoded once per tick.
pub trait SnapshotCodec: Codec<Outbound = Snapshot, Inbound = PlayerInput> {
    fn encode_entities(&self, entities: &[Entity]) -> Result<EncodedEntities, CodecError>;
}
