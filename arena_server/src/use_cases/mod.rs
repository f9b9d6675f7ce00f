// Use cases layer: application workflows for the arena server.

pub mod connection;
pub mod errors;
pub mod game;
pub mod ports;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use errors::{CodecError, ConnectionError, TransportError};
pub use game::{GameServer, ServerHandle, ServerSettings, spawn_server};
pub use ports::{Codec, Frame, FrameSink, FrameStream, SnapshotCodec, Transport};
pub use types::{EncodedEntities, ServerEvent, ServerStats, Snapshot};
