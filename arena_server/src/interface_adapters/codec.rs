// JSON codec for the WebSocket text protocol.

use crate::domain::{Entity, PlayerInput};
use crate::interface_adapters::protocol::{EntityStateDto, PlayerInputDto, SnapshotDto};
use crate::use_cases::{Codec, CodecError, EncodedEntities, Frame, Snapshot, SnapshotCodec};
use std::sync::Arc;

/// Snapshots go out as `{"players":[...],"yourid":N}`; inputs come in as
/// `{"l":..,"r":..,"u":..,"d":..}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    type Outbound = Snapshot;
    type Inbound = PlayerInput;

    fn encode(&self, msg: &Snapshot) -> Result<Frame, CodecError> {
        // The entity list is already JSON; only the envelope is produced per recipient.
        let dto = SnapshotDto {
            players: &msg.entities,
            yourid: msg.your_id,
        };
        serde_json::to_string(&dto)
            .map(Frame::Text)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, frame: Frame) -> Result<PlayerInput, CodecError> {
        match frame {
            Frame::Text(text) => serde_json::from_str::<PlayerInputDto>(&text)
                .map(PlayerInput::from)
                .map_err(|e| CodecError::Decode(e.to_string())),
            Frame::Binary(_) => Err(CodecError::UnsupportedFrame),
        }
    }
}

impl SnapshotCodec for JsonCodec {
    fn encode_entities(&self, entities: &[Entity]) -> Result<EncodedEntities, CodecError> {
        let dtos: Vec<EntityStateDto> = entities.iter().map(EntityStateDto::from).collect();
        serde_json::value::to_raw_value(&dtos)
            .map(Arc::from)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }
}
