use crate::error::RtpsError;
use crate::messages::submessages::representation_identifier::RepresentationIdentifier;

/// Opaque application payload: an encapsulation tag, two reserved option
/// bytes, and the data bytes themselves. The core never interprets `data`;
/// (de)serialization of user types is a collaborator's concern.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct SerializedPayload {
  pub representation_identifier: RepresentationIdentifier,
  pub representation_options: u16,
  pub data: Vec<u8>,
}

impl SerializedPayload {
  pub fn new(representation_identifier: RepresentationIdentifier, data: Vec<u8>) -> SerializedPayload {
    SerializedPayload {
      representation_identifier,
      representation_options: 0,
      data,
    }
  }

  /// Parses a 4-byte header (representation id, always big-endian, plus
  /// two reserved option bytes) followed by the raw payload bytes.
  pub fn from_bytes(bytes: &[u8]) -> Result<SerializedPayload, RtpsError> {
    if bytes.len() < 4 {
      return Err(RtpsError::BufferUnderflow);
    }
    let representation_identifier = RepresentationIdentifier::from_bytes([bytes[0], bytes[1]])
      .ok_or_else(|| RtpsError::InvalidMessage(format!("unknown representation id {:?}", &bytes[0..2])))?;
    let representation_options = u16::from_be_bytes([bytes[2], bytes[3]]);
    Ok(SerializedPayload {
      representation_identifier,
      representation_options,
      data: bytes[4..].to_vec(),
    })
  }

  pub fn write_to_vec(&self) -> Vec<u8> {
    let mut out = Vec::with_capacity(4 + self.data.len());
    out.extend_from_slice(&self.representation_identifier.to_bytes());
    out.extend_from_slice(&self.representation_options.to_be_bytes());
    out.extend_from_slice(&self.data);
    out
  }

  pub fn len(&self) -> usize {
    4 + self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }
}
