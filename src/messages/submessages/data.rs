use enumflags2::{bitflags, BitFlags};
use speedy::{Endianness, Readable, Writable};

use crate::error::RtpsError;
use crate::messages::submessages::parameter_list::ParameterList;
use crate::messages::submessages::serialized_payload::SerializedPayload;
use crate::structure::guid::EntityId;
use crate::structure::parameter_id::ParameterId;
use crate::structure::sequence_number::SequenceNumber;

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DataFlags {
  Endianness = 0b0001,
  InlineQos = 0b0010,
  Data = 0b0100,
  Key = 0b1000,
}

/// DATA submessage body: identifies the writer, carries its sequence
/// number, and optionally inline QoS plus a payload or key hash.
#[derive(Clone, Debug)]
pub struct Data {
  pub reader_id: EntityId,
  pub writer_id: EntityId,
  pub writer_sn: SequenceNumber,
  pub inline_qos: Option<ParameterList>,
  pub serialized_payload: Option<SerializedPayload>,
}

const OCTETS_TO_INLINE_QOS: u16 = 16;

impl Data {
  pub fn flags(&self) -> BitFlags<DataFlags> {
    let mut flags = BitFlags::empty();
    if self.inline_qos.is_some() {
      flags |= DataFlags::InlineQos;
    }
    match &self.serialized_payload {
      Some(payload) if payload.representation_identifier.is_parameter_list() => flags |= DataFlags::Key,
      Some(_) => flags |= DataFlags::Data,
      // No payload at all: a dispose/unregister notice carries the instance's
      // key hash in inline QoS instead of a full serialized sample.
      None if self.carries_key_hash() => flags |= DataFlags::Key,
      None => {}
    }
    flags
  }

  fn carries_key_hash(&self) -> bool {
    self
      .inline_qos
      .as_ref()
      .and_then(|qos| qos.get(ParameterId::PID_KEY_HASH))
      .is_some()
  }

  pub fn parse(bytes: &[u8], flags: BitFlags<DataFlags>, endianness: Endianness) -> Result<Data, RtpsError> {
    if bytes.len() < 20 {
      return Err(RtpsError::BufferUnderflow);
    }
    // extra_flags(2) + octets_to_inline_qos(2) are fixed at 16 for the core.
    let reader_id = EntityId::read_from_buffer_with_ctx(endianness, &bytes[4..8])
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;
    let writer_id = EntityId::read_from_buffer_with_ctx(endianness, &bytes[8..12])
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;
    let writer_sn = SequenceNumber::read_from_buffer_with_ctx(endianness, &bytes[12..20])
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;

    let mut rest = &bytes[20..];
    let inline_qos = if flags.contains(DataFlags::InlineQos) {
      let (list, consumed) = ParameterList::read_with_consumed(rest, endianness)
        .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;
      rest = &rest[consumed..];
      Some(list)
    } else {
      None
    };

    let serialized_payload = if flags.contains(DataFlags::Data) || flags.contains(DataFlags::Key) {
      Some(SerializedPayload::from_bytes(rest)?)
    } else {
      None
    };

    Ok(Data {
      reader_id,
      writer_id,
      writer_sn,
      inline_qos,
      serialized_payload,
    })
  }

  pub fn write_to_vec(&self, endianness: Endianness) -> Result<Vec<u8>, RtpsError> {
    let mut out = Vec::new();
    out.extend_from_slice(&0u16.to_le_bytes()); // extra_flags
    out.extend_from_slice(&OCTETS_TO_INLINE_QOS.to_le_bytes());
    out.extend_from_slice(
      &self
        .reader_id
        .write_to_vec_with_ctx(endianness)
        .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?,
    );
    out.extend_from_slice(
      &self
        .writer_id
        .write_to_vec_with_ctx(endianness)
        .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?,
    );
    out.extend_from_slice(
      &self
        .writer_sn
        .write_to_vec_with_ctx(endianness)
        .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?,
    );
    if let Some(qos) = &self.inline_qos {
      out.extend_from_slice(
        &qos
          .write_to_vec_with_ctx(endianness)
          .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?,
      );
    }
    if let Some(payload) = &self.serialized_payload {
      out.extend_from_slice(&payload.write_to_vec());
    }
    Ok(out)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::messages::submessages::representation_identifier::RepresentationIdentifier;
  use crate::structure::guid::EntityKind;

  #[test]
  fn roundtrip_with_payload_only() {
    let data = Data {
      reader_id: EntityId::UNKNOWN,
      writer_id: EntityId::new([0, 0, 2], EntityKind::WriterWithKeyUserDefined),
      writer_sn: SequenceNumber::from(1),
      inline_qos: None,
      serialized_payload: Some(SerializedPayload::new(RepresentationIdentifier::CdrLe, b"A".to_vec())),
    };
    let bytes = data.write_to_vec(Endianness::LittleEndian).unwrap();
    let back = Data::parse(&bytes, data.flags(), Endianness::LittleEndian).unwrap();
    assert_eq!(back.writer_sn, data.writer_sn);
    assert_eq!(back.serialized_payload.unwrap().data, b"A".to_vec());
  }

  #[test]
  fn too_short_is_buffer_underflow() {
    assert!(matches!(
      Data::parse(&[0u8; 10], BitFlags::empty(), Endianness::LittleEndian),
      Err(RtpsError::BufferUnderflow)
    ));
  }
}
