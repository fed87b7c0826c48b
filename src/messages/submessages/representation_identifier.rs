use speedy::{Context, Endianness};

/// Identifies the data representation of a `SerializedPayload`. Encoded
/// as a 2-byte value that is always read/written big-endian, independent of
/// the enclosing submessage's endian flag (spec.md §4.1's "addDataReversed").
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum RepresentationIdentifier {
  CdrBe,
  CdrLe,
  PlCdrBe,
  PlCdrLe,
}

impl RepresentationIdentifier {
  pub fn from_bytes(bytes: [u8; 2]) -> Option<RepresentationIdentifier> {
    match bytes {
      [0x00, 0x00] => Some(RepresentationIdentifier::CdrBe),
      [0x00, 0x01] => Some(RepresentationIdentifier::CdrLe),
      [0x00, 0x02] => Some(RepresentationIdentifier::PlCdrBe),
      [0x00, 0x03] => Some(RepresentationIdentifier::PlCdrLe),
      _ => None,
    }
  }

  pub fn to_bytes(self) -> [u8; 2] {
    match self {
      RepresentationIdentifier::CdrBe => [0x00, 0x00],
      RepresentationIdentifier::CdrLe => [0x00, 0x01],
      RepresentationIdentifier::PlCdrBe => [0x00, 0x02],
      RepresentationIdentifier::PlCdrLe => [0x00, 0x03],
    }
  }

  pub fn is_parameter_list(&self) -> bool {
    matches!(
      self,
      RepresentationIdentifier::PlCdrBe | RepresentationIdentifier::PlCdrLe
    )
  }
}

impl Default for RepresentationIdentifier {
  fn default() -> RepresentationIdentifier {
    RepresentationIdentifier::CdrLe
  }
}

impl Context for RepresentationIdentifier {
  type Error = speedy::Error;

  fn endianness(&self) -> Endianness {
    match self {
      RepresentationIdentifier::CdrBe | RepresentationIdentifier::PlCdrBe => Endianness::BigEndian,
      RepresentationIdentifier::CdrLe | RepresentationIdentifier::PlCdrLe => Endianness::LittleEndian,
    }
  }
}
