use speedy::Endianness;

/// Submessage kind byte (RTPS spec table 8.13).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SubmessageKind {
  Pad,
  AckNack,
  Heartbeat,
  Gap,
  InfoTs,
  InfoSrc,
  InfoDst,
  Data,
  Unknown(u8),
}

impl SubmessageKind {
  pub fn from_id(id: u8) -> SubmessageKind {
    match id {
      0x01 => SubmessageKind::Pad,
      0x06 => SubmessageKind::AckNack,
      0x07 => SubmessageKind::Heartbeat,
      0x08 => SubmessageKind::Gap,
      0x09 => SubmessageKind::InfoTs,
      0x0C => SubmessageKind::InfoSrc,
      0x0E => SubmessageKind::InfoDst,
      0x15 => SubmessageKind::Data,
      other => SubmessageKind::Unknown(other),
    }
  }

  pub fn id(self) -> u8 {
    match self {
      SubmessageKind::Pad => 0x01,
      SubmessageKind::AckNack => 0x06,
      SubmessageKind::Heartbeat => 0x07,
      SubmessageKind::Gap => 0x08,
      SubmessageKind::InfoTs => 0x09,
      SubmessageKind::InfoSrc => 0x0C,
      SubmessageKind::InfoDst => 0x0E,
      SubmessageKind::Data => 0x15,
      SubmessageKind::Unknown(id) => id,
    }
  }
}

/// (id, flags, content_length). Bit 0 of `flags` selects the endianness used
/// to decode everything following this header, up to `content_length` bytes
/// (or the rest of the datagram when `content_length == 0` on the last
/// submessage).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SubmessageHeader {
  pub kind: SubmessageKind,
  pub flags: u8,
  pub content_length: u16,
}

impl SubmessageHeader {
  pub const WIRE_SIZE: usize = 4;

  pub fn endianness(&self) -> Endianness {
    if self.flags & 0x01 == 1 {
      Endianness::LittleEndian
    } else {
      Endianness::BigEndian
    }
  }

  pub fn flag(&self, bit: u8) -> bool {
    self.flags & (1 << bit) != 0
  }

  pub fn parse(bytes: &[u8]) -> Option<(SubmessageHeader, &[u8])> {
    if bytes.len() < Self::WIRE_SIZE {
      return None;
    }
    let kind = SubmessageKind::from_id(bytes[0]);
    let flags = bytes[1];
    let endianness = if flags & 0x01 == 1 {
      Endianness::LittleEndian
    } else {
      Endianness::BigEndian
    };
    let content_length = match endianness {
      Endianness::LittleEndian => u16::from_le_bytes([bytes[2], bytes[3]]),
      Endianness::BigEndian => u16::from_be_bytes([bytes[2], bytes[3]]),
    };
    Some((
      SubmessageHeader {
        kind,
        flags,
        content_length,
      },
      &bytes[Self::WIRE_SIZE..],
    ))
  }

  pub fn write_to_vec(&self, out: &mut Vec<u8>) {
    out.push(self.kind.id());
    out.push(self.flags);
    match self.endianness() {
      Endianness::LittleEndian => out.extend_from_slice(&self.content_length.to_le_bytes()),
      Endianness::BigEndian => out.extend_from_slice(&self.content_length.to_be_bytes()),
    }
  }
}
