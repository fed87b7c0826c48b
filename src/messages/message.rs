use enumflags2::BitFlags;
use speedy::{Readable, Writable};

use crate::error::RtpsError;
use crate::messages::header::Header;
use crate::messages::submessage::{SubmessageHeader, SubmessageKind};
use crate::messages::submessages::acknack::AckNack;
use crate::messages::submessages::data::{Data, DataFlags};
use crate::messages::submessages::gap::Gap;
use crate::messages::submessages::heartbeat::Heartbeat;
use crate::messages::submessages::info_dst::InfoDst;
use crate::messages::submessages::info_src::InfoSrc;
use crate::messages::submessages::info_ts::InfoTs;

/// A single parsed submessage body. `Pad` and unrecognized kinds carry no
/// data; they exist so the receiver can skip over them uniformly.
#[derive(Clone, Debug)]
pub enum SubmessageBody {
  Data(Data),
  Gap(Gap),
  Heartbeat(Heartbeat),
  AckNack(AckNack),
  InfoTs(InfoTs),
  InfoDst(InfoDst),
  InfoSrc(InfoSrc),
  Pad,
  Unknown(u8),
}

#[derive(Clone, Debug)]
pub struct Submessage {
  pub header: SubmessageHeader,
  pub body: SubmessageBody,
}

/// A full RTPS message: the 20-byte header plus the submessages that
/// followed it in the datagram.
#[derive(Clone, Debug)]
pub struct Message {
  pub header: Header,
  pub submessages: Vec<Submessage>,
}

impl Message {
  pub fn read_from_buffer(bytes: &[u8]) -> Result<Message, RtpsError> {
    if bytes.len() < 20 {
      return Err(RtpsError::BufferUnderflow);
    }
    // The RTPS message header's own endianness does not matter for its
    // fixed-layout fields; big-endian is as good as any to read the magic.
    let header = Header::read_from_buffer_with_ctx(speedy::Endianness::BigEndian, &bytes[0..20])
      .map_err(|e| RtpsError::InvalidMessage(e.to_string()))?;

    let mut submessages = Vec::new();
    let mut rest = &bytes[20..];
    while !rest.is_empty() {
      let (sub_header, body_and_tail) = SubmessageHeader::parse(rest)
        .ok_or(RtpsError::SubmessageMalformed("truncated submessage header".into()))?;
      let content_length = if sub_header.content_length == 0 {
        body_and_tail.len()
      } else {
        sub_header.content_length as usize
      };
      if body_and_tail.len() < content_length {
        return Err(RtpsError::BufferUnderflow);
      }
      let body_bytes = &body_and_tail[..content_length];
      let body = parse_body(&sub_header, body_bytes)?;
      submessages.push(Submessage { header: sub_header, body });
      rest = &body_and_tail[content_length..];
    }

    Ok(Message { header, submessages })
  }

  pub fn write_to_vec(&self) -> Result<Vec<u8>, RtpsError> {
    let mut out = self
      .header
      .write_to_vec_with_ctx(speedy::Endianness::BigEndian)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;
    for submessage in &self.submessages {
      let endianness = submessage.header.endianness();
      let body_bytes = write_body(&submessage.body, endianness)?;
      let mut header = submessage.header;
      header.content_length = body_bytes.len() as u16;
      header.write_to_vec(&mut out);
      out.extend_from_slice(&body_bytes);
    }
    Ok(out)
  }
}

fn parse_body(header: &SubmessageHeader, bytes: &[u8]) -> Result<SubmessageBody, RtpsError> {
  let endianness = header.endianness();
  match header.kind {
    SubmessageKind::Pad => Ok(SubmessageBody::Pad),
    SubmessageKind::Data => {
      let mut flags = BitFlags::<DataFlags>::empty();
      if header.flag(1) {
        flags |= DataFlags::InlineQos;
      }
      if header.flag(2) {
        flags |= DataFlags::Data;
      }
      if header.flag(3) {
        flags |= DataFlags::Key;
      }
      Ok(SubmessageBody::Data(Data::parse(bytes, flags, endianness)?))
    }
    SubmessageKind::Gap => Gap::read_from_buffer_with_ctx(endianness, bytes)
      .map(SubmessageBody::Gap)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageKind::Heartbeat => Heartbeat::read_from_buffer_with_ctx(endianness, bytes)
      .map(SubmessageBody::Heartbeat)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageKind::AckNack => AckNack::read_from_buffer_with_ctx(endianness, bytes)
      .map(SubmessageBody::AckNack)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageKind::InfoTs => {
      let invalidate = header.flag(1);
      Ok(SubmessageBody::InfoTs(InfoTs::parse(bytes, invalidate, endianness)?))
    }
    SubmessageKind::InfoDst => InfoDst::read_from_buffer_with_ctx(endianness, bytes)
      .map(SubmessageBody::InfoDst)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageKind::InfoSrc => InfoSrc::read_from_buffer_with_ctx(endianness, bytes)
      .map(SubmessageBody::InfoSrc)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageKind::Unknown(id) => Ok(SubmessageBody::Unknown(id)),
  }
}

fn write_body(body: &SubmessageBody, endianness: speedy::Endianness) -> Result<Vec<u8>, RtpsError> {
  match body {
    SubmessageBody::Data(d) => d.write_to_vec(endianness),
    SubmessageBody::Gap(g) => g
      .write_to_vec_with_ctx(endianness)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageBody::Heartbeat(h) => h
      .write_to_vec_with_ctx(endianness)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageBody::AckNack(a) => a
      .write_to_vec_with_ctx(endianness)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageBody::InfoTs(t) => t.write_to_vec(endianness),
    SubmessageBody::InfoDst(d) => d
      .write_to_vec_with_ctx(endianness)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageBody::InfoSrc(s) => s
      .write_to_vec_with_ctx(endianness)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
    SubmessageBody::Pad | SubmessageBody::Unknown(_) => Ok(Vec::new()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::structure::guid::{EntityId, GuidPrefix};
  use crate::structure::sequence_number::SequenceNumber;

  #[test]
  fn roundtrip_single_heartbeat() {
    let header = Header::new(GuidPrefix::new(&[1; 12]));
    let submessage = Submessage {
      header: SubmessageHeader {
        kind: SubmessageKind::Heartbeat,
        flags: 0x01,
        content_length: 0,
      },
      body: SubmessageBody::Heartbeat(Heartbeat {
        reader_id: EntityId::UNKNOWN,
        writer_id: EntityId::UNKNOWN,
        first_sn: SequenceNumber::from(1),
        last_sn: SequenceNumber::from(1),
        count: 1,
      }),
    };
    let message = Message {
      header,
      submessages: vec![submessage],
    };
    let bytes = message.write_to_vec().unwrap();
    let back = Message::read_from_buffer(&bytes).unwrap();
    assert_eq!(back.submessages.len(), 1);
    assert!(matches!(back.submessages[0].body, SubmessageBody::Heartbeat(_)));
  }

  #[test]
  fn short_buffer_is_underflow() {
    assert!(matches!(
      Message::read_from_buffer(&[0u8; 4]),
      Err(RtpsError::BufferUnderflow)
    ));
  }
}
