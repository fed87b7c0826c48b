use speedy::{Context, Readable, Reader, Writable, Writer};

use crate::messages::protocol_version::ProtocolVersion;
use crate::messages::vendor_id::VendorId;
use crate::structure::guid::GuidPrefix;

pub const PROTOCOL_ID: [u8; 4] = *b"RTPS";

/// The fixed 20-byte RTPS message header: magic, protocol version, vendor
/// id, and the sending participant's GUID prefix.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Header {
  pub protocol_version: ProtocolVersion,
  pub vendor_id: VendorId,
  pub guid_prefix: GuidPrefix,
}

impl Header {
  pub fn new(guid_prefix: GuidPrefix) -> Header {
    Header {
      protocol_version: ProtocolVersion::THIS_IMPLEMENTATION,
      vendor_id: VendorId::VENDOR_UNKNOWN,
      guid_prefix,
    }
  }
}

impl<'a, C: Context> Readable<'a, C> for Header {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let magic: [u8; 4] = reader.read_value()?;
    if magic != PROTOCOL_ID {
      return Err(speedy::Error::custom("missing RTPS protocol id").into());
    }
    let protocol_version = reader.read_value()?;
    let vendor_id = reader.read_value()?;
    let guid_prefix = reader.read_value()?;
    Ok(Header {
      protocol_version,
      vendor_id,
      guid_prefix,
    })
  }

  #[inline]
  fn minimum_bytes_needed() -> usize {
    20
  }
}

impl<C: Context> Writable<C> for Header {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    writer.write_bytes(&PROTOCOL_ID)?;
    writer.write_value(&self.protocol_version)?;
    writer.write_value(&self.vendor_id)?;
    writer.write_value(&self.guid_prefix)?;
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use speedy::Endianness;

  #[test]
  fn roundtrip() {
    let header = Header::new(GuidPrefix::new(&[7; 12]));
    let bytes = header.write_to_vec_with_ctx(Endianness::LittleEndian).unwrap();
    assert_eq!(&bytes[0..4], b"RTPS");
    let back = Header::read_from_buffer_with_ctx(Endianness::LittleEndian, &bytes).unwrap();
    assert_eq!(header, back);
  }

  #[test]
  fn missing_magic_is_rejected() {
    let bytes = [0u8; 20];
    assert!(Header::read_from_buffer_with_ctx(Endianness::LittleEndian, &bytes).is_err());
  }
}
