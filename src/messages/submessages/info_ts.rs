use enumflags2::bitflags;
use speedy::Endianness;

use crate::error::RtpsError;
use crate::structure::time::Timestamp;

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InfoTsFlags {
  Endianness = 0b0001,
  /// When set, no `Timestamp` body follows; the receiver clears its
  /// current source timestamp instead of updating it.
  Invalidate = 0b0010,
}

/// Sets (or invalidates) the `MessageReceiver`'s `source_timestamp` for
/// every subsequent submessage in the message.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfoTs {
  pub timestamp: Option<Timestamp>,
}

impl InfoTs {
  pub fn parse(bytes: &[u8], invalidate: bool, endianness: Endianness) -> Result<InfoTs, RtpsError> {
    if invalidate {
      return Ok(InfoTs { timestamp: None });
    }
    use speedy::Readable;
    let timestamp = Timestamp::read_from_buffer_with_ctx(endianness, bytes)
      .map_err(|e| RtpsError::SubmessageMalformed(e.to_string()))?;
    Ok(InfoTs {
      timestamp: Some(timestamp),
    })
  }

  pub fn write_to_vec(&self, endianness: Endianness) -> Result<Vec<u8>, RtpsError> {
    use speedy::Writable;
    match self.timestamp {
      Some(ts) => ts
        .write_to_vec_with_ctx(endianness)
        .map_err(|e| RtpsError::SubmessageMalformed(e.to_string())),
      None => Ok(Vec::new()),
    }
  }
}
