use speedy::{Readable, Writable};

/// RTPS wire Time: seconds since epoch plus fractional nanoseconds encoded
/// as a 1/2^32 fraction, matching the 8-byte INFO_TS body.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Readable, Writable)]
pub struct Timestamp {
  pub seconds: i32,
  pub fraction: u32,
}

impl Timestamp {
  pub const INVALID: Timestamp = Timestamp {
    seconds: -1,
    fraction: 0xFFFF_FFFF,
  };

  pub fn now() -> Timestamp {
    let ts = time::get_time();
    Timestamp {
      seconds: ts.sec as i32,
      fraction: ((ts.nsec as u64 * (1u64 << 32)) / 1_000_000_000) as u32,
    }
  }
}

impl Default for Timestamp {
  fn default() -> Self {
    Timestamp::INVALID
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use speedy::{Endianness, Readable, Writable};

  #[test]
  fn roundtrip() {
    let t = Timestamp {
      seconds: 123_456,
      fraction: 42,
    };
    for endian in [Endianness::LittleEndian, Endianness::BigEndian] {
      let bytes = t.write_to_vec_with_ctx(endian).unwrap();
      let back = Timestamp::read_from_buffer_with_ctx(endian, &bytes).unwrap();
      assert_eq!(t, back);
    }
  }
}
