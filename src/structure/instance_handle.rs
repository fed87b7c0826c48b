use speedy::{Readable, Writable};

/// 16-byte key identity for a keyed topic instance; derived externally by
/// hashing the key fields of the topic type (not implemented here — the
/// core treats the hash as an opaque value supplied by the caller).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug, Readable, Writable)]
pub struct InstanceHandle {
  pub bytes: [u8; 16],
}

impl InstanceHandle {
  pub fn from_bytes(bytes: [u8; 16]) -> InstanceHandle {
    InstanceHandle { bytes }
  }
}
