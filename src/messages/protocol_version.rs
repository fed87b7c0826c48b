use speedy::{Readable, Writable};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Readable, Writable)]
pub struct ProtocolVersion {
  pub major: u8,
  pub minor: u8,
}

impl ProtocolVersion {
  pub const THIS_IMPLEMENTATION: ProtocolVersion = ProtocolVersion { major: 2, minor: 1 };
}

impl Default for ProtocolVersion {
  fn default() -> Self {
    ProtocolVersion::THIS_IMPLEMENTATION
  }
}
