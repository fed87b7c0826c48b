use speedy::{Readable, Writable};

/// (kind, port, address). IPv4 occupies the last 4 bytes; IPv6 uses all 16.
/// Two locators compare equal by full tuple.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Readable, Writable)]
pub struct Locator {
  pub kind: i32,
  pub port: u32,
  pub address: [u8; 16],
}

pub type LocatorList = Vec<Locator>;

impl Locator {
  pub const KIND_INVALID: i32 = -1;
  pub const KIND_UDPV4: i32 = 1;
  pub const KIND_UDPV6: i32 = 2;

  pub const INVALID: Locator = Locator {
    kind: Self::KIND_INVALID,
    port: 0,
    address: [0; 16],
  };

  pub fn from_ipv4(ip: [u8; 4], port: u32) -> Locator {
    let mut address = [0u8; 16];
    address[12..16].copy_from_slice(&ip);
    Locator {
      kind: Self::KIND_UDPV4,
      port,
      address,
    }
  }

  pub fn is_multicast(&self) -> bool {
    self.kind == Self::KIND_UDPV4 && self.address[12] >= 224 && self.address[12] <= 239
  }
}

impl Default for Locator {
  fn default() -> Self {
    Locator::INVALID
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn equality_is_full_tuple() {
    let a = Locator::from_ipv4([127, 0, 0, 1], 7400);
    let b = Locator::from_ipv4([127, 0, 0, 1], 7400);
    let c = Locator::from_ipv4([127, 0, 0, 1], 7401);
    assert_eq!(a, b);
    assert_ne!(a, c);
  }

  #[test]
  fn multicast_range_detected() {
    assert!(Locator::from_ipv4([239, 255, 0, 1], 7400).is_multicast());
    assert!(!Locator::from_ipv4([127, 0, 0, 1], 7400).is_multicast());
  }
}
