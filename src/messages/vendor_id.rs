use speedy::{Readable, Writable};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Readable, Writable)]
pub struct VendorId {
  pub vendor_id: [u8; 2],
}

impl VendorId {
  pub const VENDOR_UNKNOWN: VendorId = VendorId { vendor_id: [0, 0] };
}

impl Default for VendorId {
  fn default() -> Self {
    VendorId::VENDOR_UNKNOWN
  }
}
