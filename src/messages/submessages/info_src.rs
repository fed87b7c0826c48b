use speedy::{Readable, Writable};

use crate::messages::protocol_version::ProtocolVersion;
use crate::messages::vendor_id::VendorId;
use crate::structure::guid::GuidPrefix;

/// Overrides `source_guid_prefix` (and the recorded source protocol
/// version/vendor id) for the rest of the message, e.g. when relaying.
#[derive(Clone, Copy, Debug, PartialEq, Readable, Writable)]
pub struct InfoSrc {
  pub unused: u32,
  pub protocol_version: ProtocolVersion,
  pub vendor_id: VendorId,
  pub guid_prefix: GuidPrefix,
}
