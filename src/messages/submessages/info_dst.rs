use speedy::{Readable, Writable};

use crate::structure::guid::GuidPrefix;

/// Sets the `MessageReceiver`'s `dest_guid_prefix`; `GuidPrefix::UNKNOWN`
/// means "this participant", per spec.
#[derive(Clone, Copy, Debug, PartialEq, Readable, Writable)]
pub struct InfoDst {
  pub guid_prefix: GuidPrefix,
}
