use crate::config::Reliability;
use crate::structure::guid::Guid;
use crate::structure::locator::LocatorList;

/// Capability invoked by an external discovery layer (SPDP/SEDP) to add or
/// drop matched remote endpoints. The core never initiates discovery
/// itself; it only reacts to these calls by mutating `ReaderProxy`/
/// `WriterProxy` state inside the matching stateful endpoint.
pub trait Discovery {
  fn match_reader(&mut self, remote_guid: Guid, locators: LocatorList, reliability: Reliability, topic: &str);

  fn unmatch_reader(&mut self, remote_guid: Guid);

  fn match_writer(&mut self, remote_guid: Guid, locators: LocatorList, reliability: Reliability, topic: &str);

  fn unmatch_writer(&mut self, remote_guid: Guid);
}
