use crate::error::RtpsError;
use crate::structure::locator::Locator;

/// Capability the core consumes for datagram I/O. Socket lifecycle
/// (bind/select/epoll) lives entirely outside the core; an implementation
/// is expected to feed inbound datagrams to a `MessageReceiver` itself.
pub trait Transport {
  /// Synchronous best-effort delivery. Implementations log and drop on
  /// failure rather than propagate, matching RTPS's "unreliable transport"
  /// assumption at this layer.
  fn send(&self, buf: &[u8], to: &Locator) -> Result<(), RtpsError>;

  fn open_unicast(&mut self, ip: [u8; 4], port: u16) -> Result<Locator, RtpsError>;

  fn open_multicast(&mut self, group: [u8; 4], port: u16) -> Result<Locator, RtpsError>;

  fn close(&mut self, locator: &Locator);
}
