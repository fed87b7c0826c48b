use std::time::Duration;

use mio_extras::timer::{Builder, Timeout, Timer};

use crate::structure::guid::Guid;

/// The kind of deadline an event token represents, so the event thread can
/// dispatch without consulting the endpoint it belongs to first.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
  HeartbeatPeriod,
  NackResponseDelay,
  NackSuppressionDuration,
  HeartbeatResponseDelay,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EventToken {
  pub endpoint: Guid,
  pub kind: EventKind,
}

/// Single monotonic-clock timer wheel per participant, built on
/// `mio_extras::timer::Timer`. Firing is serialized by the event thread
/// that polls it; this type only owns registration/cancellation.
pub struct EventScheduler {
  timer: Timer<EventToken>,
  pending: std::collections::HashMap<EventToken, Timeout>,
}

impl EventScheduler {
  pub fn new() -> EventScheduler {
    EventScheduler {
      timer: Builder::default().build(),
      pending: std::collections::HashMap::new(),
    }
  }

  /// Registers `token` to fire after `delay`, replacing (cancelling) any
  /// earlier registration for the same token.
  pub fn set_timeout(&mut self, delay: Duration, token: EventToken) {
    self.cancel(token);
    let timeout = self.timer.set_timeout(delay, token);
    self.pending.insert(token, timeout);
  }

  pub fn cancel(&mut self, token: EventToken) {
    if let Some(timeout) = self.pending.remove(&token) {
      self.timer.cancel_timeout(&timeout);
    }
  }

  /// Drains tokens that have fired; the caller (event thread) dispatches
  /// each to the owning endpoint.
  pub fn poll(&mut self) -> Option<EventToken> {
    let fired = self.timer.poll();
    if let Some(token) = fired {
      self.pending.remove(&token);
    }
    fired
  }
}

impl Default for EventScheduler {
  fn default() -> Self {
    EventScheduler::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cancel_prevents_a_pending_timeout_from_later_firing() {
    let mut scheduler = EventScheduler::new();
    let token = EventToken {
      endpoint: Guid::UNKNOWN,
      kind: EventKind::HeartbeatPeriod,
    };
    scheduler.set_timeout(Duration::from_secs(10), token);
    scheduler.cancel(token);
    assert!(scheduler.pending.is_empty());
  }
}
