use std::collections::VecDeque;

use crate::structure::locator::Locator;
use crate::structure::sequence_number::SequenceNumber;

/// One target of a `StatelessWriter`: a destination locator plus its FIFO
/// of not-yet-sent changes. No acknowledgement state; best-effort only.
pub struct ReaderLocator {
  pub locator: Locator,
  pub expects_inline_qos: bool,
  unsent_changes: VecDeque<SequenceNumber>,
}

impl ReaderLocator {
  pub fn new(locator: Locator, expects_inline_qos: bool) -> ReaderLocator {
    ReaderLocator {
      locator,
      expects_inline_qos,
      unsent_changes: VecDeque::new(),
    }
  }

  pub fn push_unsent(&mut self, sequence_number: SequenceNumber) {
    self.unsent_changes.push_back(sequence_number);
  }

  pub fn pop_unsent(&mut self) -> Option<SequenceNumber> {
    self.unsent_changes.pop_front()
  }

  pub fn unsent_changes_not_empty(&self) -> bool {
    !self.unsent_changes.is_empty()
  }
}
