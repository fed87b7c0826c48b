use std::collections::BTreeMap;

use crate::structure::guid::Guid;
use crate::structure::locator::LocatorList;
use crate::structure::sequence_number::SequenceNumber;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChangeFromWriterStatus {
  Unknown,
  Missing,
  Received,
  Lost,
}

/// A matched remote writer's reliability state, held by a `StatefulReader`.
pub struct WriterProxy {
  pub remote_writer_guid: Guid,
  pub unicast_locators: LocatorList,
  pub multicast_locators: LocatorList,
  changes: BTreeMap<SequenceNumber, ChangeFromWriterStatus>,
  pub last_heartbeat_count: i32,
  pub last_acknack_count: i32,
  pub irrelevant_changes_up_to: SequenceNumber,
}

impl WriterProxy {
  pub fn new(remote_writer_guid: Guid) -> WriterProxy {
    WriterProxy {
      remote_writer_guid,
      unicast_locators: Vec::new(),
      multicast_locators: Vec::new(),
      changes: BTreeMap::new(),
      last_heartbeat_count: 0,
      last_acknack_count: 0,
      irrelevant_changes_up_to: SequenceNumber::ZERO,
    }
  }

  pub fn received(&mut self, sequence_number: SequenceNumber) {
    self.changes.insert(sequence_number, ChangeFromWriterStatus::Received);
  }

  /// `count` must strictly exceed `last_heartbeat_count`, or the heartbeat
  /// is stale and is ignored (returns `false`). Every seq in
  /// `[first_sn, last_sn]` not yet `Received` becomes `Missing`, and
  /// `irrelevant_changes_up_to` advances to `first_sn - 1` if it rose.
  pub fn apply_heartbeat(&mut self, first_sn: SequenceNumber, last_sn: SequenceNumber, count: i32) -> bool {
    if count <= self.last_heartbeat_count {
      return false;
    }
    self.last_heartbeat_count = count;

    if first_sn > self.irrelevant_changes_up_to + SequenceNumber::from(1) {
      self.irrelevant_changes_up_to = first_sn + SequenceNumber::from(-1);
    }

    let mut seq = first_sn;
    while seq <= last_sn {
      self.changes.entry(seq).or_insert(ChangeFromWriterStatus::Missing);
      seq = seq + SequenceNumber::from(1);
    }
    true
  }

  /// Sequences in `[gap_start, gap_list.base)` and every bit set in
  /// `gap_list` become `Lost`.
  pub fn apply_gap(&mut self, gap_start: SequenceNumber, gap_base: SequenceNumber, gap_members: &[SequenceNumber]) {
    let mut seq = gap_start;
    while seq < gap_base {
      self.changes.insert(seq, ChangeFromWriterStatus::Lost);
      seq = seq + SequenceNumber::from(1);
    }
    for &seq in gap_members {
      self.changes.insert(seq, ChangeFromWriterStatus::Lost);
    }
  }

  pub fn missing_changes(&self) -> Vec<SequenceNumber> {
    self
      .changes
      .iter()
      .filter(|(_, status)| **status == ChangeFromWriterStatus::Missing)
      .map(|(seq, _)| *seq)
      .collect()
  }

  pub fn available_changes_max(&self) -> SequenceNumber {
    self
      .changes
      .iter()
      .filter(|(_, status)| **status == ChangeFromWriterStatus::Received)
      .map(|(seq, _)| *seq)
      .max()
      .unwrap_or(self.irrelevant_changes_up_to)
  }

  pub fn has_missing(&self) -> bool {
    self.changes.values().any(|s| *s == ChangeFromWriterStatus::Missing)
  }

  /// Lowest sequence number this proxy has any record of (received,
  /// missing, or lost). `None` before the first heartbeat or change.
  pub fn lowest_tracked(&self) -> Option<SequenceNumber> {
    self.changes.keys().next().copied()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stale_heartbeat_is_ignored() {
    let mut proxy = WriterProxy::new(Guid::UNKNOWN);
    assert!(proxy.apply_heartbeat(SequenceNumber::from(1), SequenceNumber::from(3), 2));
    assert!(!proxy.apply_heartbeat(SequenceNumber::from(1), SequenceNumber::from(5), 2));
    assert_eq!(proxy.last_heartbeat_count, 2);
  }

  #[test]
  fn heartbeat_marks_unreceived_range_missing() {
    let mut proxy = WriterProxy::new(Guid::UNKNOWN);
    proxy.received(SequenceNumber::from(2));
    proxy.apply_heartbeat(SequenceNumber::from(1), SequenceNumber::from(3), 1);
    assert_eq!(
      proxy.missing_changes(),
      vec![SequenceNumber::from(1), SequenceNumber::from(3)]
    );
  }

  #[test]
  fn gap_marks_range_and_bitmap_members_lost() {
    let mut proxy = WriterProxy::new(Guid::UNKNOWN);
    proxy.apply_heartbeat(SequenceNumber::from(1), SequenceNumber::from(5), 1);
    proxy.apply_gap(SequenceNumber::from(1), SequenceNumber::from(3), &[SequenceNumber::from(4)]);
    assert_eq!(proxy.missing_changes(), vec![SequenceNumber::from(5)]);
  }
}
