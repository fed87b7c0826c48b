use std::collections::BTreeMap;

use crate::structure::guid::Guid;
use crate::structure::locator::LocatorList;
use crate::structure::sequence_number::SequenceNumber;

/// Per-change delivery status tracked by a writer for one matched reader.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChangeForReaderStatus {
  Unsent,
  Unacknowledged,
  Requested,
  Underway,
  Acknowledged,
}

#[derive(Clone, Copy, Debug)]
pub struct ChangeForReader {
  pub sequence_number: SequenceNumber,
  pub status: ChangeForReaderStatus,
  /// `false` when `dds_is_relevant` decided the reader should get a GAP for
  /// this change instead of DATA (e.g. it predates the reader's join time).
  pub is_relevant: bool,
}

/// A matched remote reader's reliability state, held by a `StatefulWriter`.
pub struct ReaderProxy {
  pub remote_reader_guid: Guid,
  pub unicast_locators: LocatorList,
  pub multicast_locators: LocatorList,
  pub expects_inline_qos: bool,
  changes: BTreeMap<SequenceNumber, ChangeForReader>,
  pub last_acknack_count: i32,
}

impl ReaderProxy {
  pub fn new(remote_reader_guid: Guid, expects_inline_qos: bool) -> ReaderProxy {
    ReaderProxy {
      remote_reader_guid,
      unicast_locators: Vec::new(),
      multicast_locators: Vec::new(),
      expects_inline_qos,
      changes: BTreeMap::new(),
      last_acknack_count: 0,
    }
  }

  /// Seeds this proxy with one entry per change already in the writer's
  /// history, per `push_mode`. `is_relevant` is decided by the caller
  /// (`dds_is_relevant`), since it depends on durability/QoS the core
  /// treats as opaque.
  pub fn seed_from_history<I: IntoIterator<Item = (SequenceNumber, bool)>>(
    &mut self,
    changes: I,
    push_mode: bool,
  ) {
    for (sequence_number, is_relevant) in changes {
      let status = if push_mode {
        ChangeForReaderStatus::Unsent
      } else {
        ChangeForReaderStatus::Unacknowledged
      };
      self.changes.insert(
        sequence_number,
        ChangeForReader {
          sequence_number,
          status,
          is_relevant,
        },
      );
    }
  }

  pub fn add_change(&mut self, sequence_number: SequenceNumber, is_relevant: bool, push_mode: bool) {
    let status = if push_mode {
      ChangeForReaderStatus::Unsent
    } else {
      ChangeForReaderStatus::Unacknowledged
    };
    self.changes.insert(
      sequence_number,
      ChangeForReader {
        sequence_number,
        status,
        is_relevant,
      },
    );
  }

  pub fn is_acked_by_all(&self, sequence_number: SequenceNumber) -> bool {
    match self.changes.get(&sequence_number) {
      None => true,
      Some(c) => !c.is_relevant || c.status == ChangeForReaderStatus::Acknowledged,
    }
  }

  /// All entries currently `Unsent` or `Requested`, sorted by sequence
  /// number ascending and flipped to `Underway`.
  pub fn take_unsent_and_requested(&mut self) -> Vec<ChangeForReader> {
    let mut selected: Vec<SequenceNumber> = self
      .changes
      .values()
      .filter(|c| matches!(c.status, ChangeForReaderStatus::Unsent | ChangeForReaderStatus::Requested))
      .map(|c| c.sequence_number)
      .collect();
    selected.sort();

    let mut out = Vec::with_capacity(selected.len());
    for seq in selected {
      if let Some(c) = self.changes.get_mut(&seq) {
        c.status = ChangeForReaderStatus::Underway;
        out.push(*c);
      }
    }
    out
  }

  pub fn mark_acknowledged(&mut self, sequence_number: SequenceNumber) {
    if let Some(c) = self.changes.get_mut(&sequence_number) {
      c.status = ChangeForReaderStatus::Acknowledged;
    }
  }

  /// `reader_sn_state.base` means the reader already has everything below
  /// it; those entries become `Acknowledged`. Within `[base, max]`, bits set
  /// become `Requested`, present-but-unset bits become `Acknowledged`.
  pub fn apply_acknack(&mut self, base: SequenceNumber, requested: &[SequenceNumber], max: SequenceNumber) {
    let requested: std::collections::HashSet<SequenceNumber> = requested.iter().copied().collect();
    for (_, change) in self.changes.range_mut(..base) {
      change.status = ChangeForReaderStatus::Acknowledged;
    }
    for (seq, change) in self.changes.range_mut(base..=max) {
      if requested.contains(seq) {
        change.status = ChangeForReaderStatus::Requested;
      } else if change.status != ChangeForReaderStatus::Acknowledged {
        change.status = ChangeForReaderStatus::Acknowledged;
      }
    }
  }

  pub fn remove_change(&mut self, sequence_number: SequenceNumber) {
    self.changes.remove(&sequence_number);
  }

  pub fn has_unacked(&self) -> bool {
    self
      .changes
      .values()
      .any(|c| c.is_relevant && c.status != ChangeForReaderStatus::Acknowledged)
  }
}
