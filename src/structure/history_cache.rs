use crate::structure::cache_change::CacheChange;
use crate::structure::cache_pool::{CachePool, ChangeHandle};
use crate::structure::guid::Guid;
use crate::structure::sequence_number::SequenceNumber;

/// Whether a history belongs to the writer that produces changes or the
/// reader that receives them; governs `add_change`'s sequence-number and
/// dedup rules (spec.md §4.5).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Owner {
  Writer,
  Reader,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Endpoint {
  seq: SequenceNumber,
  guid: Guid,
}

/// Per-endpoint ordered container of `CacheChange`, capacity-bounded, with
/// min/max-sequence tracking. Callers are expected to hold the owning
/// endpoint's mutex before calling any method here; no internal locking.
pub struct HistoryCache {
  owner: Owner,
  pool: CachePool,
  changes: Vec<ChangeHandle>,
  last_added: Option<ChangeHandle>,
  last_change_seq: SequenceNumber,
  min_max: Option<(Option<Endpoint>, Option<Endpoint>)>,
  max_size: usize,
}

impl HistoryCache {
  pub fn for_writer(max_size: usize) -> HistoryCache {
    HistoryCache::new(Owner::Writer, max_size)
  }

  pub fn for_reader(max_size: usize) -> HistoryCache {
    HistoryCache::new(Owner::Reader, max_size)
  }

  fn new(owner: Owner, max_size: usize) -> HistoryCache {
    HistoryCache {
      owner,
      pool: CachePool::new(max_size),
      changes: Vec::new(),
      last_added: None,
      last_change_seq: SequenceNumber::ZERO,
      min_max: None,
      max_size,
    }
  }

  /// Writer side: assigns the next sequence number and appends. Reader
  /// side: rejects a duplicate `(sequence_number, writer_guid)`, otherwise
  /// inserts keeping per-writer ordering. Returns `false` on rejection.
  pub fn add_change(&mut self, mut change: CacheChange) -> bool {
    match self.owner {
      Owner::Writer => {
        if self.changes.len() >= self.max_size {
          return false;
        }
        self.last_change_seq = self.last_change_seq + SequenceNumber::from(1);
        change.sequence_number = self.last_change_seq;
      }
      Owner::Reader => {
        if self
          .iter()
          .any(|c| c.sequence_number == change.sequence_number && c.writer_guid == change.writer_guid)
        {
          return false;
        }
        if self.changes.len() >= self.max_size {
          return false;
        }
      }
    }

    let insert_at = match self.owner {
      Owner::Reader => self
        .iter_handles()
        .position(|(_, c)| c.writer_guid == change.writer_guid && c.sequence_number > change.sequence_number),
      Owner::Writer => None,
    };

    let handle = match self.pool.reserve(change) {
      Some(handle) => handle,
      None => return false,
    };

    match insert_at {
      Some(pos) => self.changes.insert(pos, handle),
      None => self.changes.push(handle),
    }
    self.last_added = Some(handle);
    self.min_max = None;
    true
  }

  /// Removes the first change matching `sequence_number` (and, for a
  /// reader's history, `writer_guid`). Returns whether anything was removed.
  pub fn remove_change(&mut self, sequence_number: SequenceNumber, writer_guid: Guid) -> bool {
    let position = self.changes.iter().position(|&handle| {
      let change = self.pool.get(handle).expect("handle in changes must be live");
      change.sequence_number == sequence_number
        && (self.owner == Owner::Writer || change.writer_guid == writer_guid)
    });
    match position {
      Some(pos) => {
        let handle = self.changes.remove(pos);
        self.pool.release(handle);
        if self.last_added == Some(handle) {
          self.last_added = self.changes.last().copied();
        }
        self.min_max = None;
        true
      }
      None => false,
    }
  }

  pub fn remove_all(&mut self) -> bool {
    let any = !self.changes.is_empty();
    for handle in self.changes.drain(..) {
      self.pool.release(handle);
    }
    self.last_added = None;
    self.min_max = None;
    any
  }

  /// For a writer's history `writer_guid` is ignored; for a reader's it
  /// disambiguates between contributing writers.
  pub fn get_change(&self, sequence_number: SequenceNumber, writer_guid: Guid) -> Option<&CacheChange> {
    self.iter().find(|c| {
      c.sequence_number == sequence_number && (self.owner == Owner::Writer || c.writer_guid == writer_guid)
    })
  }

  pub fn get_last_added(&self) -> Option<&CacheChange> {
    self.last_added.and_then(|handle| self.pool.get(handle))
  }

  pub fn get_seq_num_min(&mut self) -> (SequenceNumber, Guid) {
    self.recompute_min_max_if_stale();
    match self.min_max.unwrap().0 {
      Some(e) => (e.seq, e.guid),
      None => (SequenceNumber::UNKNOWN, Guid::UNKNOWN),
    }
  }

  pub fn get_seq_num_max(&mut self) -> (SequenceNumber, Guid) {
    self.recompute_min_max_if_stale();
    match self.min_max.unwrap().1 {
      Some(e) => (e.seq, e.guid),
      None => (SequenceNumber::UNKNOWN, Guid::UNKNOWN),
    }
  }

  pub fn is_full(&self) -> bool {
    self.changes.len() >= self.max_size
  }

  pub fn len(&self) -> usize {
    self.changes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.changes.is_empty()
  }

  /// `(sequence_number, writer_guid)` for every change currently present,
  /// in the history's own order.
  pub fn sequence_numbers(&self) -> Vec<(SequenceNumber, Guid)> {
    self.iter().map(|c| (c.sequence_number, c.writer_guid)).collect()
  }

  fn recompute_min_max_if_stale(&mut self) {
    if self.min_max.is_some() {
      return;
    }
    let min = self
      .iter()
      .min_by_key(|c| c.sequence_number)
      .map(|c| Endpoint {
        seq: c.sequence_number,
        guid: c.writer_guid,
      });
    let max = self
      .iter()
      .max_by_key(|c| c.sequence_number)
      .map(|c| Endpoint {
        seq: c.sequence_number,
        guid: c.writer_guid,
      });
    self.min_max = Some((min, max));
  }

  fn iter(&self) -> impl Iterator<Item = &CacheChange> {
    self.changes.iter().map(move |&handle| self.pool.get(handle).expect("handle in changes must be live"))
  }

  fn iter_handles(&self) -> impl Iterator<Item = (ChangeHandle, &CacheChange)> {
    self
      .changes
      .iter()
      .map(move |&handle| (handle, self.pool.get(handle).expect("handle in changes must be live")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::structure::cache_change::ChangeKind;
  use crate::messages::submessages::serialized_payload::SerializedPayload;

  fn change(writer_guid: Guid) -> CacheChange {
    CacheChange::new(ChangeKind::Alive, writer_guid, SerializedPayload::default())
  }

  #[test]
  fn writer_history_assigns_sequence_numbers() {
    let mut history = HistoryCache::for_writer(4);
    assert!(history.add_change(change(Guid::UNKNOWN)));
    assert!(history.add_change(change(Guid::UNKNOWN)));
    assert_eq!(history.get_seq_num_min().0, SequenceNumber::from(1));
    assert_eq!(history.get_seq_num_max().0, SequenceNumber::from(2));
  }

  #[test]
  fn writer_history_rejects_past_capacity() {
    let mut history = HistoryCache::for_writer(1);
    assert!(history.add_change(change(Guid::UNKNOWN)));
    assert!(!history.add_change(change(Guid::UNKNOWN)));
    assert!(history.is_full());
  }

  #[test]
  fn reader_history_rejects_duplicate_seq_and_writer() {
    let mut history = HistoryCache::for_reader(4);
    let mut c = change(Guid::UNKNOWN);
    c.sequence_number = SequenceNumber::from(42);
    assert!(history.add_change(c.clone()));
    assert!(!history.add_change(c));
    assert_eq!(history.len(), 1);
  }

  #[test]
  fn remove_change_clears_entry_and_updates_min_max() {
    let mut history = HistoryCache::for_writer(4);
    history.add_change(change(Guid::UNKNOWN));
    history.add_change(change(Guid::UNKNOWN));
    assert!(history.remove_change(SequenceNumber::from(1), Guid::UNKNOWN));
    assert_eq!(history.get_seq_num_min().0, SequenceNumber::from(2));
    assert_eq!(history.len(), 1);
  }

  #[test]
  fn empty_history_yields_unknown_bounds() {
    let mut history = HistoryCache::for_writer(4);
    assert_eq!(history.get_seq_num_min(), (SequenceNumber::UNKNOWN, Guid::UNKNOWN));
    assert_eq!(history.get_seq_num_max(), (SequenceNumber::UNKNOWN, Guid::UNKNOWN));
  }
}
