use crate::config::{TopicKind, WriterConfig};
use crate::messages::submessages::serialized_payload::SerializedPayload;
use crate::structure::cache_change::{CacheChange, ChangeKind};
use crate::structure::endpoint::{EndpointData, EndpointKind};
use crate::structure::guid::Guid;
use crate::structure::history_cache::HistoryCache;
use crate::structure::locator::Locator;
use crate::structure::sequence_number::SequenceNumber;

use crate::rtps::reader_locator::ReaderLocator;

/// Best-effort writer: no per-reader acknowledgement state, no
/// retransmission. Each matched `ReaderLocator` gets its own unsent FIFO.
pub struct StatelessWriter {
  pub endpoint: EndpointData,
  pub config: WriterConfig,
  pub history: HistoryCache,
  reader_locators: Vec<ReaderLocator>,
}

impl StatelessWriter {
  pub fn new(guid: Guid, config: WriterConfig) -> StatelessWriter {
    StatelessWriter {
      endpoint: EndpointData::new(guid, EndpointKind::Writer),
      history: HistoryCache::for_writer(config.endpoint.history_max_size),
      config,
      reader_locators: Vec::new(),
    }
  }

  pub fn reader_locator_add(&mut self, locator: Locator, expects_inline_qos: bool) {
    if self.reader_locators.iter().any(|rl| rl.locator == locator) {
      return;
    }
    self.reader_locators.push(ReaderLocator::new(locator, expects_inline_qos));
  }

  pub fn reader_locator_remove(&mut self, locator: &Locator) {
    self.reader_locators.retain(|rl| rl.locator != *locator);
  }

  /// Creates a `CacheChange`, inserts it into history, and enqueues it on
  /// every matched locator. Returns `None` when the history is full.
  pub fn write(&mut self, data: Vec<u8>) -> Option<SequenceNumber> {
    let payload = SerializedPayload::new(
      crate::messages::submessages::representation_identifier::RepresentationIdentifier::CdrLe,
      data,
    );
    let change = CacheChange::new(ChangeKind::Alive, self.endpoint.guid, payload);
    self.enqueue(change)
  }

  /// Announces the instance identified by `key_hash` as disposed: a change
  /// with no data payload, carrying `PID_KEY_HASH`/`PID_STATUS_INFO` in
  /// inline QoS. No-key topics have no instance to target and refuse.
  pub fn dispose(&mut self, key_hash: [u8; 16]) -> Option<SequenceNumber> {
    self.write_key_only(ChangeKind::NotAliveDisposed, key_hash)
  }

  /// Announces the instance identified by `key_hash` as unregistered; see
  /// `dispose`.
  pub fn unregister(&mut self, key_hash: [u8; 16]) -> Option<SequenceNumber> {
    self.write_key_only(ChangeKind::NotAliveUnregistered, key_hash)
  }

  fn write_key_only(&mut self, kind: ChangeKind, key_hash: [u8; 16]) -> Option<SequenceNumber> {
    if self.config.endpoint.topic_kind == TopicKind::NoKey {
      return None;
    }
    let change = CacheChange::new_key_only(kind, self.endpoint.guid, key_hash);
    self.enqueue(change)
  }

  fn enqueue(&mut self, change: CacheChange) -> Option<SequenceNumber> {
    if !self.history.add_change(change) {
      return None;
    }
    let seq = self.history.get_last_added()?.sequence_number;
    for locator in &mut self.reader_locators {
      locator.push_unsent(seq);
    }
    Some(seq)
  }

  pub fn unsent_changes_not_empty(&self) -> bool {
    self.reader_locators.iter().any(|rl| rl.unsent_changes_not_empty())
  }

  /// Drains each locator's FIFO, returning `(locator, change)` pairs ready
  /// to be serialized into DATA submessages and sent.
  pub fn drain_unsent(&mut self) -> Vec<(Locator, CacheChange)> {
    let mut out = Vec::new();
    for rl in &mut self.reader_locators {
      while let Some(seq) = rl.pop_unsent() {
        if let Some(change) = self.history.get_change(seq, Guid::UNKNOWN) {
          out.push((rl.locator, change.clone()));
        }
      }
    }
    out
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn write_enqueues_on_every_matched_locator() {
    let mut writer = StatelessWriter::new(Guid::UNKNOWN, WriterConfig::default());
    let a = Locator::from_ipv4([127, 0, 0, 1], 7400);
    let b = Locator::from_ipv4([127, 0, 0, 1], 7401);
    writer.reader_locator_add(a, false);
    writer.reader_locator_add(b, false);

    writer.write(b"A".to_vec()).unwrap();
    assert!(writer.unsent_changes_not_empty());

    let drained = writer.drain_unsent();
    assert_eq!(drained.len(), 2);
    assert!(!writer.unsent_changes_not_empty());
  }

  #[test]
  fn reader_locator_remove_drops_its_pending_changes() {
    let mut writer = StatelessWriter::new(Guid::UNKNOWN, WriterConfig::default());
    let a = Locator::from_ipv4([127, 0, 0, 1], 7400);
    writer.reader_locator_add(a, false);
    writer.write(b"A".to_vec()).unwrap();
    writer.reader_locator_remove(&a);
    assert!(writer.drain_unsent().is_empty());
  }
}
