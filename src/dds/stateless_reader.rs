use crate::config::ReaderConfig;
use crate::structure::cache_change::CacheChange;
use crate::structure::endpoint::{EndpointData, EndpointKind};
use crate::structure::guid::Guid;
use crate::structure::history_cache::HistoryCache;

/// Best-effort reader: accepts DATA from any matched writer, deduplicates
/// on `(sequence_number, writer_guid)` via `HistoryCache`, and never emits
/// an ACKNACK.
pub struct StatelessReader {
  pub endpoint: EndpointData,
  pub config: ReaderConfig,
  pub history: HistoryCache,
}

impl StatelessReader {
  pub fn new(guid: Guid, config: ReaderConfig) -> StatelessReader {
    StatelessReader {
      endpoint: EndpointData::new(guid, EndpointKind::Reader),
      history: HistoryCache::for_reader(config.endpoint.history_max_size),
      config,
    }
  }

  /// Returns `true` when the change was new and got stored.
  pub fn receive_data(&mut self, change: CacheChange) -> bool {
    self.history.add_change(change)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::messages::submessages::serialized_payload::SerializedPayload;
  use crate::structure::cache_change::ChangeKind;
  use crate::structure::sequence_number::SequenceNumber;

  fn change(writer: Guid, seq: i64) -> CacheChange {
    let mut c = CacheChange::new(ChangeKind::Alive, writer, SerializedPayload::default());
    c.sequence_number = SequenceNumber::from(seq);
    c
  }

  #[test]
  fn duplicate_seq_and_writer_is_rejected() {
    let mut reader = StatelessReader::new(Guid::UNKNOWN, ReaderConfig::default());
    let writer = Guid::new(crate::structure::guid::GuidPrefix::new(&[7; 12]), crate::structure::guid::EntityId::UNKNOWN);
    assert!(reader.receive_data(change(writer, 1)));
    assert!(!reader.receive_data(change(writer, 1)));
    assert_eq!(reader.history.len(), 1);
  }

  #[test]
  fn distinct_writers_with_same_seq_both_kept() {
    let mut reader = StatelessReader::new(Guid::UNKNOWN, ReaderConfig::default());
    let w1 = Guid::new(crate::structure::guid::GuidPrefix::new(&[1; 12]), crate::structure::guid::EntityId::UNKNOWN);
    let w2 = Guid::new(crate::structure::guid::GuidPrefix::new(&[2; 12]), crate::structure::guid::EntityId::UNKNOWN);
    assert!(reader.receive_data(change(w1, 1)));
    assert!(reader.receive_data(change(w2, 1)));
    assert_eq!(reader.history.len(), 2);
  }
}
