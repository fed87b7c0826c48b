use std::collections::HashMap;

use crate::config::ReaderConfig;
use crate::messages::submessages::acknack::AckNack;
use crate::rtps::writer_proxy::WriterProxy;
use crate::structure::cache_change::CacheChange;
use crate::structure::endpoint::{EndpointData, EndpointKind};
use crate::structure::guid::{EntityId, Guid};
use crate::structure::history_cache::HistoryCache;
use crate::structure::locator::LocatorList;
use crate::structure::sequence_number::SequenceNumber;
use crate::structure::sequence_number_set::SequenceNumberSet;

/// Reliable reader: tracks one `WriterProxy` per matched remote writer and
/// emits ACKNACKs to request retransmission of missing changes.
pub struct StatefulReader {
  pub endpoint: EndpointData,
  pub config: ReaderConfig,
  pub history: HistoryCache,
  proxies: HashMap<Guid, WriterProxy>,
  acknack_count: i32,
}

impl StatefulReader {
  pub fn new(guid: Guid, config: ReaderConfig) -> StatefulReader {
    StatefulReader {
      endpoint: EndpointData::new(guid, EndpointKind::Reader),
      history: HistoryCache::for_reader(config.endpoint.history_max_size),
      config,
      proxies: HashMap::new(),
      acknack_count: 0,
    }
  }

  pub fn matched_writer_add(
    &mut self,
    remote_writer_guid: Guid,
    unicast_locators: LocatorList,
    multicast_locators: LocatorList,
  ) {
    let mut proxy = WriterProxy::new(remote_writer_guid);
    proxy.unicast_locators = unicast_locators;
    proxy.multicast_locators = multicast_locators;
    self.proxies.insert(remote_writer_guid, proxy);
  }

  pub fn matched_writer_remove(&mut self, remote_writer_guid: &Guid) {
    self.proxies.remove(remote_writer_guid);
  }

  pub fn matched_writer_count(&self) -> usize {
    self.proxies.len()
  }

  /// Stores the change (deduplicated by `HistoryCache`) and marks it
  /// `Received` on the originating writer's proxy, if matched.
  pub fn receive_data(&mut self, remote_writer_guid: Guid, change: CacheChange) -> bool {
    let sequence_number = change.sequence_number;
    let stored = self.history.add_change(change);
    if let Some(proxy) = self.proxies.get_mut(&remote_writer_guid) {
      proxy.received(sequence_number);
    }
    stored
  }

  pub fn receive_heartbeat(
    &mut self,
    remote_writer_guid: &Guid,
    first_sn: SequenceNumber,
    last_sn: SequenceNumber,
    count: i32,
  ) -> bool {
    match self.proxies.get_mut(remote_writer_guid) {
      Some(proxy) => proxy.apply_heartbeat(first_sn, last_sn, count),
      None => false,
    }
  }

  pub fn receive_gap(
    &mut self,
    remote_writer_guid: &Guid,
    gap_start: SequenceNumber,
    gap_list: &SequenceNumberSet,
  ) {
    if let Some(proxy) = self.proxies.get_mut(remote_writer_guid) {
      proxy.apply_gap(gap_start, gap_list.base, &gap_list.sequence_numbers());
    }
  }

  /// One ACKNACK per matched writer that has heard from at least one
  /// heartbeat or change: while anything is `Missing`, `base` anchors at
  /// the lowest sequence number the proxy tracks (so the bitmap reports
  /// status across the whole known window, not just the gap) and the
  /// bitmap lists everything still `Missing`; once nothing is missing,
  /// `base` collapses to `available_changes_max + 1` with an empty bitmap.
  pub fn produce_acknacks(&mut self) -> Vec<(Guid, AckNack)> {
    self.acknack_count += 1;
    let count = self.acknack_count;
    self
      .proxies
      .iter()
      .filter(|(_, proxy)| proxy.lowest_tracked().is_some())
      .map(|(remote, proxy)| {
        let missing = proxy.missing_changes();
        let base = if missing.is_empty() {
          proxy.available_changes_max() + SequenceNumber::from(1)
        } else {
          proxy.lowest_tracked().expect("filtered to Some above")
        };
        (
          *remote,
          AckNack {
            reader_id: self.endpoint.guid.entity_id,
            writer_id: EntityId::UNKNOWN,
            reader_sn_state: SequenceNumberSet::from_sequence_numbers(base, &missing),
            count,
          },
        )
      })
      .collect()
  }

  pub fn proxy(&self, remote_writer_guid: &Guid) -> Option<&WriterProxy> {
    self.proxies.get(remote_writer_guid)
  }
}
