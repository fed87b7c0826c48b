use std::collections::HashMap;

use crate::config::{TopicKind, WriterConfig};
use crate::messages::submessages::data::Data;
use crate::messages::submessages::gap::Gap;
use crate::messages::submessages::heartbeat::Heartbeat;
use crate::messages::submessages::representation_identifier::RepresentationIdentifier;
use crate::messages::submessages::serialized_payload::SerializedPayload;
use crate::rtps::reader_proxy::{ChangeForReaderStatus, ReaderProxy};
use crate::structure::cache_change::{CacheChange, ChangeKind};
use crate::structure::endpoint::{EndpointData, EndpointKind};
use crate::structure::guid::Guid;
use crate::structure::history_cache::HistoryCache;
use crate::structure::locator::LocatorList;
use crate::structure::sequence_number::SequenceNumber;
use crate::structure::sequence_number_set::{SequenceNumberSet, MAX_BITS};

/// Reliable (or best-effort-over-a-stateful-proxy) writer: tracks one
/// `ReaderProxy` per matched remote reader and drives retransmission via
/// HEARTBEAT/ACKNACK.
pub struct StatefulWriter {
  pub endpoint: EndpointData,
  pub config: WriterConfig,
  pub history: HistoryCache,
  proxies: HashMap<Guid, ReaderProxy>,
  heartbeat_count: i32,
}

/// One addressed outbound submessage, ready for the transport layer.
pub enum OutgoingSubmessage {
  Data { to: Guid, body: Data },
  Gap { to: Guid, body: Gap },
  Heartbeat { to: Guid, body: Heartbeat },
}

impl StatefulWriter {
  pub fn new(guid: Guid, config: WriterConfig) -> StatefulWriter {
    StatefulWriter {
      endpoint: EndpointData::new(guid, EndpointKind::Writer),
      history: HistoryCache::for_writer(config.endpoint.history_max_size),
      config,
      proxies: HashMap::new(),
      heartbeat_count: 0,
    }
  }

  /// Adds a proxy for `remote_reader_guid` and seeds it with every change
  /// currently in history, marked relevant unless the writer's durability
  /// is `Volatile` (a late-joining reader gets nothing historical then).
  pub fn matched_reader_add(
    &mut self,
    remote_reader_guid: Guid,
    unicast_locators: LocatorList,
    multicast_locators: LocatorList,
    expects_inline_qos: bool,
  ) {
    let mut proxy = ReaderProxy::new(remote_reader_guid, expects_inline_qos);
    proxy.unicast_locators = unicast_locators;
    proxy.multicast_locators = multicast_locators;
    let is_relevant = !matches!(self.config.endpoint.durability, crate::config::Durability::Volatile);
    let history_seqs: Vec<(SequenceNumber, bool)> = self
      .history
      .sequence_numbers()
      .into_iter()
      .map(|(seq, _writer)| (seq, is_relevant))
      .collect();
    proxy.seed_from_history(history_seqs, self.config.push_mode);
    self.proxies.insert(remote_reader_guid, proxy);
  }

  pub fn matched_reader_remove(&mut self, remote_reader_guid: &Guid) {
    self.proxies.remove(remote_reader_guid);
  }

  pub fn matched_reader_count(&self) -> usize {
    self.proxies.len()
  }

  /// Appends `data` to history, then marks the change pending delivery on
  /// every matched proxy. Returns `None` when history is full.
  pub fn write(&mut self, data: Vec<u8>) -> Option<SequenceNumber> {
    let payload = SerializedPayload::new(RepresentationIdentifier::CdrLe, data);
    let change = CacheChange::new(ChangeKind::Alive, self.endpoint.guid, payload);
    self.enqueue(change)
  }

  /// Announces the instance identified by `key_hash` as disposed: a DATA
  /// with no serialized payload, carrying `PID_KEY_HASH`/`PID_STATUS_INFO`
  /// in inline QoS. No-key topics have no instance to target and refuse.
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
    for proxy in self.proxies.values_mut() {
      proxy.add_change(seq, true, self.config.push_mode);
    }
    Some(seq)
  }

  pub fn is_acked_by_all(&self, sequence_number: SequenceNumber) -> bool {
    self.proxies.values().all(|p| p.is_acked_by_all(sequence_number))
  }

  pub fn unsent_changes_not_empty(&self) -> bool {
    self.proxies.values().any(|p| p.has_unacked())
  }

  /// Drains every proxy's unsent/requested queue into DATA submessages
  /// addressed to that reader; missing history entries (already
  /// retired) become GAPs instead.
  pub fn produce_outgoing(&mut self) -> Vec<OutgoingSubmessage> {
    let mut out = Vec::new();
    for proxy in self.proxies.values_mut() {
      for change_for_reader in proxy.take_unsent_and_requested() {
        if !change_for_reader.is_relevant {
          out.push(OutgoingSubmessage::Gap {
            to: proxy.remote_reader_guid,
            body: Gap {
              reader_id: crate::structure::guid::EntityId::UNKNOWN,
              writer_id: self.endpoint.guid.entity_id,
              gap_start: change_for_reader.sequence_number,
              gap_list: SequenceNumberSet::new(change_for_reader.sequence_number + SequenceNumber::from(1)),
            },
          });
          continue;
        }
        match self.history.get_change(change_for_reader.sequence_number, Guid::UNKNOWN) {
          Some(change) => out.push(OutgoingSubmessage::Data {
            to: proxy.remote_reader_guid,
            body: Data {
              reader_id: crate::structure::guid::EntityId::UNKNOWN,
              writer_id: self.endpoint.guid.entity_id,
              writer_sn: change_for_reader.sequence_number,
              inline_qos: change.inline_qos.clone(),
              // Dispose/unregister notices carry no sample, only inline QoS.
              serialized_payload: (change.kind == ChangeKind::Alive).then(|| change.serialized_payload.clone()),
            },
          }),
          None => out.push(OutgoingSubmessage::Gap {
            to: proxy.remote_reader_guid,
            body: Gap {
              reader_id: crate::structure::guid::EntityId::UNKNOWN,
              writer_id: self.endpoint.guid.entity_id,
              gap_start: change_for_reader.sequence_number,
              gap_list: SequenceNumberSet::new(change_for_reader.sequence_number + SequenceNumber::from(1)),
            },
          }),
        }
      }
    }
    out
  }

  /// Builds a HEARTBEAT announcing the writer's current `[min, max]`
  /// window, one per matched proxy, bumping the shared `count`.
  pub fn produce_heartbeats(&mut self) -> Vec<OutgoingSubmessage> {
    if self.proxies.is_empty() {
      return Vec::new();
    }
    self.heartbeat_count += 1;
    let (first_sn, _) = self.history.get_seq_num_min();
    let (last_sn, _) = self.history.get_seq_num_max();
    let first_sn = if first_sn.is_unknown() { SequenceNumber::from(1) } else { first_sn };
    let last_sn = if last_sn.is_unknown() { SequenceNumber::ZERO } else { last_sn };
    self
      .proxies
      .keys()
      .map(|remote| OutgoingSubmessage::Heartbeat {
        to: *remote,
        body: Heartbeat {
          reader_id: crate::structure::guid::EntityId::UNKNOWN,
          writer_id: self.endpoint.guid.entity_id,
          first_sn,
          last_sn,
          count: self.heartbeat_count,
        },
      })
      .collect()
  }

  /// Applies an ACKNACK from `remote_reader_guid`. Stale (`count` not
  /// greater than the proxy's last recorded count) is ignored. Requested
  /// sequence numbers the writer's history no longer (or never did) hold
  /// are batched into GAPs rather than left to `produce_outgoing`, since
  /// that method only ever looks at sequence numbers the proxy already
  /// tracks. A run of absent sequence numbers spanning 256 or more is split
  /// across multiple GAPs, since one `SequenceNumberSet` bitmap cannot
  /// represent a span that wide.
  pub fn handle_acknack(
    &mut self,
    remote_reader_guid: &Guid,
    reader_sn_state: &SequenceNumberSet,
    count: i32,
  ) -> Vec<OutgoingSubmessage> {
    let proxy = match self.proxies.get_mut(remote_reader_guid) {
      Some(proxy) => proxy,
      None => return Vec::new(),
    };
    if count <= proxy.last_acknack_count {
      return Vec::new();
    }
    proxy.last_acknack_count = count;
    let requested = reader_sn_state.sequence_numbers();
    let max = requested.iter().copied().max().unwrap_or(reader_sn_state.base).max(reader_sn_state.base);
    proxy.apply_acknack(reader_sn_state.base, &requested, max);

    // `requested` is ascending (it comes straight off the bitmap), so a
    // single forward pass groups it into runs that each fit in one GAP.
    let absent = requested.into_iter().filter(|seq| self.history.get_change(*seq, Guid::UNKNOWN).is_none());
    let mut groups: Vec<Vec<SequenceNumber>> = Vec::new();
    for seq in absent {
      match groups.last_mut() {
        Some(group) if i64::from(seq) - i64::from(group[0]) < i64::from(MAX_BITS) => group.push(seq),
        _ => groups.push(vec![seq]),
      }
    }

    groups
      .into_iter()
      .map(|members| {
        let gap_start = members[0];
        OutgoingSubmessage::Gap {
          to: *remote_reader_guid,
          body: Gap {
            reader_id: crate::structure::guid::EntityId::UNKNOWN,
            writer_id: self.endpoint.guid.entity_id,
            gap_start,
            gap_list: SequenceNumberSet::from_sequence_numbers(gap_start, &members),
          },
        }
      })
      .collect()
  }

  pub fn proxy(&self, remote_reader_guid: &Guid) -> Option<&ReaderProxy> {
    self.proxies.get(remote_reader_guid)
  }
}
