use pretty_assertions::assert_eq;

use rtps_core::config::{Durability, EndpointConfig, ReaderConfig, WriterConfig};
use rtps_core::dds::stateful_reader::StatefulReader;
use rtps_core::dds::stateful_writer::{OutgoingSubmessage, StatefulWriter};
use rtps_core::dds::stateless_reader::StatelessReader;
use rtps_core::dds::stateless_writer::StatelessWriter;
use rtps_core::error::RtpsError;
use rtps_core::messages::header::Header;
use rtps_core::messages::message::{Message, Submessage, SubmessageBody};
use rtps_core::messages::submessage::{SubmessageHeader, SubmessageKind};
use rtps_core::messages::submessages::representation_identifier::RepresentationIdentifier;
use rtps_core::rtps::message_receiver::{LocalReader, MessageReceiver};
use rtps_core::structure::cache_change::ChangeKind;
use rtps_core::structure::guid::{EntityId, EntityKind, Guid, GuidPrefix};
use rtps_core::structure::locator::Locator;
use rtps_core::structure::parameter_id::ParameterId;
use rtps_core::structure::sequence_number::SequenceNumber;

fn writer_guid() -> Guid {
  Guid::new(
    GuidPrefix::new(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C]),
    EntityId::new([0, 0, 2], EntityKind::WriterWithKeyUserDefined),
  )
}

fn reader_entity() -> EntityId {
  EntityId::new([0, 0, 1], EntityKind::ReaderWithKeyUserDefined)
}

fn wrap(source_prefix: GuidPrefix, kind: SubmessageKind, flags: u8, body: SubmessageBody) -> Vec<u8> {
  let message = Message {
    header: Header::new(source_prefix),
    submessages: vec![Submessage {
      header: SubmessageHeader {
        kind,
        flags,
        content_length: 0,
      },
      body,
    }],
  };
  message.write_to_vec().unwrap()
}

/// Scenario 1: best-effort send, single packet (spec.md §8.1).
#[test]
fn best_effort_send_delivers_three_changes_in_order() {
  let w_guid = writer_guid();
  let mut writer = StatelessWriter::new(w_guid, WriterConfig::default());
  let locator = Locator::from_ipv4([127, 0, 0, 1], 7400);
  writer.reader_locator_add(locator, false);

  writer.write(b"A".to_vec()).unwrap();
  writer.write(b"B".to_vec()).unwrap();
  writer.write(b"C".to_vec()).unwrap();

  let mut reader = StatelessReader::new(Guid::UNKNOWN, ReaderConfig::default());
  for (_, change) in writer.drain_unsent() {
    reader.receive_data(change);
  }

  assert_eq!(reader.history.len(), 3);
  for (i, payload) in [b"A".as_slice(), b"B", b"C"].iter().enumerate() {
    let change = reader
      .history
      .get_change(SequenceNumber::from(i as i64 + 1), w_guid)
      .unwrap();
    assert_eq!(&change.serialized_payload.data, payload);
  }
}

/// Scenario 2: reliable with loss and heartbeat-driven repair (spec.md §8.2).
#[test]
fn reliable_repair_via_heartbeat_and_acknack() {
  let own_prefix = GuidPrefix::new(&[2; 12]);
  let w_guid = writer_guid();
  let r_entity = reader_entity();
  let r_guid = Guid::new(own_prefix, r_entity);

  let mut writer = StatefulWriter::new(w_guid, WriterConfig::default());
  writer.matched_reader_add(r_guid, vec![], vec![], false);
  writer.write(b"A".to_vec()).unwrap();
  writer.write(b"B".to_vec()).unwrap();
  writer.write(b"C".to_vec()).unwrap();

  let mut mr = MessageReceiver::new(own_prefix);
  mr.readers.insert(
    r_entity,
    LocalReader::Stateful(StatefulReader::new(r_guid, ReaderConfig::default())),
  );
  if let Some(LocalReader::Stateful(reader)) = mr.readers.get_mut(&r_entity) {
    reader.matched_writer_add(w_guid, vec![], vec![]);
  }

  // First round: DATA 1, 2, 3 sent, but DATA 2 is dropped by the transport.
  for outgoing in writer.produce_outgoing() {
    if let OutgoingSubmessage::Data { body, .. } = outgoing {
      if body.writer_sn == SequenceNumber::from(2) {
        continue;
      }
      let flags = 0x01 | body.flags().bits();
      let bytes = wrap(w_guid.prefix, SubmessageKind::Data, flags, SubmessageBody::Data(body));
      mr.handle_datagram(&bytes).unwrap();
    }
  }

  let heartbeats = writer.produce_heartbeats();
  assert_eq!(heartbeats.len(), 1);
  let OutgoingSubmessage::Heartbeat { body: hb, .. } = &heartbeats[0] else {
    panic!("expected heartbeat")
  };
  assert_eq!(hb.first_sn, SequenceNumber::from(1));
  assert_eq!(hb.last_sn, SequenceNumber::from(3));
  assert_eq!(hb.count, 1);
  let bytes = wrap(w_guid.prefix, SubmessageKind::Heartbeat, 0x01, SubmessageBody::Heartbeat(hb.clone()));
  mr.handle_datagram(&bytes).unwrap();

  let LocalReader::Stateful(reader) = mr.readers.get_mut(&r_entity).unwrap() else {
    panic!("expected stateful reader")
  };
  let acks = reader.produce_acknacks();
  assert_eq!(acks.len(), 1);
  let (to, ack) = &acks[0];
  assert_eq!(*to, w_guid);
  assert_eq!(ack.count, 1);
  assert_eq!(ack.reader_sn_state.base, SequenceNumber::from(1));
  assert_eq!(ack.reader_sn_state.sequence_numbers(), vec![SequenceNumber::from(2)]);

  let outgoing = writer.handle_acknack(&r_guid, &ack.reader_sn_state, ack.count);
  assert!(outgoing.is_empty(), "seq 2 is still in history, no GAP expected");

  let repaired: Vec<_> = writer.produce_outgoing();
  assert_eq!(repaired.len(), 1);
  let OutgoingSubmessage::Data { body, .. } = &repaired[0] else {
    panic!("expected DATA 2 retransmission")
  };
  assert_eq!(body.writer_sn, SequenceNumber::from(2));
  let flags = 0x01 | body.flags().bits();
  let bytes = wrap(w_guid.prefix, SubmessageKind::Data, flags, SubmessageBody::Data(body.clone()));
  mr.handle_datagram(&bytes).unwrap();

  let LocalReader::Stateful(reader) = mr.readers.get_mut(&r_entity).unwrap() else {
    panic!("expected stateful reader")
  };
  assert_eq!(reader.history.len(), 3);
  let final_acks = reader.produce_acknacks();
  assert_eq!(final_acks.len(), 1);
  let (_, final_ack) = &final_acks[0];
  assert_eq!(final_ack.count, 2);
  assert_eq!(final_ack.reader_sn_state.base, SequenceNumber::from(4));
  assert!(final_ack.reader_sn_state.sequence_numbers().is_empty());
}

/// Scenario 3: GAP compaction for a late-matched reader requesting a sparse
/// writer history (spec.md §8.3).
#[test]
fn gap_batches_every_missing_sequence_into_one_submessage() {
  let w_guid = writer_guid();
  let r_guid = Guid::new(GuidPrefix::new(&[9; 12]), EntityId::UNKNOWN);
  let mut writer = StatefulWriter::new(w_guid, WriterConfig::default());

  let present: [i64; 7] = [5, 8, 11, 13, 14, 15, 20];
  for _ in 1..=20 {
    writer.write(b"x".to_vec()).unwrap();
  }
  for seq in 1i64..=20 {
    if !present.contains(&seq) {
      writer.history.remove_change(SequenceNumber::from(seq), w_guid);
    }
  }
  writer.matched_reader_add(r_guid, vec![], vec![], false);

  let missing: Vec<SequenceNumber> = (5i64..=20)
    .filter(|s| !present.contains(s))
    .map(SequenceNumber::from)
    .collect();
  let requested = rtps_core::structure::sequence_number_set::SequenceNumberSet::from_sequence_numbers(
    SequenceNumber::from(5),
    &missing,
  );
  let outgoing = writer.handle_acknack(&r_guid, &requested, 1);

  assert_eq!(outgoing.len(), 1);
  let OutgoingSubmessage::Gap { body, .. } = &outgoing[0] else {
    panic!("expected a single GAP")
  };
  assert_eq!(body.gap_start, SequenceNumber::from(6));
  let mut gap_members = body.gap_list.sequence_numbers();
  gap_members.sort();
  assert_eq!(
    gap_members,
    vec![6, 7, 9, 10, 12, 16, 17, 18, 19].into_iter().map(SequenceNumber::from).collect::<Vec<_>>()
  );
}

/// Scenario 4: inline QoS with key hash on a disposed change (spec.md §8.4).
/// Exercises the writer's own dispose path end to end, not a hand-built
/// `Data` value, so the flag computation and the producer stay honest.
#[test]
fn disposed_change_carries_key_hash_and_status_info_inline_qos() {
  let key_hash = [7u8; 16];
  let w_guid = writer_guid();
  let r_guid = Guid::new(GuidPrefix::new(&[8; 12]), EntityId::UNKNOWN);

  let mut writer = StatefulWriter::new(w_guid, WriterConfig::default());
  writer.matched_reader_add(r_guid, vec![], vec![], false);
  assert_eq!(writer.dispose(key_hash), Some(SequenceNumber::from(1)));
  assert_eq!(writer.history.get_change(SequenceNumber::from(1), w_guid).unwrap().kind, ChangeKind::NotAliveDisposed);

  let outgoing = writer.produce_outgoing();
  assert_eq!(outgoing.len(), 1);
  let OutgoingSubmessage::Data { body: data, .. } = &outgoing[0] else {
    panic!("expected a DATA submessage")
  };
  assert!(data.serialized_payload.is_none());

  let flags = data.flags();
  assert!(flags.contains(rtps_core::messages::submessages::data::DataFlags::InlineQos));
  assert!(!flags.contains(rtps_core::messages::submessages::data::DataFlags::Data));
  assert!(flags.contains(rtps_core::messages::submessages::data::DataFlags::Key));

  let bytes = data.write_to_vec(speedy::Endianness::LittleEndian).unwrap();
  let back = rtps_core::messages::submessages::data::Data::parse(&bytes, flags, speedy::Endianness::LittleEndian).unwrap();
  assert!(back.serialized_payload.is_none());
  let inline_qos = back.inline_qos.unwrap();
  assert_eq!(
    inline_qos.get(ParameterId::PID_KEY_HASH).unwrap().value,
    key_hash.to_vec()
  );
  assert_eq!(
    inline_qos.get(ParameterId::PID_STATUS_INFO).unwrap().value,
    vec![0x00, 0x00, 0x00, 0x01]
  );
}

/// A reader late-matching a writer whose ACKNACK-requested range of never
/// written sequence numbers spans more than 256 — too wide for one
/// `SequenceNumberSet` bitmap — gets that range split across multiple GAPs,
/// none of which silently drops a member past a 256-bit clamp.
#[test]
fn gap_batching_splits_spans_wider_than_256_into_multiple_gaps() {
  let w_guid = writer_guid();
  let r_guid = Guid::new(GuidPrefix::new(&[10; 12]), EntityId::UNKNOWN);
  let mut writer = StatefulWriter::new(w_guid, WriterConfig::default());
  writer.matched_reader_add(r_guid, vec![], vec![], false);

  let missing: Vec<SequenceNumber> = (1i64..=300).map(SequenceNumber::from).collect();
  let requested = rtps_core::structure::sequence_number_set::SequenceNumberSet::from_sequence_numbers(
    SequenceNumber::from(1),
    &missing,
  );
  let outgoing = writer.handle_acknack(&r_guid, &requested, 1);

  assert_eq!(outgoing.len(), 2, "a 300-wide span must split into two GAPs");
  let mut seen = Vec::new();
  for submessage in &outgoing {
    let OutgoingSubmessage::Gap { body, .. } = submessage else {
      panic!("expected only GAPs")
    };
    seen.extend(body.gap_list.sequence_numbers());
  }
  seen.sort();
  assert_eq!(seen, missing, "every requested sequence number must appear in some GAP, none dropped");
}

/// Scenario 5: duplicate suppression (spec.md §8.5).
#[test]
fn duplicate_data_does_not_change_history_or_require_an_acknack() {
  let own_prefix = GuidPrefix::new(&[3; 12]);
  let w_guid = Guid::new(GuidPrefix::new(&[5; 12]), EntityId::UNKNOWN);
  let mut reader = StatelessReader::new(Guid::new(own_prefix, reader_entity()), ReaderConfig::default());

  let mut make_change = || {
    let mut c = rtps_core::structure::cache_change::CacheChange::new(
      ChangeKind::Alive,
      w_guid,
      rtps_core::messages::submessages::serialized_payload::SerializedPayload::new(RepresentationIdentifier::CdrLe, b"X".to_vec()),
    );
    c.sequence_number = SequenceNumber::from(42);
    c
  };

  assert!(reader.receive_data(make_change()));
  assert!(!reader.receive_data(make_change()));
  assert_eq!(reader.history.len(), 1);
}

/// Scenario 6: history-full refusal (spec.md §8.6).
#[test]
fn history_full_refuses_the_fourth_write() {
  let config = WriterConfig {
    endpoint: EndpointConfig {
      history_max_size: 3,
      durability: Durability::Volatile,
      ..EndpointConfig::default()
    },
    ..WriterConfig::default()
  };
  let mut writer = StatelessWriter::new(writer_guid(), config);

  assert_eq!(writer.write(b"1".to_vec()), Some(SequenceNumber::from(1)));
  assert_eq!(writer.write(b"2".to_vec()), Some(SequenceNumber::from(2)));
  assert_eq!(writer.write(b"3".to_vec()), Some(SequenceNumber::from(3)));
  assert_eq!(writer.write(b"4".to_vec()), None);
  assert_eq!(writer.history.len(), 3);
}

#[test]
fn acknack_is_rejected_when_its_count_does_not_exceed_what_the_writer_already_saw() {
  let w_guid = writer_guid();
  let r_guid = Guid::new(GuidPrefix::new(&[6; 12]), EntityId::UNKNOWN);
  let mut writer = StatefulWriter::new(w_guid, WriterConfig::default());
  writer.matched_reader_add(r_guid, vec![], vec![], false);
  writer.write(b"A".to_vec()).unwrap();

  let ack = rtps_core::structure::sequence_number_set::SequenceNumberSet::new(SequenceNumber::from(2));
  writer.handle_acknack(&r_guid, &ack, 5);
  assert_eq!(writer.proxy(&r_guid).unwrap().last_acknack_count, 5);

  // A stale (lower) count must not move last_acknack_count backwards.
  writer.handle_acknack(&r_guid, &ack, 1);
  assert_eq!(writer.proxy(&r_guid).unwrap().last_acknack_count, 5);
}

#[test]
fn unreachable_rtps_error_variant_is_still_exercised_by_message_parsing() {
  let err = Message::read_from_buffer(&[0u8; 4]).unwrap_err();
  assert_eq!(err, RtpsError::BufferUnderflow);
}
