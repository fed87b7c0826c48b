use std::collections::BTreeMap;

use log::{debug, trace, warn};

use crate::dds::stateful_reader::StatefulReader;
use crate::dds::stateful_writer::StatefulWriter;
use crate::dds::stateless_reader::StatelessReader;
use crate::dds::stateless_writer::StatelessWriter;
use crate::error::RtpsError;
use crate::messages::message::{Message, SubmessageBody};
use crate::messages::protocol_version::ProtocolVersion;
use crate::messages::vendor_id::VendorId;
use crate::messages::submessages::parameter_list::ParameterList;
use crate::structure::cache_change::{CacheChange, ChangeKind};
use crate::structure::guid::{EntityId, Guid, GuidPrefix};
use crate::structure::locator::LocatorList;
use crate::structure::parameter_id::ParameterId;
use crate::structure::time::Timestamp;

/// `PID_STATUS_INFO`'s value is 4 bytes; the low two bits of the last byte
/// are the disposed/unregistered flags (RTPS spec table 9.13).
fn change_kind_from_inline_qos(inline_qos: Option<&ParameterList>) -> ChangeKind {
  match inline_qos.and_then(|qos| qos.get(ParameterId::PID_STATUS_INFO)) {
    Some(p) if p.value.len() >= 4 => ChangeKind::from_status_info_byte(p.value[3]),
    _ => ChangeKind::Alive,
  }
}

pub enum LocalReader {
  Stateless(StatelessReader),
  Stateful(StatefulReader),
}

pub enum LocalWriter {
  Stateless(StatelessWriter),
  Stateful(StatefulWriter),
}

/// Per-datagram interpreter state: reset at the start of every `handle_message`
/// call and updated by INFO_TS / INFO_SRC / INFO_DST as they're encountered,
/// exactly as RTPS defines submessage interpretation to be stateful within
/// one message but not across messages.
struct InterpreterState {
  source_guid_prefix: GuidPrefix,
  source_version: ProtocolVersion,
  source_vendor_id: VendorId,
  dest_guid_prefix: GuidPrefix,
  timestamp: Option<Timestamp>,
  unicast_reply_locators: LocatorList,
  multicast_reply_locators: LocatorList,
}

impl InterpreterState {
  fn new(header_guid_prefix: GuidPrefix) -> InterpreterState {
    InterpreterState {
      source_guid_prefix: header_guid_prefix,
      source_version: ProtocolVersion::THIS_IMPLEMENTATION,
      source_vendor_id: VendorId::VENDOR_UNKNOWN,
      dest_guid_prefix: GuidPrefix::UNKNOWN,
      timestamp: None,
      unicast_reply_locators: Vec::new(),
      multicast_reply_locators: Vec::new(),
    }
  }
}

/// Demultiplexes inbound RTPS datagrams to the local readers/writers they
/// address. Holds no transport socket itself; the caller hands it raw bytes
/// and gets back which local endpoint(s) were touched.
pub struct MessageReceiver {
  pub own_guid_prefix: GuidPrefix,
  pub readers: BTreeMap<EntityId, LocalReader>,
  pub writers: BTreeMap<EntityId, LocalWriter>,
}

impl MessageReceiver {
  pub fn new(own_guid_prefix: GuidPrefix) -> MessageReceiver {
    MessageReceiver {
      own_guid_prefix,
      readers: BTreeMap::new(),
      writers: BTreeMap::new(),
    }
  }

  pub fn handle_datagram(&mut self, bytes: &[u8]) -> Result<(), RtpsError> {
    let message = Message::read_from_buffer(bytes)?;
    let mut state = InterpreterState::new(message.header.guid_prefix);

    for submessage in &message.submessages {
      match &submessage.body {
        SubmessageBody::InfoTs(info_ts) => {
          state.timestamp = info_ts.timestamp;
        }
        SubmessageBody::InfoSrc(info_src) => {
          state.source_guid_prefix = info_src.guid_prefix;
          state.source_version = info_src.protocol_version;
          state.source_vendor_id = info_src.vendor_id;
        }
        SubmessageBody::InfoDst(info_dst) => {
          state.dest_guid_prefix = info_dst.guid_prefix;
        }
        SubmessageBody::Pad | SubmessageBody::Unknown(_) => {}
        SubmessageBody::Data(_) | SubmessageBody::Heartbeat(_) | SubmessageBody::Gap(_) | SubmessageBody::AckNack(_) => {
          if state.dest_guid_prefix != GuidPrefix::UNKNOWN && state.dest_guid_prefix != self.own_guid_prefix {
            trace!("dropping submessage addressed to another participant");
            continue;
          }
          self.dispatch(&state, submessage)?;
        }
      }
    }
    Ok(())
  }

  fn dispatch(
    &mut self,
    state: &InterpreterState,
    submessage: &crate::messages::message::Submessage,
  ) -> Result<(), RtpsError> {
    match &submessage.body {
      SubmessageBody::Data(data) => {
        let writer_guid = Guid::new(state.source_guid_prefix, data.writer_id);
        let kind = change_kind_from_inline_qos(data.inline_qos.as_ref());
        let mut change = CacheChange::new(
          kind,
          writer_guid,
          data.serialized_payload.clone().unwrap_or_default(),
        );
        change.sequence_number = data.writer_sn;
        change.inline_qos = data.inline_qos.clone();
        if let Some(ts) = state.timestamp {
          change.source_timestamp = ts;
        }

        if data.reader_id == EntityId::UNKNOWN {
          for reader in self.readers.values_mut() {
            deliver_data(reader, writer_guid, change.clone());
          }
        } else if let Some(reader) = self.readers.get_mut(&data.reader_id) {
          deliver_data(reader, writer_guid, change);
        } else {
          debug!("DATA for unknown local reader {:?}", data.reader_id);
        }
        Ok(())
      }
      SubmessageBody::Heartbeat(hb) => {
        let writer_guid = Guid::new(state.source_guid_prefix, hb.writer_id);
        if hb.reader_id == EntityId::UNKNOWN {
          for reader in self.readers.values_mut() {
            if let LocalReader::Stateful(r) = reader {
              r.receive_heartbeat(&writer_guid, hb.first_sn, hb.last_sn, hb.count);
            }
          }
        } else if let Some(LocalReader::Stateful(r)) = self.readers.get_mut(&hb.reader_id) {
          r.receive_heartbeat(&writer_guid, hb.first_sn, hb.last_sn, hb.count);
        }
        Ok(())
      }
      SubmessageBody::Gap(gap) => {
        let writer_guid = Guid::new(state.source_guid_prefix, gap.writer_id);
        if gap.reader_id == EntityId::UNKNOWN {
          for reader in self.readers.values_mut() {
            if let LocalReader::Stateful(r) = reader {
              r.receive_gap(&writer_guid, gap.gap_start, &gap.gap_list);
            }
          }
        } else if let Some(LocalReader::Stateful(r)) = self.readers.get_mut(&gap.reader_id) {
          r.receive_gap(&writer_guid, gap.gap_start, &gap.gap_list);
        }
        Ok(())
      }
      SubmessageBody::AckNack(an) => {
        let reader_guid = Guid::new(state.source_guid_prefix, an.reader_id);
        match self.writers.get_mut(&an.writer_id) {
          Some(LocalWriter::Stateful(w)) => {
            w.handle_acknack(&reader_guid, &an.reader_sn_state, an.count);
            Ok(())
          }
          Some(LocalWriter::Stateless(_)) => Ok(()),
          None => {
            warn!("ACKNACK for unknown local writer {:?}", an.writer_id);
            Ok(())
          }
        }
      }
      _ => Ok(()),
    }
  }
}

fn deliver_data(reader: &mut LocalReader, writer_guid: Guid, change: CacheChange) {
  match reader {
    LocalReader::Stateless(r) => {
      r.receive_data(change);
    }
    LocalReader::Stateful(r) => {
      r.receive_data(writer_guid, change);
    }
  }
}
