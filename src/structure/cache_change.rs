use crate::structure::guid::Guid;
use crate::structure::instance_handle::InstanceHandle;
use crate::structure::parameter_id::ParameterId;
use crate::structure::sequence_number::SequenceNumber;
use crate::structure::time::Timestamp;

use crate::messages::submessages::parameter::Parameter;
use crate::messages::submessages::parameter_list::ParameterList;
use crate::messages::submessages::serialized_payload::SerializedPayload;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ChangeKind {
  Alive,
  NotAliveDisposed,
  NotAliveUnregistered,
  NotAliveDisposedUnregistered,
}

impl ChangeKind {
  /// Low two bits of `PID_STATUS_INFO`'s last byte (RTPS spec table 9.13).
  pub fn status_info_byte(&self) -> u8 {
    match self {
      ChangeKind::Alive => 0x00,
      ChangeKind::NotAliveDisposed => 0x01,
      ChangeKind::NotAliveUnregistered => 0x02,
      ChangeKind::NotAliveDisposedUnregistered => 0x03,
    }
  }

  pub fn from_status_info_byte(byte: u8) -> ChangeKind {
    match byte & 0x03 {
      0x01 => ChangeKind::NotAliveDisposed,
      0x02 => ChangeKind::NotAliveUnregistered,
      0x03 => ChangeKind::NotAliveDisposedUnregistered,
      _ => ChangeKind::Alive,
    }
  }
}

/// One sample produced by a writer or received by a reader. Lives in exactly
/// one `HistoryCache` at a time; while there, its sequence number is unique
/// within that history and, for a writer's own history, equals the writer's
/// `last_change_seq` at the moment it was inserted.
#[derive(Clone, Debug)]
pub struct CacheChange {
  pub kind: ChangeKind,
  pub writer_guid: Guid,
  pub instance_handle: InstanceHandle,
  pub sequence_number: SequenceNumber,
  pub source_timestamp: Timestamp,
  pub serialized_payload: SerializedPayload,
  pub inline_qos: Option<ParameterList>,
}

impl CacheChange {
  pub fn new(kind: ChangeKind, writer_guid: Guid, serialized_payload: SerializedPayload) -> CacheChange {
    CacheChange {
      kind,
      writer_guid,
      instance_handle: InstanceHandle::default(),
      sequence_number: SequenceNumber::UNKNOWN,
      source_timestamp: Timestamp::INVALID,
      serialized_payload,
      inline_qos: None,
    }
  }

  /// A dispose/unregister notice: no data payload, just the instance's key
  /// hash and a status-info parameter carrying `kind`. `kind` must not be
  /// `Alive`.
  pub fn new_key_only(kind: ChangeKind, writer_guid: Guid, key_hash: [u8; 16]) -> CacheChange {
    let mut qos = ParameterList::new();
    qos.push(Parameter::new(ParameterId::PID_KEY_HASH, key_hash.to_vec()));
    qos.push(Parameter::new(ParameterId::PID_STATUS_INFO, vec![0, 0, 0, kind.status_info_byte()]));
    let mut change = CacheChange::new(kind, writer_guid, SerializedPayload::default());
    change.instance_handle = InstanceHandle::from_bytes(key_hash);
    change.inline_qos = Some(qos);
    change
  }
}
