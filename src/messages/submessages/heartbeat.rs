use enumflags2::bitflags;
use speedy::{Readable, Writable};

use crate::structure::guid::EntityId;
use crate::structure::sequence_number::SequenceNumber;

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HeartbeatFlags {
  Endianness = 0b0001,
  /// No response required unless the reader is missing changes.
  Final = 0b0010,
  Liveliness = 0b0100,
}

/// Announces the writer's `[first_sn, last_sn]` window. `count` increases
/// monotonically per writer so readers can ignore a stale retransmission.
#[derive(Clone, Copy, Debug, PartialEq, Readable, Writable)]
pub struct Heartbeat {
  pub reader_id: EntityId,
  pub writer_id: EntityId,
  pub first_sn: SequenceNumber,
  pub last_sn: SequenceNumber,
  pub count: i32,
}
