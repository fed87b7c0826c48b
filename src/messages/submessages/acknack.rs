use enumflags2::bitflags;
use speedy::{Readable, Writable};

use crate::structure::guid::EntityId;
use crate::structure::sequence_number_set::SequenceNumberSet;

#[bitflags]
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AckNackFlags {
  Endianness = 0b0001,
  /// Set when this ACKNACK is not soliciting a response (a pure ACK).
  Final = 0b0010,
}

/// Reports which sequence numbers the reader still wants (`reader_sn_state`)
/// from `writer_id`. `count` lets the writer discard a duplicate/stale
/// ACKNACK it has already acted on.
#[derive(Clone, Debug, PartialEq, Readable, Writable)]
pub struct AckNack {
  pub reader_id: EntityId,
  pub writer_id: EntityId,
  pub reader_sn_state: SequenceNumberSet,
  pub count: i32,
}
