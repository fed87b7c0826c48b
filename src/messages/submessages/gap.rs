use speedy::{Readable, Writable};

use crate::structure::guid::EntityId;
use crate::structure::sequence_number::SequenceNumber;
use crate::structure::sequence_number_set::SequenceNumberSet;

/// All sequence numbers in `[gap_start, gap_list.base)` plus every bit set
/// in `gap_list` are irrelevant (the writer will never send them).
#[derive(Clone, Debug, PartialEq, Readable, Writable)]
pub struct Gap {
  pub reader_id: EntityId,
  pub writer_id: EntityId,
  pub gap_start: SequenceNumber,
  pub gap_list: SequenceNumberSet,
}
