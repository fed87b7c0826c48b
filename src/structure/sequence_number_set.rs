use speedy::{Context, Readable, Reader, Writable, Writer};

use crate::common::bit_set::BitSetRef;
use crate::structure::sequence_number::SequenceNumber;

/// Maximum RTPS sequence number set span (spec mandates rejecting larger sets).
pub const MAX_BITS: u32 = 256;

/// `base` plus a bitmap of up to 256 bits; bit `i` set means sequence number
/// `base + i` is a member of the set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SequenceNumberSet {
  pub base: SequenceNumber,
  bitmap: BitSetRef,
}

impl SequenceNumberSet {
  pub fn new(base: SequenceNumber) -> SequenceNumberSet {
    SequenceNumberSet {
      base,
      bitmap: BitSetRef::new(0),
    }
  }

  pub fn from_sequence_numbers(base: SequenceNumber, members: &[SequenceNumber]) -> SequenceNumberSet {
    let base_i64: i64 = base.into();
    let max_offset = members
      .iter()
      .map(|&sn| i64::from(sn) - base_i64)
      .max()
      .unwrap_or(0)
      .max(0);
    let bit_count = (max_offset + 1).min(i64::from(MAX_BITS)) as u32;
    let mut bitmap = BitSetRef::new(bit_count);
    for &sn in members {
      let offset = i64::from(sn) - base_i64;
      if offset >= 0 && offset < i64::from(bit_count) {
        bitmap.insert(offset as usize);
      }
    }
    SequenceNumberSet { base, bitmap }
  }

  pub fn bit_count(&self) -> u32 {
    self.bitmap.bit_count()
  }

  /// The sequence numbers represented by this set, in ascending order.
  pub fn sequence_numbers(&self) -> Vec<SequenceNumber> {
    let base_i64: i64 = self.base.into();
    self
      .bitmap
      .iter()
      .map(|bit| SequenceNumber::from(base_i64 + bit as i64))
      .collect()
  }

  pub fn contains(&self, sn: SequenceNumber) -> bool {
    let offset = i64::from(sn) - i64::from(self.base);
    offset >= 0 && self.bitmap.contains(offset as usize)
  }
}

impl<'a, C: Context> Readable<'a, C> for SequenceNumberSet {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let base = reader.read_value()?;
    let bitmap: BitSetRef = reader.read_value()?;
    if bitmap.bit_count() > MAX_BITS {
      return Err(speedy::Error::custom(format!(
        "SequenceNumberSet num_bits {} exceeds {}",
        bitmap.bit_count(),
        MAX_BITS
      ))
      .into());
    }
    Ok(SequenceNumberSet { base, bitmap })
  }

  #[inline]
  fn minimum_bytes_needed() -> usize {
    <SequenceNumber as Readable<C>>::minimum_bytes_needed() + 4
  }
}

impl<C: Context> Writable<C> for SequenceNumberSet {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    writer.write_value(&self.base)?;
    writer.write_value(&self.bitmap)?;
    Ok(())
  }
}
