use bit_set::BitSet;
use bit_vec::BitVec;
use speedy::{Context, Readable, Reader, Writable, Writer};
use std::ops::{Deref, DerefMut};

/// A `BitSet` with the RTPS wire encoding: a `u32` bit count followed by
/// `ceil(count / 32)` `u32` words, each word carrying its bits MSB-first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSetRef {
  set: BitSet,
  bit_count: u32,
}

impl BitSetRef {
  pub fn new(bit_count: u32) -> BitSetRef {
    BitSetRef {
      set: BitSet::with_capacity(bit_count as usize),
      bit_count,
    }
  }

  pub fn bit_count(&self) -> u32 {
    self.bit_count
  }

  pub fn into_bit_set(self) -> BitSet {
    self.set
  }
}

impl Deref for BitSetRef {
  type Target = BitSet;
  fn deref(&self) -> &BitSet {
    &self.set
  }
}

impl DerefMut for BitSetRef {
  fn deref_mut(&mut self) -> &mut BitSet {
    &mut self.set
  }
}

impl<'a, C: Context> Readable<'a, C> for BitSetRef {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let bit_count = reader.read_u32()?;
    let num_words = (bit_count as usize + 31) / 32;
    let mut bit_vec = BitVec::from_elem(num_words * 32, false);
    for word_index in 0..num_words {
      let word = reader.read_u32()?;
      for bit_in_word in 0..32 {
        // MSB-first within the word.
        if (word >> (31 - bit_in_word)) & 1 == 1 {
          bit_vec.set(word_index * 32 + bit_in_word, true);
        }
      }
    }
    Ok(BitSetRef {
      set: BitSet::from_bit_vec(bit_vec),
      bit_count,
    })
  }

  #[inline]
  fn minimum_bytes_needed() -> usize {
    4
  }
}

impl<C: Context> Writable<C> for BitSetRef {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    writer.write_u32(self.bit_count)?;
    let num_words = (self.bit_count as usize + 31) / 32;
    for word_index in 0..num_words {
      let mut word: u32 = 0;
      for bit_in_word in 0..32 {
        let bit = word_index * 32 + bit_in_word;
        if bit < self.bit_count as usize && self.set.contains(bit) {
          word |= 1 << (31 - bit_in_word);
        }
      }
      writer.write_u32(word)?;
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use speedy::{Endianness, Readable, Writable};

  #[test]
  fn empty_set_encodes_zero_count() {
    let set = BitSetRef::new(0);
    let bytes = set.write_to_vec_with_ctx(Endianness::LittleEndian).unwrap();
    assert_eq!(bytes, [0x00, 0x00, 0x00, 0x00]);
  }

  #[test]
  fn roundtrip_with_scattered_bits() {
    let mut set = BitSetRef::new(40);
    set.insert(0);
    set.insert(7);
    set.insert(39);
    for endian in [Endianness::LittleEndian, Endianness::BigEndian] {
      let bytes = set.write_to_vec_with_ctx(endian).unwrap();
      let back = BitSetRef::read_from_buffer_with_ctx(endian, &bytes).unwrap();
      assert_eq!(set, back);
      assert!(back.contains(0));
      assert!(back.contains(7));
      assert!(back.contains(39));
      assert!(!back.contains(1));
    }
  }
}
