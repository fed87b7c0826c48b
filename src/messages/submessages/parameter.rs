use speedy::{Context, Readable, Reader, Writable, Writer};

use crate::structure::parameter_id::ParameterId;

/// One (pid, length, value) entry of a `ParameterList`. `value` never
/// includes the padding bytes; those are reconstructed on write from
/// `value.len()` rounded up to a 4-byte boundary.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Parameter {
  pub pid: ParameterId,
  pub value: Vec<u8>,
}

impl Parameter {
  pub fn new(pid: ParameterId, value: Vec<u8>) -> Parameter {
    Parameter { pid, value }
  }

  pub fn new_sentinel() -> Parameter {
    Parameter {
      pid: ParameterId::PID_SENTINEL,
      value: Vec::new(),
    }
  }

  pub fn is_sentinel(&self) -> bool {
    self.pid == ParameterId::PID_SENTINEL
  }

  fn padded_len(&self) -> usize {
    (self.value.len() + 3) & !3
  }
}

impl<'a, C: Context> Readable<'a, C> for Parameter {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let pid = ParameterId(reader.read_u16()?);
    let length = reader.read_u16()? as usize;
    let value = reader.read_vec(length)?;
    let padding = (4 - (length % 4)) % 4;
    for _ in 0..padding {
      let _ = reader.read_u8()?;
    }
    Ok(Parameter { pid, value })
  }

  #[inline]
  fn minimum_bytes_needed() -> usize {
    4
  }
}

impl<C: Context> Writable<C> for Parameter {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    let padded = self.padded_len();
    writer.write_u16(self.pid.0)?;
    writer.write_u16(self.value.len() as u16)?;
    writer.write_bytes(&self.value)?;
    for _ in self.value.len()..padded {
      writer.write_u8(0)?;
    }
    Ok(())
  }
}
