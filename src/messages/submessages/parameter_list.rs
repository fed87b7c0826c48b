use speedy::{Context, Endianness, Readable, Reader, Writable, Writer};

use crate::messages::submessages::parameter::Parameter;
use crate::structure::parameter_id::ParameterId;

/// Inline QoS / discovery parameters, PID-sentinel terminated. Unknown PIDs
/// are kept as raw bytes rather than rejected.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct ParameterList {
  parameters: Vec<Parameter>,
}

impl ParameterList {
  pub fn new() -> ParameterList {
    ParameterList { parameters: Vec::new() }
  }

  pub fn push(&mut self, parameter: Parameter) {
    self.parameters.push(parameter);
  }

  pub fn get(&self, pid: ParameterId) -> Option<&Parameter> {
    self.parameters.iter().find(|p| p.pid == pid)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
    self.parameters.iter()
  }

  /// Parses a `ParameterList` out of the front of `bytes`, returning it
  /// together with the number of bytes consumed (header through sentinel
  /// inclusive), so the caller can locate what follows in a larger buffer
  /// without re-serializing.
  pub fn read_with_consumed(bytes: &[u8], endianness: Endianness) -> Result<(ParameterList, usize), speedy::Error> {
    let mut parameters = Vec::new();
    let mut pos = 0;
    loop {
      if bytes.len() < pos + 4 {
        return Err(speedy::Error::custom("ParameterList truncated"));
      }
      let pid = ParameterId(match endianness {
        Endianness::LittleEndian => u16::from_le_bytes([bytes[pos], bytes[pos + 1]]),
        Endianness::BigEndian => u16::from_be_bytes([bytes[pos], bytes[pos + 1]]),
      });
      let length = match endianness {
        Endianness::LittleEndian => u16::from_le_bytes([bytes[pos + 2], bytes[pos + 3]]),
        Endianness::BigEndian => u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]),
      } as usize;
      pos += 4;
      if bytes.len() < pos + length {
        return Err(speedy::Error::custom("ParameterList value truncated"));
      }
      let value = bytes[pos..pos + length].to_vec();
      pos += length;
      let padding = (4 - (length % 4)) % 4;
      if bytes.len() < pos + padding {
        return Err(speedy::Error::custom("ParameterList padding truncated"));
      }
      pos += padding;
      if pid == ParameterId::PID_PAD {
        continue;
      }
      if pid == ParameterId::PID_SENTINEL {
        break;
      }
      parameters.push(Parameter::new(pid, value));
    }
    Ok((ParameterList { parameters }, pos))
  }
}

impl<'a, C: Context> Readable<'a, C> for ParameterList {
  #[inline]
  fn read_from<R: Reader<'a, C>>(reader: &mut R) -> Result<Self, C::Error> {
    let mut parameters = Vec::new();
    loop {
      let parameter: Parameter = reader.read_value()?;
      if parameter.pid == ParameterId::PID_PAD {
        continue;
      }
      if parameter.pid == ParameterId::PID_SENTINEL {
        break;
      }
      parameters.push(parameter);
    }
    Ok(ParameterList { parameters })
  }
}

impl<C: Context> Writable<C> for ParameterList {
  #[inline]
  fn write_to<T: ?Sized + Writer<C>>(&self, writer: &mut T) -> Result<(), C::Error> {
    for parameter in &self.parameters {
      writer.write_value(parameter)?;
    }
    writer.write_value(&Parameter::new_sentinel())?;
    Ok(())
  }
}
