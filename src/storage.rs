use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::RtpsError;
use crate::structure::guid::Guid;
use crate::structure::sequence_number::SequenceNumber;

/// Persistence hook for durability kinds above `VOLATILE`. The core never
/// implements a real backend; `MemoryPayloadStorage` is the only concrete
/// type it ships, useful for tests and as a default for non-persistent use.
pub trait PayloadStorage: Send + Sync {
  fn save(&self, persistence_guid: Guid, sequence_number: SequenceNumber, bytes: Vec<u8>) -> Result<(), RtpsError>;

  fn load(&self, persistence_guid: Guid, sequence_number: SequenceNumber) -> Result<Option<Vec<u8>>, RtpsError>;

  fn erase(&self, persistence_guid: Guid, sequence_number: SequenceNumber) -> Result<(), RtpsError>;
}

#[derive(Default)]
pub struct MemoryPayloadStorage {
  entries: Mutex<HashMap<(Guid, SequenceNumber), Vec<u8>>>,
}

impl MemoryPayloadStorage {
  pub fn new() -> MemoryPayloadStorage {
    MemoryPayloadStorage::default()
  }
}

impl PayloadStorage for MemoryPayloadStorage {
  fn save(&self, persistence_guid: Guid, sequence_number: SequenceNumber, bytes: Vec<u8>) -> Result<(), RtpsError> {
    self
      .entries
      .lock()
      .expect("MemoryPayloadStorage mutex poisoned")
      .insert((persistence_guid, sequence_number), bytes);
    Ok(())
  }

  fn load(&self, persistence_guid: Guid, sequence_number: SequenceNumber) -> Result<Option<Vec<u8>>, RtpsError> {
    Ok(
      self
        .entries
        .lock()
        .expect("MemoryPayloadStorage mutex poisoned")
        .get(&(persistence_guid, sequence_number))
        .cloned(),
    )
  }

  fn erase(&self, persistence_guid: Guid, sequence_number: SequenceNumber) -> Result<(), RtpsError> {
    self
      .entries
      .lock()
      .expect("MemoryPayloadStorage mutex poisoned")
      .remove(&(persistence_guid, sequence_number));
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn save_then_load_then_erase() {
    let storage = MemoryPayloadStorage::new();
    let guid = Guid::UNKNOWN;
    let seq = SequenceNumber::from(1);
    storage.save(guid, seq, vec![1, 2, 3]).unwrap();
    assert_eq!(storage.load(guid, seq).unwrap(), Some(vec![1, 2, 3]));
    storage.erase(guid, seq).unwrap();
    assert_eq!(storage.load(guid, seq).unwrap(), None);
  }
}
