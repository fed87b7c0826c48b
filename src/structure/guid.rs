use speedy::{Readable, Writable};
use std::fmt;

/// Shared by all entities of one participant. `UNKNOWN` is the all-zero value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Readable, Writable)]
pub struct GuidPrefix {
  pub bytes: [u8; 12],
}

impl GuidPrefix {
  pub const UNKNOWN: GuidPrefix = GuidPrefix { bytes: [0; 12] };

  pub fn new(bytes: &[u8]) -> GuidPrefix {
    let mut b = [0u8; 12];
    b[..bytes.len().min(12)].copy_from_slice(&bytes[..bytes.len().min(12)]);
    GuidPrefix { bytes: b }
  }
}

impl Default for GuidPrefix {
  fn default() -> Self {
    GuidPrefix::UNKNOWN
  }
}

impl fmt::Debug for GuidPrefix {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "GuidPrefix({:02x?})", self.bytes)
  }
}

/// Entity kind is encoded in the low byte of an `EntityId`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum EntityKind {
  WriterWithKeyUserDefined = 0x02,
  WriterNoKeyUserDefined = 0x03,
  ReaderNoKeyUserDefined = 0x04,
  ReaderWithKeyUserDefined = 0x07,
  WriterWithKeyBuiltin = 0xC2,
  WriterNoKeyBuiltin = 0xC3,
  ReaderNoKeyBuiltin = 0xC4,
  ReaderWithKeyBuiltin = 0xC7,
  Unknown = 0x00,
}

impl From<u8> for EntityKind {
  fn from(v: u8) -> Self {
    match v {
      0x02 => EntityKind::WriterWithKeyUserDefined,
      0x03 => EntityKind::WriterNoKeyUserDefined,
      0x04 => EntityKind::ReaderNoKeyUserDefined,
      0x07 => EntityKind::ReaderWithKeyUserDefined,
      0xC2 => EntityKind::WriterWithKeyBuiltin,
      0xC3 => EntityKind::WriterNoKeyBuiltin,
      0xC4 => EntityKind::ReaderNoKeyBuiltin,
      0xC7 => EntityKind::ReaderWithKeyBuiltin,
      _ => EntityKind::Unknown,
    }
  }
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Readable, Writable)]
pub struct EntityId {
  pub entity_key: [u8; 3],
  pub entity_kind: u8,
}

impl EntityId {
  pub const UNKNOWN: EntityId = EntityId {
    entity_key: [0; 3],
    entity_kind: 0,
  };

  pub const SPDP_BUILTIN_PARTICIPANT_WRITER: EntityId = EntityId {
    entity_key: [0, 1, 0],
    entity_kind: 0xC2,
  };
  pub const SPDP_BUILTIN_PARTICIPANT_READER: EntityId = EntityId {
    entity_key: [0, 1, 0],
    entity_kind: 0xC7,
  };
  pub const P2P_BUILTIN_PARTICIPANT_STATELESS_WRITER: EntityId = EntityId {
    entity_key: [0, 2, 0],
    entity_kind: 0xC3,
  };
  pub const P2P_BUILTIN_PARTICIPANT_STATELESS_READER: EntityId = EntityId {
    entity_key: [0, 2, 0],
    entity_kind: 0xC4,
  };

  pub fn new(entity_key: [u8; 3], kind: EntityKind) -> EntityId {
    EntityId {
      entity_key,
      entity_kind: kind as u8,
    }
  }

  pub fn kind(&self) -> EntityKind {
    EntityKind::from(self.entity_kind)
  }

  pub fn is_writer(&self) -> bool {
    matches!(
      self.kind(),
      EntityKind::WriterWithKeyUserDefined
        | EntityKind::WriterNoKeyUserDefined
        | EntityKind::WriterWithKeyBuiltin
        | EntityKind::WriterNoKeyBuiltin
    )
  }

  pub fn is_reader(&self) -> bool {
    matches!(
      self.kind(),
      EntityKind::ReaderWithKeyUserDefined
        | EntityKind::ReaderNoKeyUserDefined
        | EntityKind::ReaderWithKeyBuiltin
        | EntityKind::ReaderNoKeyBuiltin
    )
  }
}

impl Default for EntityId {
  fn default() -> Self {
    EntityId::UNKNOWN
  }
}

impl fmt::Debug for EntityId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "EntityId({:02x?}, kind={:?})",
      self.entity_key,
      self.kind()
    )
  }
}

/// (GuidPrefix, EntityId). Value type, totally ordered lexicographically.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Readable, Writable)]
pub struct Guid {
  pub prefix: GuidPrefix,
  pub entity_id: EntityId,
}

impl Guid {
  pub const UNKNOWN: Guid = Guid {
    prefix: GuidPrefix::UNKNOWN,
    entity_id: EntityId::UNKNOWN,
  };

  pub fn new(prefix: GuidPrefix, entity_id: EntityId) -> Guid {
    Guid { prefix, entity_id }
  }
}

impl Default for Guid {
  fn default() -> Self {
    Guid::UNKNOWN
  }
}
