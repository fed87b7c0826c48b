use thiserror::Error;

/// Errors produced by the core. Parsing and state-machine errors are always
/// recovered at the submessage boundary (see [`crate::rtps::message_receiver`]);
/// only [`RtpsError::HistoryFull`] is meant to surface all the way to an
/// application-facing `write()` call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RtpsError {
  #[error("buffer overflow while encoding")]
  BufferOverflow,

  #[error("buffer underflow while decoding")]
  BufferUnderflow,

  #[error("invalid RTPS message: {0}")]
  InvalidMessage(String),

  #[error("malformed submessage: {0}")]
  SubmessageMalformed(String),

  #[error("history cache is full")]
  HistoryFull,

  #[error("duplicate change, already present")]
  DuplicateChange,

  #[error("stale count, ignored")]
  StaleCount,

  #[error("no matching local endpoint for entity id {0:?}")]
  UnknownEndpoint(crate::structure::guid::EntityId),

  #[error("transport error: {0}")]
  TransportError(String),
}

pub type Result<T> = std::result::Result<T, RtpsError>;
