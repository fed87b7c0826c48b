use std::time::Duration;

/// Selects stateless-vs-stateful behavior and whether ACKNACKs are sent.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reliability {
  BestEffort,
  Reliable,
}

/// Whether newly matched readers receive historical changes; persistence
/// itself is an external collaborator (`PayloadStorage`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Durability {
  Volatile,
  TransientLocal,
  Transient,
  Persistent,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TopicKind {
  NoKey,
  WithKey,
}

/// Options shared by both writer and reader endpoints.
#[derive(Clone, Copy, Debug)]
pub struct EndpointConfig {
  pub history_max_size: usize,
  pub max_payload: usize,
  pub reliability: Reliability,
  pub durability: Durability,
  pub topic_kind: TopicKind,
}

impl Default for EndpointConfig {
  fn default() -> EndpointConfig {
    EndpointConfig {
      history_max_size: 256,
      max_payload: 64 * 1024,
      reliability: Reliability::BestEffort,
      durability: Durability::Volatile,
      topic_kind: TopicKind::WithKey,
    }
  }
}

/// Writer-only timing and delivery options.
#[derive(Clone, Copy, Debug)]
pub struct WriterConfig {
  pub endpoint: EndpointConfig,
  /// `true`: changes become UNSENT immediately on add. `false`: they start
  /// UNACKNOWLEDGED and wait for an explicit send trigger.
  pub push_mode: bool,
  pub heartbeat_period: Duration,
  pub nack_response_delay: Duration,
  pub nack_suppression_duration: Duration,
}

impl Default for WriterConfig {
  fn default() -> WriterConfig {
    WriterConfig {
      endpoint: EndpointConfig::default(),
      push_mode: true,
      heartbeat_period: Duration::from_secs(3),
      nack_response_delay: Duration::from_millis(200),
      nack_suppression_duration: Duration::from_millis(0),
    }
  }
}

/// Reader-only timing and QoS-signaling options.
#[derive(Clone, Copy, Debug)]
pub struct ReaderConfig {
  pub endpoint: EndpointConfig,
  pub heartbeat_response_delay: Duration,
  pub expects_inline_qos: bool,
}

impl Default for ReaderConfig {
  fn default() -> ReaderConfig {
    ReaderConfig {
      endpoint: EndpointConfig::default(),
      heartbeat_response_delay: Duration::from_millis(500),
      expects_inline_qos: false,
    }
  }
}
