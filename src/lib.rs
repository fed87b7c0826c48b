#![allow(dead_code)]

//! Core RTPS (Real-Time Publish-Subscribe) wire protocol engine.
//!
//! This crate implements the subsystem of an RTPS/DDS implementation where
//! the protocol state lives: the history cache, the stateful reliability
//! state machines (`ReaderProxy` / `WriterProxy`), the CDR wire codec, and
//! the `MessageReceiver` dispatch loop. Transport I/O, discovery, the DDS
//! application surface, persistence, and security are external
//! collaborators reached only through the traits in [`transport`],
//! [`discovery`], and [`storage`].

pub mod common;
pub mod config;
pub mod dds;
pub mod discovery;
pub mod error;
pub mod messages;
pub mod rtps;
pub mod storage;
pub mod structure;
pub mod transport;

pub use error::RtpsError;
