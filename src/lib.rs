//! Lazy sequences with restartable traversal, eager materialization and an
//! incremental cache, plus the scenarios that contrast them.

pub mod cached;
pub mod config;
pub mod demos;
pub mod error;
pub mod lazy_sequence;
pub mod materialized;
pub mod observer;

pub use cached::CachedSequence;
pub use error::{ConfigError, Error, SequenceError};
pub use lazy_sequence::{LazySequence, Producer, Step, Traversal, TraversalState};
pub use materialized::MaterializedSequence;
pub use observer::{ConsoleSink, EventLog, Observer};
