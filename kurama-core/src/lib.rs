//! # Kurama Core Library
//!
//! The two stateful subsystems behind the Kurama conversational agent:
//!
//! - **Record store** ([`RecordStore`]): a growable, in-memory log of tagged,
//!   typed, timestamped records with recall by tag, by type and by recency,
//!   deletion by tag, and age-based expiry.
//! - **Processor registry** ([`ProcessorRegistry`]): a bounded set of named,
//!   typed, activatable processors. A dispatch runs the first active
//!   processor of the requested kind and returns its derived text.
//!
//! Both are plain values owned by the caller. Neither locks internally; an
//! embedder sharing them across threads wraps each in its own mutex.
//!
//! ```
//! use kurama_core::{ProcessorKind, ProcessorRegistry, RecordStore, RecordType};
//!
//! let mut store = RecordStore::new();
//! let mut registry = ProcessorRegistry::new();
//! registry.load_defaults().expect("stock processors fit");
//!
//! let input = "why do you cry?";
//! store.save(input, "conversation", RecordType::Conversation, 3).expect("saved");
//! let mood = registry.dispatch(input, ProcessorKind::Emotion);
//! assert_eq!(mood.as_deref(), Some("[Processing with empathy]"));
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod expiry;
pub mod processor;
pub mod store;
pub mod types;

pub use config::KuramaConfig;
pub use error::KuramaError;
pub use processor::{Capability, Processor, ProcessorHooks, ProcessorRegistry};
pub use store::{Record, RecordStore};
pub use types::*;
