//! Concurrent in-memory stores for Linked-Data-Platform resources.
//!
//! This crate holds resource records and binary payloads for the lifetime of
//! the process. It stands in for a persistent backend so protocol-level
//! behavior can be exercised without a database.
//!
//! # Services
//!
//! - [`InMemoryBinaryService`] -- immutable byte payloads with ranged reads
//! - [`InMemoryResourceService`] -- resource records with a containment index
//!   and an append-only audit index
//!
//! Both implement their service trait ([`BinaryService`],
//! [`ResourceService`]) and can be built from a [`StoreConfig`].
//!
//! # Design Rules
//!
//! 1. Every identifier is normalized before it is used as a key.
//! 2. Containment and audit statements are merged into a resource on read,
//!    never copied into the stored record.
//! 3. Each index is a [`ShardedMap`]; no operation locks two indexes at once.
//! 4. Single-identifier operations are linearizable; operations on different
//!    identifiers carry no ordering guarantee.
//! 5. Audit data only grows.
//! 6. Every failure is returned to the caller; nothing is retried.

pub mod binary;
pub mod config;
pub mod error;
pub mod id;
pub mod resource;
pub mod shard;
pub mod traits;

pub use binary::{Binary, InMemoryBinaryService};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use id::IdentifierSupplier;
pub use resource::{InMemoryResourceService, Resource, ResourceLookup};
pub use shard::ShardedMap;
pub use traits::{BinaryService, ResourceService};
