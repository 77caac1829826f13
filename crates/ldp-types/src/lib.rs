//! Foundation types for the in-memory LDP resource store.
//!
//! This crate provides the identifier, RDF, and metadata types shared by the
//! binary and resource services in `ldp-store`.
//!
//! # Key Types
//!
//! - [`Identifier`] — Opaque resource name, canonicalized by [`normalize`]
//! - [`InteractionModel`] — LDP resource classification
//! - [`Term`], [`Quad`], [`Dataset`] — Opaque RDF statements and sets of them
//! - [`Metadata`] — What a caller declares when writing a resource
//! - [`BinaryMetadata`] — Descriptor of a binary payload

pub mod error;
pub mod identifier;
pub mod metadata;
pub mod model;
pub mod rdf;
pub mod vocab;

pub use error::TypeError;
pub use identifier::{normalize, Identifier};
pub use metadata::{BinaryMetadata, BinaryMetadataBuilder, Metadata, MetadataBuilder};
pub use model::InteractionModel;
pub use rdf::{Dataset, Quad, Term};
