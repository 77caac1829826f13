//! Vocabulary IRIs used by the store.
//!
//! The LDP terms come from the W3C Linked Data Platform namespace. The graph
//! names partition a resource's dataset into the user-managed graph and the
//! graphs the store synthesizes or accumulates on its own.

/// W3C LDP namespace.
pub const LDP_NS: &str = "http://www.w3.org/ns/ldp#";

pub const LDP_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#RDFSource";
pub const LDP_NON_RDF_SOURCE: &str = "http://www.w3.org/ns/ldp#NonRDFSource";
pub const LDP_CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
pub const LDP_BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
pub const LDP_DIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#DirectContainer";
pub const LDP_INDIRECT_CONTAINER: &str = "http://www.w3.org/ns/ldp#IndirectContainer";

/// Predicate linking a container to each resource it contains.
pub const LDP_CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";

/// Graph holding statements written by clients.
pub const PREFER_USER_MANAGED: &str = "http://www.trellisldp.org/ns/trellis#PreferUserManaged";
/// Graph holding accumulated audit statements.
pub const PREFER_AUDIT: &str = "http://www.trellisldp.org/ns/trellis#PreferAudit";
/// Graph holding synthesized `ldp:contains` statements.
pub const PREFER_CONTAINMENT: &str = "http://www.trellisldp.org/ns/trellis#PreferContainment";

/// Default prefix of generated identifiers.
pub const DATA_PREFIX: &str = "ldp:data/";
