use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::identifier::Identifier;
use crate::model::InteractionModel;

/// Descriptor of a binary payload attached to a non-RDF resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryMetadata {
    /// Key under which the bytes live in the binary store.
    pub identifier: Identifier,
    /// MIME type, if known.
    pub mime_type: Option<String>,
    /// Free-form hints for the storage backend (e.g. digest algorithms).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub hints: BTreeMap<String, Vec<String>>,
}

impl BinaryMetadata {
    pub fn builder(identifier: Identifier) -> BinaryMetadataBuilder {
        BinaryMetadataBuilder {
            inner: BinaryMetadata {
                identifier,
                mime_type: None,
                hints: BTreeMap::new(),
            },
        }
    }
}

/// Builder for [`BinaryMetadata`].
#[derive(Debug)]
pub struct BinaryMetadataBuilder {
    inner: BinaryMetadata,
}

impl BinaryMetadataBuilder {
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.inner.mime_type = Some(mime_type.into());
        self
    }

    /// Add a value to the hint `key`.
    pub fn hint(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner
            .hints
            .entry(key.into())
            .or_default()
            .push(value.into());
        self
    }

    pub fn build(self) -> BinaryMetadata {
        self.inner
    }
}

/// Everything a caller declares about a resource when writing or deleting it.
///
/// The store interprets only `identifier`, `interaction_model`, `container`
/// and `binary`. The membership fields, `revision` and
/// `metadata_graph_names` are carried through to the stored record unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub identifier: Identifier,
    pub interaction_model: InteractionModel,
    /// Parent container, by identifier.
    pub container: Option<Identifier>,
    pub membership_resource: Option<Identifier>,
    pub member_relation: Option<Identifier>,
    pub member_of_relation: Option<Identifier>,
    pub inserted_content_relation: Option<Identifier>,
    pub binary: Option<BinaryMetadata>,
    /// Opaque revision tag supplied by the caller (e.g. an ETag seed).
    pub revision: Option<String>,
    /// Named graphs holding extra metadata (e.g. an ACL graph).
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub metadata_graph_names: BTreeSet<Identifier>,
}

impl Metadata {
    /// Start building metadata for `identifier`. The interaction model
    /// defaults to [`InteractionModel::RdfSource`].
    pub fn builder(identifier: Identifier) -> MetadataBuilder {
        MetadataBuilder {
            inner: Metadata {
                identifier,
                interaction_model: InteractionModel::RdfSource,
                container: None,
                membership_resource: None,
                member_relation: None,
                member_of_relation: None,
                inserted_content_relation: None,
                binary: None,
                revision: None,
                metadata_graph_names: BTreeSet::new(),
            },
        }
    }
}

/// Builder for [`Metadata`].
#[derive(Debug)]
pub struct MetadataBuilder {
    inner: Metadata,
}

impl MetadataBuilder {
    pub fn interaction_model(mut self, model: InteractionModel) -> Self {
        self.inner.interaction_model = model;
        self
    }

    pub fn container(mut self, container: Identifier) -> Self {
        self.inner.container = Some(container);
        self
    }

    pub fn membership_resource(mut self, resource: Identifier) -> Self {
        self.inner.membership_resource = Some(resource);
        self
    }

    pub fn member_relation(mut self, relation: Identifier) -> Self {
        self.inner.member_relation = Some(relation);
        self
    }

    pub fn member_of_relation(mut self, relation: Identifier) -> Self {
        self.inner.member_of_relation = Some(relation);
        self
    }

    pub fn inserted_content_relation(mut self, relation: Identifier) -> Self {
        self.inner.inserted_content_relation = Some(relation);
        self
    }

    /// Attach a binary descriptor. Does not change the interaction model.
    pub fn binary(mut self, binary: BinaryMetadata) -> Self {
        self.inner.binary = Some(binary);
        self
    }

    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.inner.revision = Some(revision.into());
        self
    }

    pub fn metadata_graph_name(mut self, graph: Identifier) -> Self {
        self.inner.metadata_graph_names.insert(graph);
        self
    }

    pub fn build(self) -> Metadata {
        self.inner
    }
}
