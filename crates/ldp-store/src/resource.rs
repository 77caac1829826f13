//! In-memory resource store.
//!
//! [`InMemoryResourceService`] keeps three independently sharded indexes:
//!
//! - `records`: identifier → `ResourceRecord`, the primary state
//! - `containment`: container → identifiers it directly contains
//! - `audit`: identifier → accumulated audit quads
//!
//! No operation locks more than one index at a time. `get` merges the three
//! views when it builds a [`Resource`], so a reader may briefly see a new
//! child in a container before (or after) the child's own record.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use ldp_types::{
    normalize, vocab, BinaryMetadata, Dataset, Identifier, InteractionModel, Metadata, Quad,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::id::IdentifierSupplier;
use crate::shard::ShardedMap;
use crate::traits::ResourceService;

/// The stored state of one resource.
#[derive(Clone, Debug, PartialEq, Eq)]
struct ResourceRecord {
    metadata: Metadata,
    modified: DateTime<Utc>,
    dataset: Dataset,
}

/// A read-only view of a resource.
///
/// The dataset holds the stored graph plus the resource's audit statements
/// and one synthesized `ldp:contains` statement per contained resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    metadata: Metadata,
    modified: DateTime<Utc>,
    dataset: Dataset,
}

impl Resource {
    pub fn identifier(&self) -> &Identifier {
        &self.metadata.identifier
    }

    pub fn interaction_model(&self) -> InteractionModel {
        self.metadata.interaction_model
    }

    /// The parent container, if one was declared.
    pub fn container(&self) -> Option<&Identifier> {
        self.metadata.container.as_ref()
    }

    /// Last modification time.
    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    pub fn binary_metadata(&self) -> Option<&BinaryMetadata> {
        self.metadata.binary.as_ref()
    }

    pub fn membership_resource(&self) -> Option<&Identifier> {
        self.metadata.membership_resource.as_ref()
    }

    pub fn member_relation(&self) -> Option<&Identifier> {
        self.metadata.member_relation.as_ref()
    }

    pub fn member_of_relation(&self) -> Option<&Identifier> {
        self.metadata.member_of_relation.as_ref()
    }

    pub fn inserted_content_relation(&self) -> Option<&Identifier> {
        self.metadata.inserted_content_relation.as_ref()
    }

    pub fn revision(&self) -> Option<&str> {
        self.metadata.revision.as_deref()
    }

    /// Named graphs declared as holding extra metadata.
    pub fn metadata_graph_names(&self) -> &BTreeSet<Identifier> {
        &self.metadata.metadata_graph_names
    }

    /// Returns `true` if `graph` was declared as a metadata graph.
    pub fn has_metadata(&self, graph: &Identifier) -> bool {
        self.metadata.metadata_graph_names.contains(graph)
    }

    /// The full metadata the resource was written with (normalized).
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Every quad of the resource, including audit and containment.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Quads of a single named graph.
    pub fn stream<'a>(&'a self, graph: &Identifier) -> impl Iterator<Item = &'a Quad> + 'a {
        self.dataset.graph(graph)
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }
}

/// Outcome of [`ResourceService::get`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResourceLookup {
    Present(Resource),
    /// No resource is stored under the identifier.
    Missing,
}

impl ResourceLookup {
    pub fn is_present(&self) -> bool {
        matches!(self, ResourceLookup::Present(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ResourceLookup::Missing)
    }

    pub fn resource(&self) -> Option<&Resource> {
        match self {
            ResourceLookup::Present(r) => Some(r),
            ResourceLookup::Missing => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            ResourceLookup::Present(r) => Some(r),
            ResourceLookup::Missing => None,
        }
    }
}

impl From<Option<Resource>> for ResourceLookup {
    fn from(value: Option<Resource>) -> Self {
        value.map_or(ResourceLookup::Missing, ResourceLookup::Present)
    }
}

/// Sharded in-memory implementation of [`ResourceService`].
pub struct InMemoryResourceService {
    records: ShardedMap<Identifier, ResourceRecord>,
    containment: ShardedMap<Identifier, BTreeSet<Identifier>>,
    audit: ShardedMap<Identifier, Dataset>,
    supported: BTreeSet<InteractionModel>,
    ids: IdentifierSupplier,
    contains: Identifier,
    containment_graph: Identifier,
}

impl InMemoryResourceService {
    /// Create an empty service with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
            .expect("default store configuration is valid")
    }

    /// Create an empty service from a configuration.
    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let ids = IdentifierSupplier::new(&config.base)?;
        let supported: BTreeSet<_> = config.interaction_models.iter().copied().collect();
        info!(
            root = %ids.root(),
            shards = config.shards,
            models = supported.len(),
            "resource service created"
        );
        Ok(Self {
            records: ShardedMap::new(config.shards),
            containment: ShardedMap::new(config.shards),
            audit: ShardedMap::new(config.shards),
            supported,
            ids,
            contains: Identifier::from_static(vocab::LDP_CONTAINS),
            containment_graph: Identifier::from_static(vocab::PREFER_CONTAINMENT),
        })
    }

    /// Number of resources currently stored.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Identifiers directly contained by `container`.
    pub fn contained(&self, container: &Identifier) -> BTreeSet<Identifier> {
        self.containment
            .get_cloned(&normalize(container))
            .unwrap_or_default()
    }

    /// The read-time view: stored graph, then audit, then containment.
    fn assemble(&self, id: &Identifier, record: ResourceRecord) -> Resource {
        let mut dataset = record.dataset;

        self.audit.read(id, |audit| {
            if let Some(audit) = audit {
                dataset.extend(audit.iter().cloned());
            }
        });

        let subject = id.with_trailing_slash();
        self.containment.read(id, |members| {
            for member in members.into_iter().flatten() {
                dataset.insert(Quad::in_graph(
                    self.containment_graph.clone(),
                    subject.clone(),
                    self.contains.clone(),
                    member.clone(),
                ));
            }
        });

        Resource {
            metadata: record.metadata,
            modified: record.modified,
            dataset,
        }
    }
}

/// Normalize the keys a record is stored and indexed under.
fn normalize_metadata(metadata: &Metadata) -> Metadata {
    Metadata {
        identifier: normalize(&metadata.identifier),
        container: metadata.container.as_ref().map(normalize),
        ..metadata.clone()
    }
}

impl Default for InMemoryResourceService {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceService for InMemoryResourceService {
    fn get(&self, id: &Identifier) -> ResourceLookup {
        let key = normalize(id);
        self.records
            .get_cloned(&key)
            .map(|record| self.assemble(&key, record))
            .into()
    }

    fn replace(&self, metadata: &Metadata, dataset: Dataset) -> StoreResult<()> {
        let metadata = normalize_metadata(metadata);
        let key = metadata.identifier.clone();
        let container = metadata.container.clone();

        let record = ResourceRecord {
            metadata,
            modified: Utc::now(),
            dataset,
        };
        self.records.insert(key.clone(), record);

        if let Some(container) = container {
            self.containment
                .upsert(container.clone(), BTreeSet::new, |members| {
                    members.insert(key.clone())
                });
            debug!(id = %key, container = %container, "resource replaced");
        } else {
            debug!(id = %key, "resource replaced");
        }
        Ok(())
    }

    fn delete(&self, metadata: &Metadata) -> StoreResult<()> {
        let metadata = normalize_metadata(metadata);
        let key = &metadata.identifier;

        let existed = self.records.remove(key).is_some();

        if let Some(container) = &metadata.container {
            self.containment.update_or_remove(container, |members| {
                members.remove(key);
                !members.is_empty()
            });
        }
        debug!(id = %key, existed, "resource deleted");
        Ok(())
    }

    fn add(&self, id: &Identifier, dataset: Dataset) -> StoreResult<()> {
        let key = normalize(id);
        let added = dataset.len();
        self.audit
            .upsert(key.clone(), Dataset::new, |audit| audit.merge(dataset));
        debug!(id = %key, quads = added, "audit appended");
        Ok(())
    }

    fn touch(&self, id: &Identifier) -> StoreResult<()> {
        let key = normalize(id);
        match self.records.update(&key, |record| record.modified = Utc::now()) {
            Some(()) => {
                debug!(id = %key, "resource touched");
                Ok(())
            }
            None => {
                warn!(id = %key, "touch on missing resource");
                Err(StoreError::NotFound(key))
            }
        }
    }

    fn supported_interaction_models(&self) -> &BTreeSet<InteractionModel> {
        &self.supported
    }

    fn generate_identifier(&self) -> Identifier {
        self.ids.next_identifier()
    }
}

impl std::fmt::Debug for InMemoryResourceService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryResourceService")
            .field("resource_count", &self.len())
            .field("containers", &self.containment.len())
            .field("audited", &self.audit.len())
            .field("root", self.ids.root())
            .finish()
    }
}
