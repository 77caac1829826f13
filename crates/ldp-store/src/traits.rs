use std::collections::BTreeSet;
use std::io::Read;

use ldp_types::{BinaryMetadata, Dataset, Identifier, InteractionModel, Metadata};

use crate::binary::Binary;
use crate::error::StoreResult;
use crate::resource::ResourceLookup;

/// Storage for opaque byte payloads.
///
/// All implementations must satisfy these invariants:
/// - Identifiers are normalized before use as keys.
/// - A payload is replaced as a whole; readers see either the old bytes or
///   the new bytes, never a mix.
/// - A failed write leaves the previous payload in place.
pub trait BinaryService: Send + Sync {
    /// Read a binary by identifier. Returns `None` if it does not exist.
    fn get(&self, id: &Identifier) -> Option<Binary>;

    /// Drain `source` and store its bytes under `metadata.identifier`,
    /// replacing any previous content.
    ///
    /// Returns `Err` if `source` cannot be read to the end; nothing is
    /// stored in that case.
    fn set_content(&self, metadata: &BinaryMetadata, source: &mut dyn Read) -> StoreResult<()>;

    /// Remove a binary. Removing an absent identifier is a no-op.
    fn purge_content(&self, id: &Identifier) -> StoreResult<()>;

    /// A new identifier, never returned before by this service.
    fn generate_identifier(&self) -> Identifier;
}

/// Storage for resource records with derived containment and audit indexes.
///
/// All implementations must satisfy these invariants:
/// - Identifiers and container references are normalized before use.
/// - Containment and audit statements are merged into a resource's dataset
///   when it is read, never stored with the record.
/// - Audit data only grows; deleting a resource keeps it.
/// - Deletion does not cascade to contained resources.
pub trait ResourceService: Send + Sync {
    /// Read a resource. Absence is reported as [`ResourceLookup::Missing`].
    fn get(&self, id: &Identifier) -> ResourceLookup;

    /// Store a resource, overwriting any existing record (last writer wins),
    /// and register it with its declared container.
    fn replace(&self, metadata: &Metadata, dataset: Dataset) -> StoreResult<()>;

    /// Store a new resource.
    ///
    /// Default implementation calls `replace()`. Backends that distinguish
    /// creation from replacement may override.
    fn create(&self, metadata: &Metadata, dataset: Dataset) -> StoreResult<()> {
        self.replace(metadata, dataset)
    }

    /// Remove a resource and unregister it from its declared container.
    fn delete(&self, metadata: &Metadata) -> StoreResult<()>;

    /// Append audit statements for `id`.
    fn add(&self, id: &Identifier, dataset: Dataset) -> StoreResult<()>;

    /// Refresh the modification time of an existing resource.
    ///
    /// Returns [`StoreError::NotFound`](crate::StoreError::NotFound) if the
    /// resource does not exist.
    fn touch(&self, id: &Identifier) -> StoreResult<()>;

    /// The interaction models this service accepts.
    fn supported_interaction_models(&self) -> &BTreeSet<InteractionModel>;

    /// A new identifier, never returned before by this service.
    fn generate_identifier(&self) -> Identifier;
}
