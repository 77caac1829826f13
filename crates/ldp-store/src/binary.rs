//! In-memory binary store.
//!
//! [`InMemoryBinaryService`] keeps each payload as an immutable [`Bytes`]
//! value inside a [`ShardedMap`]. Writes buffer the whole source first and
//! then swap the entry in a single insert, so a reader never sees a partial
//! payload and a failed read leaves the old payload in place.

use std::io::Read;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use ldp_types::{normalize, BinaryMetadata, Identifier};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::id::IdentifierSupplier;
use crate::shard::ShardedMap;
use crate::traits::BinaryService;

/// A stored binary payload and its descriptor.
///
/// Cloning is cheap: the content is reference counted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binary {
    metadata: BinaryMetadata,
    content: Bytes,
    stored_at: DateTime<Utc>,
}

impl Binary {
    pub fn identifier(&self) -> &Identifier {
        &self.metadata.identifier
    }

    pub fn metadata(&self) -> &BinaryMetadata {
        &self.metadata
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.metadata.mime_type.as_deref()
    }

    /// When this content was written.
    pub fn stored_at(&self) -> DateTime<Utc> {
        self.stored_at
    }

    /// The full payload.
    pub fn content(&self) -> Bytes {
        self.content.clone()
    }

    /// Bytes `from..=to` of the payload.
    ///
    /// Both offsets are inclusive. `from > to` or `to` past the end is
    /// [`StoreError::RangeOutOfBounds`]; offsets are never clamped.
    pub fn range(&self, from: usize, to: usize) -> StoreResult<Bytes> {
        if from > to || to >= self.content.len() {
            return Err(StoreError::RangeOutOfBounds {
                id: self.metadata.identifier.clone(),
                from,
                to,
                len: self.content.len(),
            });
        }
        Ok(self.content.slice(from..=to))
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Sharded in-memory implementation of [`BinaryService`].
pub struct InMemoryBinaryService {
    binaries: ShardedMap<Identifier, Binary>,
    ids: IdentifierSupplier,
}

impl InMemoryBinaryService {
    /// Create an empty service with the default configuration.
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
            .expect("default store configuration is valid")
    }

    /// Create an empty service from a configuration.
    pub fn with_config(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        let ids = IdentifierSupplier::new(&config.base)?;
        info!(root = %ids.root(), shards = config.shards, "binary service created");
        Ok(Self {
            binaries: ShardedMap::new(config.shards),
            ids,
        })
    }

    /// Number of binaries currently stored.
    pub fn len(&self) -> usize {
        self.binaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.binaries.is_empty()
    }

    /// Total bytes across all stored binaries.
    pub fn total_bytes(&self) -> u64 {
        self.binaries
            .fold(0u64, |acc, _, binary| acc + binary.len() as u64)
    }
}

impl Default for InMemoryBinaryService {
    fn default() -> Self {
        Self::new()
    }
}

impl BinaryService for InMemoryBinaryService {
    fn get(&self, id: &Identifier) -> Option<Binary> {
        self.binaries.get_cloned(&normalize(id))
    }

    fn set_content(&self, metadata: &BinaryMetadata, source: &mut dyn Read) -> StoreResult<()> {
        let key = normalize(&metadata.identifier);

        let mut buf = Vec::new();
        if let Err(e) = source.read_to_end(&mut buf) {
            warn!(id = %key, error = %e, "failed to read binary content");
            return Err(StoreError::Io(e));
        }

        let binary = Binary {
            metadata: BinaryMetadata {
                identifier: key.clone(),
                ..metadata.clone()
            },
            content: Bytes::from(buf),
            stored_at: Utc::now(),
        };
        debug!(id = %key, len = binary.len(), "binary content stored");
        self.binaries.insert(key, binary);
        Ok(())
    }

    fn purge_content(&self, id: &Identifier) -> StoreResult<()> {
        let key = normalize(id);
        if self.binaries.remove(&key).is_some() {
            debug!(id = %key, "binary content purged");
        }
        Ok(())
    }

    fn generate_identifier(&self) -> Identifier {
        self.ids.next_identifier()
    }
}

impl std::fmt::Debug for InMemoryBinaryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBinaryService")
            .field("binary_count", &self.len())
            .field("root", self.ids.root())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;
    use std::thread;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn meta(s: &str) -> BinaryMetadata {
        BinaryMetadata::builder(id(s)).build()
    }

    fn store(service: &InMemoryBinaryService, s: &str, content: &[u8]) {
        service
            .set_content(&meta(s), &mut io::Cursor::new(content.to_vec()))
            .unwrap();
    }

    /// Yields some bytes, then fails.
    struct FailingReader {
        sent: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.sent {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "source closed"));
            }
            self.sent = true;
            buf[..3].copy_from_slice(b"par");
            Ok(3)
        }
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn get_missing_returns_none() {
        let service = InMemoryBinaryService::new();
        assert!(service.get(&id("ldp:bin/nope")).is_none());
    }

    #[test]
    fn set_and_get_content() {
        let service = InMemoryBinaryService::new();
        let metadata = BinaryMetadata::builder(id("ldp:bin/b1"))
            .mime_type("text/plain")
            .build();
        service
            .set_content(&metadata, &mut io::Cursor::new(b"hello".to_vec()))
            .unwrap();

        let binary = service.get(&id("ldp:bin/b1")).expect("should exist");
        assert_eq!(binary.content(), Bytes::from_static(b"hello"));
        assert_eq!(binary.mime_type(), Some("text/plain"));
        assert_eq!(binary.len(), 5);
        assert!(binary.stored_at() <= Utc::now());
    }

    #[test]
    fn set_content_replaces_wholesale() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/b1", b"first version");
        store(&service, "ldp:bin/b1", b"v2");
        let binary = service.get(&id("ldp:bin/b1")).unwrap();
        assert_eq!(&binary.content()[..], b"v2");
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn empty_payload_is_stored() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/empty", b"");
        let binary = service.get(&id("ldp:bin/empty")).unwrap();
        assert!(binary.is_empty());
        assert!(binary.range(0, 0).is_err());
    }

    #[test]
    fn identifiers_are_normalized() {
        let service = InMemoryBinaryService::new();
        store(&service, "LDP:bin/b1/", b"x");
        let binary = service.get(&id("ldp:bin/b1#frag")).expect("normalized lookup");
        assert_eq!(binary.identifier(), &id("ldp:bin/b1"));
    }

    #[test]
    fn purge_removes_and_is_idempotent() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/b1", b"bytes");
        service.purge_content(&id("ldp:bin/b1")).unwrap();
        assert!(service.get(&id("ldp:bin/b1")).is_none());
        service.purge_content(&id("ldp:bin/b1")).unwrap();
        service.purge_content(&id("ldp:bin/never")).unwrap();
        assert!(service.is_empty());
    }

    // -----------------------------------------------------------------------
    // Ranged reads
    // -----------------------------------------------------------------------

    #[test]
    fn range_is_inclusive() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/b1", b"hello");
        let binary = service.get(&id("ldp:bin/b1")).unwrap();
        assert_eq!(&binary.range(0, 2).unwrap()[..], b"hel");
        assert_eq!(&binary.range(4, 4).unwrap()[..], b"o");
        assert_eq!(&binary.range(0, 4).unwrap()[..], b"hello");
    }

    #[test]
    fn range_out_of_bounds_is_error() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/b1", b"hello");
        let binary = service.get(&id("ldp:bin/b1")).unwrap();

        match binary.range(2, 5) {
            Err(StoreError::RangeOutOfBounds { from, to, len, .. }) => {
                assert_eq!((from, to, len), (2, 5, 5));
            }
            other => panic!("expected RangeOutOfBounds, got {other:?}"),
        }
        assert!(binary.range(3, 1).is_err());
    }

    // -----------------------------------------------------------------------
    // Failed writes
    // -----------------------------------------------------------------------

    #[test]
    fn failed_read_leaves_prior_content() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/b1", b"original");

        let err = service
            .set_content(&meta("ldp:bin/b1"), &mut FailingReader { sent: false })
            .unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        let binary = service.get(&id("ldp:bin/b1")).unwrap();
        assert_eq!(&binary.content()[..], b"original");
    }

    #[test]
    fn failed_first_write_stores_nothing() {
        let service = InMemoryBinaryService::new();
        assert!(service
            .set_content(&meta("ldp:bin/b2"), &mut FailingReader { sent: false })
            .is_err());
        assert!(service.get(&id("ldp:bin/b2")).is_none());
    }

    // -----------------------------------------------------------------------
    // Identifiers, utilities, concurrency
    // -----------------------------------------------------------------------

    #[test]
    fn generated_identifiers_are_distinct() {
        let service = InMemoryBinaryService::new();
        let a = service.generate_identifier();
        let b = service.generate_identifier();
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ldp:data/"));
    }

    #[test]
    fn custom_base_is_used() {
        let config = StoreConfig {
            base: "http://localhost/bin/".into(),
            ..StoreConfig::default()
        };
        let service = InMemoryBinaryService::with_config(&config).unwrap();
        assert!(service
            .generate_identifier()
            .as_str()
            .starts_with("http://localhost/bin/"));
    }

    #[test]
    fn total_bytes() {
        let service = InMemoryBinaryService::new();
        store(&service, "ldp:bin/a", b"12345");
        store(&service, "ldp:bin/b", b"123456789");
        assert_eq!(service.total_bytes(), 14);
    }

    #[test]
    fn concurrent_writers_leave_one_whole_payload() {
        let service = Arc::new(InMemoryBinaryService::new());
        let handles: Vec<_> = (0..8u8)
            .map(|t| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let payload = vec![t; 1024];
                    service
                        .set_content(&meta("ldp:bin/shared"), &mut io::Cursor::new(payload))
                        .unwrap();
                })
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let content = service.get(&id("ldp:bin/shared")).unwrap().content();
        assert_eq!(content.len(), 1024);
        assert!(content.iter().all(|b| *b == content[0]));
    }

    #[test]
    fn debug_format() {
        let service = InMemoryBinaryService::new();
        let debug = format!("{service:?}");
        assert!(debug.contains("InMemoryBinaryService"));
        assert!(debug.contains("binary_count"));
    }
}
