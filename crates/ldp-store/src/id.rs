use std::sync::atomic::{AtomicU64, Ordering};

use ldp_types::{normalize, Identifier};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Process-wide count of suppliers ever created.
static INSTANCES: AtomicU64 = AtomicU64::new(0);

/// Generates identifiers of the form `{base}{discriminator}/{counter}`.
///
/// Every generated identifier is already in normalized form, so it is the
/// same key the services store it under.
///
/// The discriminator combines a process-wide instance number with a UUID v7,
/// so two suppliers never share one, inside a process or across processes.
/// The counter is a per-supplier atomic, so concurrent callers never observe
/// the same value.
pub struct IdentifierSupplier {
    root: Identifier,
    counter: AtomicU64,
}

impl IdentifierSupplier {
    /// Create a supplier rooted at `base`.
    ///
    /// `base` must not contain a fragment: normalization would drop
    /// everything after the `#`, counter included.
    pub fn new(base: &str) -> StoreResult<Self> {
        if base.contains('#') {
            return Err(StoreError::Config(format!(
                "base {base:?} must not contain a fragment"
            )));
        }
        let instance = INSTANCES.fetch_add(1, Ordering::Relaxed);
        let discriminator = format!("{}{instance:x}", Uuid::now_v7().simple());
        // Normalized before the separator is appended, so only the scheme changes.
        let root = normalize(&Identifier::new(format!("{base}{discriminator}"))?)
            .with_trailing_slash();
        Ok(Self {
            root,
            counter: AtomicU64::new(0),
        })
    }

    /// The common prefix of every identifier this supplier produces.
    pub fn root(&self) -> &Identifier {
        &self.root
    }

    /// The next unused identifier.
    pub fn next_identifier(&self) -> Identifier {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        self.root.with_suffix(n)
    }

    /// How many identifiers have been handed out.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for IdentifierSupplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentifierSupplier")
            .field("root", &self.root)
            .field("issued", &self.issued())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn identifiers_share_root() {
        let ids = IdentifierSupplier::new("ldp:data/").unwrap();
        let a = ids.next_identifier();
        assert!(a.as_str().starts_with("ldp:data/"));
        assert!(a.as_str().starts_with(ids.root().as_str()));
        assert!(a.as_str().ends_with("/0"));
        assert_eq!(ids.issued(), 1);
    }

    #[test]
    fn suppliers_never_collide() {
        let a = IdentifierSupplier::new("ldp:data/").unwrap();
        let b = IdentifierSupplier::new("ldp:data/").unwrap();
        assert_ne!(a.root(), b.root());
        assert_ne!(a.next_identifier(), b.next_identifier());
    }

    #[test]
    fn invalid_base_is_rejected() {
        assert!(IdentifierSupplier::new("bad base/").is_err());
    }

    #[test]
    fn fragment_in_base_is_rejected() {
        let err = IdentifierSupplier::new("http://example.org/res#").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn generated_identifiers_are_normalized() {
        let ids = IdentifierSupplier::new("LDP:Data/").unwrap();
        assert!(ids.root().as_str().starts_with("ldp:Data/"));
        assert!(ids.root().as_str().ends_with('/'));
        for _ in 0..3 {
            let id = ids.next_identifier();
            assert_eq!(normalize(&id), id);
        }
    }

    #[test]
    fn concurrent_generation_is_unique() {
        let ids = Arc::new(IdentifierSupplier::new("ldp:data/").unwrap());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                thread::spawn(move || (0..500).map(|_| ids.next_identifier()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().expect("thread should not panic") {
                assert!(seen.insert(id), "duplicate identifier");
            }
        }
        assert_eq!(seen.len(), 4000);
        assert_eq!(ids.issued(), 4000);
    }
}
