//! Ephemeral Document Store — process-lifetime map from a generated id to
//! `{content, created_at}` with 24-hour retention.
//!
//! Exists only to bridge a single authoring session to a single QR-code
//! scan; nothing is persisted across restarts. Multi-instance deployments
//! need a real TTL-capable store behind the same trait.

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::errors::AppError;

/// How long a stored document stays retrievable. The boundary is inclusive:
/// an entry aged exactly 24h still reads; eviction is strictly older-than,
/// matching the original scheme's comparison.
fn retention() -> Duration {
    Duration::hours(24)
}

/// A stored document body and its insertion time.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Clock — injectable time source so tests can drive expiry deterministically
// ────────────────────────────────────────────────────────────────────────────

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock: wall time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The document store trait. Implement this to swap the in-memory map for a
/// TTL-capable cache without touching handler code.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
pub trait DocumentStore: Send + Sync {
    /// Stores `content` under a freshly generated id and returns the id.
    /// Empty content is rejected without mutating the store. Id collisions
    /// silently overwrite (last write wins).
    fn put(&self, content: &str) -> Result<String, AppError>;

    /// Returns the stored content for `id`, without extending its lifetime.
    /// Unknown and expired ids both read as `NotFound`. Expiry is strictly
    /// older-than the retention window; an entry aged exactly 24h still reads.
    fn get(&self, id: &str) -> Result<String, AppError>;

    /// Removes every entry older than the retention window.
    fn sweep(&self);
}

// ────────────────────────────────────────────────────────────────────────────
// InMemoryStore — default single-process implementation
// ────────────────────────────────────────────────────────────────────────────

pub struct InMemoryStore<C: Clock> {
    clock: C,
    docs: RwLock<HashMap<String, StoredDocument>>,
}

impl<C: Clock> InMemoryStore<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            docs: RwLock::new(HashMap::new()),
        }
    }

    fn sweep_locked(docs: &mut HashMap<String, StoredDocument>, now: DateTime<Utc>) {
        docs.retain(|_, doc| now - doc.created_at <= retention());
    }
}

impl<C: Clock> DocumentStore for InMemoryStore<C> {
    fn put(&self, content: &str) -> Result<String, AppError> {
        if content.is_empty() {
            return Err(AppError::Validation("Content is required".to_string()));
        }

        let now = self.clock.now();
        let id = generate_id();

        let mut docs = self.docs.write().expect("document store lock poisoned");
        docs.insert(
            id.clone(),
            StoredDocument {
                content: content.to_string(),
                created_at: now,
            },
        );

        // Opportunistic eviction on every write, as a side effect of insertion.
        Self::sweep_locked(&mut docs, now);

        Ok(id)
    }

    fn get(&self, id: &str) -> Result<String, AppError> {
        let now = self.clock.now();
        let mut docs = self.docs.write().expect("document store lock poisoned");

        // Lazy expiry: an entry past the window reads as missing even if no
        // write has swept it yet.
        if let Some(doc) = docs.get(id) {
            if now - doc.created_at > retention() {
                docs.remove(id);
            } else {
                return Ok(doc.content.clone());
            }
        }

        Err(AppError::NotFound(
            "Document not found or expired".to_string(),
        ))
    }

    fn sweep(&self) {
        let now = self.clock.now();
        let mut docs = self.docs.write().expect("document store lock poisoned");
        Self::sweep_locked(&mut docs, now);
    }
}

/// Generates the original scheme's low-entropy base-36 id (13 chars).
/// Not unguessable and not collision-free; collisions overwrite.
fn generate_id() -> String {
    let mut rng = rand::thread_rng();
    (0..13)
        .map(|_| {
            let digit = rng.gen_range(0..36u32);
            std::char::from_digit(digit, 36).expect("digit in base-36 range")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Test clock that only moves when told to.
    struct ManualClock {
        now: Mutex<DateTime<Utc>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                now: Mutex::new(Utc::now()),
            }
        }

        fn advance(&self, d: Duration) {
            let mut now = self.now.lock().unwrap();
            *now = *now + d;
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.now.lock().unwrap()
        }
    }

    #[test]
    fn test_put_get_round_trip() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        let id = store.put("My delegation plan").unwrap();
        assert_eq!(store.get(&id).unwrap(), "My delegation plan");
        // A hit does not consume the entry.
        assert_eq!(store.get(&id).unwrap(), "My delegation plan");
    }

    #[test]
    fn test_get_unknown_id_is_not_found() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        assert!(matches!(store.get("nope"), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_empty_content_rejected_without_mutation() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        assert!(matches!(store.put(""), Err(AppError::Validation(_))));
        assert!(store.docs.read().unwrap().is_empty());
    }

    #[test]
    fn test_expired_entry_reads_as_not_found() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        let id = store.put("doc").unwrap();
        clock.advance(Duration::hours(24) + Duration::seconds(1));

        assert!(matches!(store.get(&id), Err(AppError::NotFound(_))));
        // Lazy expiry removed the entry on the way out.
        assert!(store.docs.read().unwrap().is_empty());
    }

    #[test]
    fn test_entry_still_readable_just_inside_window() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        let id = store.put("doc").unwrap();
        clock.advance(Duration::hours(23) + Duration::minutes(59));

        assert_eq!(store.get(&id).unwrap(), "doc");
    }

    #[test]
    fn test_retention_boundary_is_inclusive() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        let id = store.put("doc").unwrap();
        clock.advance(Duration::hours(24));

        // Exactly 24h old: still readable. One tick past: gone.
        assert_eq!(store.get(&id).unwrap(), "doc");
        clock.advance(Duration::seconds(1));
        assert!(matches!(store.get(&id), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_put_sweeps_expired_but_keeps_fresh() {
        let clock = ManualClock::new();
        let store = InMemoryStore::new(&clock);

        let old = store.put("old").unwrap();
        clock.advance(Duration::hours(12));
        let fresh = store.put("fresh").unwrap();
        clock.advance(Duration::hours(13));

        // `old` is now 25h old; this write evicts it.
        let newest = store.put("newest").unwrap();

        assert!(matches!(store.get(&old), Err(AppError::NotFound(_))));
        assert_eq!(store.get(&fresh).unwrap(), "fresh");
        assert_eq!(store.get(&newest).unwrap(), "newest");
    }

    #[test]
    fn test_generated_ids_are_base36() {
        let id = generate_id();
        assert_eq!(id.len(), 13);
        assert!(id.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }
}
