use std::future::Future;
use std::sync::Arc;

use tokio::sync::RwLock;

/// Trait for records persisted in a repository.
///
/// Identity is a surrogate `u64` assigned by the store on insert.
pub trait Entity: Clone + Send + Sync + 'static {
    fn id(&self) -> u64;
    fn with_id(self, id: u64) -> Self;
}

/// Errors surfaced by a record store backend.
#[derive(Debug)]
pub enum StoreError {
    Backend(Box<dyn std::error::Error + Send + Sync>),
    Other(String),
}

impl StoreError {
    /// Construct a `Backend` variant from any error type.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Backend(err) => write!(f, "Store backend error: {err}"),
            StoreError::Other(msg) => write!(f, "Store error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Backend(err) => Some(err.as_ref()),
            StoreError::Other(_) => None,
        }
    }
}

/// Outcome of an atomic [`Repository::modify`] against a single record.
pub enum Modified<T, E> {
    /// The closure accepted the change; the updated record was committed.
    Updated(T),
    /// The closure rejected the change; the record is untouched.
    Rejected(E),
    /// No record with the requested id.
    Missing,
}

/// Generic async repository contract over a record store.
///
/// Uses RPITIT (return-position `impl Trait` in traits) — no `async-trait`
/// needed. Missing records are `Ok(None)`; `Err` is reserved for backend
/// failures.
pub trait Repository<T: Entity>: Send + Sync {
    fn find_all(&self) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send;

    fn find_by_id(&self, id: u64) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    /// Attribute-based secondary lookup; the predicate receives each record.
    fn find_where<P>(&self, predicate: P) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send
    where
        P: Fn(&T) -> bool + Send;

    /// Persist a new record. The store assigns the identity and returns the
    /// stored record.
    fn insert(&self, entity: T) -> impl Future<Output = Result<T, StoreError>> + Send;

    /// Replace the record carrying `entity.id()`. `Ok(None)` when absent.
    fn update(&self, entity: T) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    /// Remove a record, returning it. `Ok(None)` when absent.
    fn delete(&self, id: u64) -> impl Future<Output = Result<Option<T>, StoreError>> + Send;

    /// Atomic read-modify-write on a single record.
    ///
    /// The closure runs under the store's write lock; no other operation can
    /// interleave between its read of the record and the commit. When the
    /// closure returns `Err`, nothing is committed — this is the guarded
    /// update the stock non-negativity invariant relies on.
    fn modify<F, E>(
        &self,
        id: u64,
        f: F,
    ) -> impl Future<Output = Result<Modified<T, E>, StoreError>> + Send
    where
        F: FnOnce(&mut T) -> Result<(), E> + Send,
        E: Send;
}

struct Inner<T> {
    records: Vec<T>,
    next_id: u64,
}

/// In-memory repository backend.
///
/// Cloning shares the underlying store, so a service and its router state
/// observe the same records.
pub struct InMemoryRepository<T> {
    inner: Arc<RwLock<Inner<T>>>,
}

impl<T> Clone for InMemoryRepository<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                records: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a repository pre-populated with records that already carry
    /// their ids (seed data). The id sequence continues after the highest
    /// seeded id.
    pub fn seeded(records: Vec<T>) -> Self {
        let next_id = records.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        Self {
            inner: Arc::new(RwLock::new(Inner { records, next_id })),
        }
    }
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for InMemoryRepository<T> {
    async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.inner.read().await.records.clone())
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<T>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().find(|r| r.id() == id).cloned())
    }

    async fn find_where<P>(&self, predicate: P) -> Result<Vec<T>, StoreError>
    where
        P: Fn(&T) -> bool + Send,
    {
        let inner = self.inner.read().await;
        Ok(inner
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect())
    }

    async fn insert(&self, entity: T) -> Result<T, StoreError> {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let stored = entity.with_id(id);
        inner.records.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: T) -> Result<Option<T>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.records.iter().position(|r| r.id() == entity.id()) {
            Some(pos) => {
                inner.records[pos] = entity.clone();
                Ok(Some(entity))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: u64) -> Result<Option<T>, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.records.iter().position(|r| r.id() == id) {
            Some(pos) => Ok(Some(inner.records.remove(pos))),
            None => Ok(None),
        }
    }

    async fn modify<F, E>(&self, id: u64, f: F) -> Result<Modified<T, E>, StoreError>
    where
        F: FnOnce(&mut T) -> Result<(), E> + Send,
        E: Send,
    {
        let mut inner = self.inner.write().await;
        let Some(pos) = inner.records.iter().position(|r| r.id() == id) else {
            return Ok(Modified::Missing);
        };
        let mut candidate = inner.records[pos].clone();
        match f(&mut candidate) {
            Ok(()) => {
                inner.records[pos] = candidate.clone();
                Ok(Modified::Updated(candidate))
            }
            Err(err) => Ok(Modified::Rejected(err)),
        }
    }
}
