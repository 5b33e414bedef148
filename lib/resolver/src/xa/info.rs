use crate::xa::XidKey;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rustc_hash::FxHasher;
use std::fmt;
use std::hash::BuildHasherDefault;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

/// The phase of a transaction branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchPhase {
    Active,
    Prepared,
}

/// The state of a single transaction branch.
///
/// `S` is the state that the backend attaches to the branch.
pub struct TxInfo<S> {
    xid: XidKey,
    rollback_only: AtomicBool,
    prepared: AtomicBool,
    state: S,
}

impl<S> TxInfo<S> {
    pub fn new(xid: XidKey, state: S) -> Self {
        Self {
            xid,
            rollback_only: AtomicBool::new(false),
            prepared: AtomicBool::new(false),
            state,
        }
    }

    pub fn xid(&self) -> &XidKey {
        &self.xid
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn is_rollback_only(&self) -> bool {
        self.rollback_only.load(Ordering::Acquire)
    }

    /// Marks the branch such that it can only be rolled back. Cannot be undone.
    pub fn mark_rollback_only(&self) {
        self.rollback_only.store(true, Ordering::Release);
    }

    pub fn phase(&self) -> BranchPhase {
        if self.prepared.load(Ordering::Acquire) {
            BranchPhase::Prepared
        } else {
            BranchPhase::Active
        }
    }

    pub(crate) fn mark_prepared(&self) {
        self.prepared.store(true, Ordering::Release);
    }
}

impl<S: fmt::Debug> fmt::Debug for TxInfo<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TxInfo")
            .field("xid", &self.xid)
            .field("rollback_only", &self.is_rollback_only())
            .field("phase", &self.phase())
            .field("state", &self.state)
            .finish()
    }
}

/// Identifies a resource manager. Two transaction resources belong to the same resource manager
/// iff their ids are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceManagerId(u64);

impl ResourceManagerId {
    fn next() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ResourceManagerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rm-{}", self.0)
    }
}

/// The registry of all open transaction branches of one resolver factory.
///
/// The registry hands out [Arc]s to the branches and never keeps a map guard beyond a single
/// operation. Operations on different branches therefore never block each other.
pub struct RmInfo<S> {
    id: ResourceManagerId,
    transactions: DashMap<XidKey, Arc<TxInfo<S>>, BuildHasherDefault<FxHasher>>,
}

impl<S> RmInfo<S> {
    /// Creates a new, empty registry with a fresh id.
    pub fn new() -> Self {
        Self {
            id: ResourceManagerId::next(),
            transactions: DashMap::with_hasher(BuildHasherDefault::default()),
        }
    }

    pub fn id(&self) -> ResourceManagerId {
        self.id
    }

    pub fn get(&self, xid: &XidKey) -> Option<Arc<TxInfo<S>>> {
        self.transactions.get(xid).map(|entry| Arc::clone(entry.value()))
    }

    /// Registers `transaction`. Returns `false` if a branch with the same xid already exists.
    pub fn insert_new(&self, transaction: Arc<TxInfo<S>>) -> bool {
        match self.transactions.entry(transaction.xid().clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(transaction);
                true
            }
        }
    }

    pub fn remove(&self, xid: &XidKey) -> Option<Arc<TxInfo<S>>> {
        self.transactions.remove(xid).map(|(_, transaction)| transaction)
    }

    pub fn contains(&self, xid: &XidKey) -> bool {
        self.transactions.contains_key(xid)
    }

    /// The xids of all branches that are in the [BranchPhase::Prepared] phase.
    pub fn prepared_xids(&self) -> Vec<XidKey> {
        self.transactions
            .iter()
            .filter(|entry| entry.value().phase() == BranchPhase::Prepared)
            .map(|entry| entry.key().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl<S> Default for RmInfo<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for RmInfo<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RmInfo")
            .field("id", &self.id)
            .field("open_branches", &self.transactions.len())
            .finish()
    }
}
