//! The transactional lock manager: a multi-granularity, multi-mode lock
//! table with deadlock detection, as used by a transaction server to
//! serialize concurrent access to classes and instances (spec §3, §4).

pub mod composite;
pub mod deadlock;
pub mod entry;
pub mod error;
pub mod escalation;
pub mod granting;
pub mod lock_table;
pub mod mode;
pub mod non2pl;
pub mod resource;
pub mod tran_lock;
pub mod upr;
pub mod waiting;

pub use composite::CompositeLock;
pub use deadlock::DeadlockDetectorStats;
pub use entry::{EntryHandle, LockEntry};
pub use error::{Error, Result};
pub use lock_table::LockTable;
pub use mode::LockMode;
pub use non2pl::Non2plEntry;
pub use resource::{LockResource, LockResourceKey, ResourceTable, ResourceType};
pub use tran_lock::TranLock;
pub use waiting::{ResumeState, WaitSlot};
