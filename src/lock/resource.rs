//! `lock_resource_key` / `lock_resource` and the resource hash table
//! (spec §3.2, §5). The table itself is a sharded concurrent map
//! (`dashmap`); each resource additionally carries its own mutex guarding
//! the three lists, so a lookup never blocks on another resource's list
//! mutation.

use std::sync::Mutex;

use dashmap::DashMap;

use crate::{entry::EntryHandle, mode::LockMode, non2pl::Non2plEntry};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ResourceType {
	RootClass,
	Class,
	Instance,
}

/// Hash key for the resource table. `class_oid` is only meaningful for
/// `Instance` keys; `RootClass` ignores both oid fields.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct LockResourceKey {
	pub kind: ResourceType,
	pub oid: u64,
	pub class_oid: u64,
}

impl LockResourceKey {
	#[must_use]
	pub fn root_class() -> Self {
		Self { kind: ResourceType::RootClass, oid: 0, class_oid: 0 }
	}

	#[must_use]
	pub fn class(oid: u64) -> Self { Self { kind: ResourceType::Class, oid, class_oid: 0 } }

	#[must_use]
	pub fn instance(oid: u64, class_oid: u64) -> Self {
		Self { kind: ResourceType::Instance, oid, class_oid }
	}
}

/// The mutable three-list state of a resource; always mutated under
/// `LockResource::inner`'s mutex (spec §5: resource_mutex before
/// tran_lock.hold_mutex, never the reverse).
pub struct LockResourceInner {
	pub holders: Vec<EntryHandle>,
	pub waiters: Vec<EntryHandle>,
	pub non2pl: Vec<Non2plEntry>,
	pub total_holders_mode: LockMode,
	pub total_waiters_mode: LockMode,
	/// Number of live instance-level holder entries whose `class_entry`
	/// points here; only meaningful for `Class`/`RootClass` keys.
	pub ngranules: u32,
}

impl LockResourceInner {
	fn new() -> Self {
		Self {
			holders: Vec::new(),
			waiters: Vec::new(),
			non2pl: Vec::new(),
			total_holders_mode: LockMode::Null,
			total_waiters_mode: LockMode::Null,
			ngranules: 0,
		}
	}

	#[must_use]
	pub fn is_empty(&self) -> bool { self.holders.is_empty() && self.waiters.is_empty() && self.non2pl.is_empty() }

	/// Recomputes `total_holders_mode` as the join of every holder's
	/// `granted_mode` and `blocked_mode` (spec §3.2 invariant).
	pub fn recompute_total_holders_mode(&mut self) {
		self.total_holders_mode = self.holders.iter().fold(LockMode::Null, |acc, e| {
			let e = e.state.lock().expect("entry mutex poisoned");
			let acc = crate::mode::conv(acc, e.granted_mode);
			match e.blocked_mode {
				| Some(b) => crate::mode::conv(acc, b),
				| None => acc,
			}
		});
	}

	/// Recomputes `total_waiters_mode` as the join of every waiter's
	/// `blocked_mode` (spec §3.2 invariant).
	pub fn recompute_total_waiters_mode(&mut self) {
		self.total_waiters_mode = self.waiters.iter().fold(LockMode::Null, |acc, e| {
			let e = e.state.lock().expect("entry mutex poisoned");
			match e.blocked_mode {
				| Some(b) => crate::mode::conv(acc, b),
				| None => acc,
			}
		});
	}
}

pub struct LockResource {
	pub key: LockResourceKey,
	pub inner: Mutex<LockResourceInner>,
}

impl LockResource {
	fn new(key: LockResourceKey) -> Self {
		Self { key, inner: Mutex::new(LockResourceInner::new()) }
	}
}

/// The resource hash table: lookups and inserts are lock-free at the map
/// level (sharded internally by `dashmap`); all list mutation happens under
/// the per-resource mutex obtained from the returned handle.
#[derive(Default)]
pub struct ResourceTable {
	map: DashMap<LockResourceKey, std::sync::Arc<LockResource>>,
}

impl ResourceTable {
	#[must_use]
	pub fn new() -> Self { Self { map: DashMap::new() } }

	/// Fetches the resource for `key`, inserting a fresh empty one if absent.
	#[must_use]
	pub fn get_or_insert(&self, key: LockResourceKey) -> std::sync::Arc<LockResource> {
		self.map
			.entry(key)
			.or_insert_with(|| std::sync::Arc::new(LockResource::new(key)))
			.clone()
	}

	#[must_use]
	pub fn get(&self, key: &LockResourceKey) -> Option<std::sync::Arc<LockResource>> {
		self.map.get(key).map(|e| e.clone())
	}

	/// Removes `key` from the table, but only if its three lists are still
	/// empty at the moment of removal (re-checked under the resource mutex
	/// to close the race against a concurrent insert onto the same entry).
	pub fn remove_if_empty(&self, key: &LockResourceKey) {
		if let Some(resource) = self.get(key) {
			let guard = resource.inner.lock().expect("resource mutex poisoned");
			if !guard.is_empty() {
				return;
			}
			drop(guard);
			self.map.remove_if(key, |_, r| {
				let guard = r.inner.lock().expect("resource mutex poisoned");
				guard.is_empty()
			});
		}
	}

	#[must_use]
	pub fn len(&self) -> usize { self.map.len() }

	#[must_use]
	pub fn is_empty(&self) -> bool { self.map.is_empty() }

	/// Snapshot iteration for the deadlock detector (spec §4.16 step 2,
	/// §9 design note: "a reimplementation may take a copy-on-iterate
	/// snapshot... edge inclusion must be based on the instantaneous
	/// holder/waiter lists under each resource's mutex, not the snapshot").
	/// The snapshot here is only of *which resources exist*; each
	/// resource's lists are read live, under its mutex, by the caller.
	#[must_use]
	pub fn snapshot_resources(&self) -> Vec<std::sync::Arc<LockResource>> {
		self.map.iter().map(|e| e.value().clone()).collect()
	}
}
