//! `tran_lock`: one per transaction index, holding its lock lists and
//! instant-duration/escalation flags (spec §3.2).

use std::sync::{
	atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
	Mutex,
};

use crate::{
	entry::EntryHandle,
	non2pl::Non2plEntry,
};

/// Free-pool entries are capped per spec §3.2 ("local free-entry pool +
/// count (cap 10)"); Rust's allocator already pools freed `Arc` allocations
/// efficiently, so this cap is kept as a bookkeeping limit on how many
/// recently-released entries this transaction retains strong references to
/// rather than as a manual slab allocator.
const FREE_POOL_CAP: usize = 10;

pub struct TranLock {
	pub tran_index: u32,
	/// Distinct from `tran_index`: a transaction id that is never reused
	/// across the slot's lifetime, needed by deadlock victim selection's
	/// "prefer the youngest transaction id" tiebreak (spec §4.16 step 5).
	pub tranid: u64,

	inst_hold: Mutex<Vec<EntryHandle>>,
	/// Also holds the root-class entry (`LockResourceKey::root_class()`) —
	/// the root class is just another class-level resource as far as the
	/// hold list is concerned.
	class_hold: Mutex<Vec<EntryHandle>>,

	non2pl: Mutex<Vec<Non2plEntry>>,
	num_incons_non2pl: AtomicU32,

	free_pool: Mutex<Vec<EntryHandle>>,

	lock_escalation_on: AtomicBool,
	is_instant_duration: AtomicBool,

	/// Default wait, in milliseconds; `None` means wait indefinitely.
	/// Overridable per-call via `lock_object`'s optional wait parameter
	/// (SPEC_FULL §11.1).
	default_wait_msecs: AtomicU32,

	/// Deadlock victim-selection metadata (spec §4.16 step 5). Lock-manager
	/// local since transaction lifecycle management itself is out of scope
	/// (spec §1 Non-goals); a caller wires these from its own transaction
	/// table.
	active: AtomicBool,
	has_deadlock_priority: AtomicBool,
	num_log_records: AtomicU64,
}

impl TranLock {
	#[must_use]
	pub fn new(tran_index: u32, tranid: u64, default_wait_msecs: Option<u32>) -> Self {
		Self {
			tran_index,
			tranid,
			inst_hold: Mutex::new(Vec::new()),
			class_hold: Mutex::new(Vec::new()),
			non2pl: Mutex::new(Vec::new()),
			num_incons_non2pl: AtomicU32::new(0),
			free_pool: Mutex::new(Vec::new()),
			lock_escalation_on: AtomicBool::new(false),
			is_instant_duration: AtomicBool::new(false),
			default_wait_msecs: AtomicU32::new(default_wait_msecs.unwrap_or(u32::MAX)),
			active: AtomicBool::new(true),
			has_deadlock_priority: AtomicBool::new(false),
			num_log_records: AtomicU64::new(0),
		}
	}

	#[must_use]
	pub fn is_active(&self) -> bool { self.active.load(Ordering::Acquire) }

	pub fn set_active(&self, active: bool) { self.active.store(active, Ordering::Release); }

	#[must_use]
	pub fn has_deadlock_priority(&self) -> bool { self.has_deadlock_priority.load(Ordering::Acquire) }

	pub fn set_deadlock_priority(&self, priority: bool) { self.has_deadlock_priority.store(priority, Ordering::Release); }

	pub fn record_log_write(&self) { self.num_log_records.fetch_add(1, Ordering::Relaxed); }

	#[must_use]
	pub fn num_log_records(&self) -> u64 { self.num_log_records.load(Ordering::Relaxed) }

	#[must_use]
	pub fn default_wait_msecs(&self) -> Option<u32> {
		match self.default_wait_msecs.load(Ordering::Relaxed) {
			| u32::MAX => None,
			| ms => Some(ms),
		}
	}

	pub fn add_inst_hold(&self, entry: EntryHandle) { self.inst_hold.lock().expect("hold mutex poisoned").push(entry); }

	pub fn remove_inst_hold(&self, key: &crate::resource::LockResourceKey) {
		let mut list = self.inst_hold.lock().expect("hold mutex poisoned");
		list.retain(|e| &e.resource_key != key);
	}

	#[must_use]
	pub fn inst_hold_count(&self) -> usize { self.inst_hold.lock().expect("hold mutex poisoned").len() }

	pub fn add_class_hold(&self, entry: EntryHandle) { self.class_hold.lock().expect("hold mutex poisoned").push(entry); }

	pub fn remove_class_hold(&self, key: &crate::resource::LockResourceKey) {
		let mut list = self.class_hold.lock().expect("hold mutex poisoned");
		list.retain(|e| &e.resource_key != key);
	}

	#[must_use]
	pub fn class_hold_count(&self) -> usize { self.class_hold.lock().expect("hold mutex poisoned").len() }

	#[must_use]
	pub fn find_class_hold(&self, key: &crate::resource::LockResourceKey) -> Option<EntryHandle> {
		self.class_hold
			.lock()
			.expect("hold mutex poisoned")
			.iter()
			.find(|e| &e.resource_key == key)
			.cloned()
	}

	#[must_use]
	pub fn find_inst_hold(&self, key: &crate::resource::LockResourceKey) -> Option<EntryHandle> {
		self.inst_hold
			.lock()
			.expect("hold mutex poisoned")
			.iter()
			.find(|e| &e.resource_key == key)
			.cloned()
	}

	/// All class-level holder entries this transaction owns that sit under
	/// `class_key`, used by escalation to clear dominated instance locks.
	#[must_use]
	pub fn inst_holds_under_class(&self, class_oid: u64) -> Vec<EntryHandle> {
		self.inst_hold
			.lock()
			.expect("hold mutex poisoned")
			.iter()
			.filter(|e| e.resource_key.class_oid == class_oid)
			.cloned()
			.collect()
	}

	pub fn retain_inst_holds(&self, keep: impl Fn(&EntryHandle) -> bool) {
		self.inst_hold.lock().expect("hold mutex poisoned").retain(keep);
	}

	/// Every resource key this transaction currently holds, instance- and
	/// class-level alike — used by a full rollback (e.g. a deadlock victim's
	/// abort) to release everything it holds, not just the one resource it
	/// happened to be waiting on.
	#[must_use]
	pub fn held_resource_keys(&self) -> Vec<crate::resource::LockResourceKey> {
		let inst = self.inst_hold.lock().expect("hold mutex poisoned");
		let class = self.class_hold.lock().expect("hold mutex poisoned");
		inst.iter().chain(class.iter()).map(|e| e.resource_key).collect()
	}

	pub fn push_non2pl(&self, entry: Non2plEntry) { self.non2pl.lock().expect("non2pl mutex poisoned").push(entry); }

	pub fn with_non2pl_mut<R>(&self, f: impl FnOnce(&mut Vec<Non2plEntry>) -> R) -> R {
		f(&mut self.non2pl.lock().expect("non2pl mutex poisoned"))
	}

	pub fn add_incons_non2pl(&self, n: u32) { self.num_incons_non2pl.fetch_add(n, Ordering::Relaxed); }

	#[must_use]
	pub fn num_incons_non2pl(&self) -> u32 { self.num_incons_non2pl.load(Ordering::Relaxed) }

	pub fn notify_isolation_incons(&self, callback: impl FnMut(&crate::resource::LockResourceKey) -> bool) {
		let list = self.non2pl.lock().expect("non2pl mutex poisoned");
		crate::non2pl::notify_isolation_incons(&list, callback);
	}

	/// Returns the entry to the free pool if there is room, otherwise it is
	/// simply dropped (spec §4.12 step 3).
	pub fn release_to_free_pool(&self, entry: EntryHandle) {
		let mut pool = self.free_pool.lock().expect("free pool mutex poisoned");
		if pool.len() < FREE_POOL_CAP {
			pool.push(entry);
		}
	}

	#[must_use]
	pub fn free_pool_len(&self) -> usize { self.free_pool.lock().expect("free pool mutex poisoned").len() }

	pub fn start_instant_lock_mode(&self) { self.is_instant_duration.store(true, Ordering::Release); }

	pub fn stop_instant_lock_mode(&self) -> Vec<EntryHandle> {
		self.is_instant_duration.store(false, Ordering::Release);
		let instant_held: Vec<EntryHandle> = self
			.inst_hold
			.lock()
			.expect("hold mutex poisoned")
			.iter()
			.filter(|e| e.instant_lock_count() > 0)
			.cloned()
			.collect();
		instant_held
	}

	#[must_use]
	pub fn is_instant_lock_mode(&self) -> bool { self.is_instant_duration.load(Ordering::Acquire) }

	/// Serializes escalation attempts per transaction (spec §4.14).
	/// Returns `false` (and does nothing) if escalation is already running
	/// for this transaction on another thread.
	#[must_use]
	pub fn try_begin_escalation(&self) -> bool {
		self.lock_escalation_on
			.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
			.is_ok()
	}

	pub fn end_escalation(&self) { self.lock_escalation_on.store(false, Ordering::Release); }
}
