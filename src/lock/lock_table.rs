//! The lock manager's entry points (spec §4.10, §4.12) and the context that
//! backs them. `LockTable` bundles the resource hash table and the
//! per-transaction registry that the original's `lk_Gl` global singleton
//! held; spec §9's design note asks for this to become an explicit context
//! struct passed to every call instead of a global.

use std::{
	sync::{Arc, Mutex},
	time::Duration,
};

use dashmap::DashMap;
use tracing::{debug, trace};

use crate::{
	entry::{EntryHandle, LockEntry},
	error::{Error, Result},
	granting::{grant_blocked_holder, grant_blocked_waiter, grant_blocked_waiter_partial},
	mode::{comp, conv, LockMode},
	non2pl::{check_incoming_against_non2pl, Non2plEntry},
	resource::{LockResource, LockResourceKey, ResourceTable, ResourceType},
	tran_lock::TranLock,
	upr,
	waiting::{ResumeState, WaitSlot},
};

pub struct LockTable {
	pub(crate) resources: ResourceTable,
	trans: DashMap<u32, Arc<TranLock>>,
	escalation_at: u32,
	rollback_on_escalation: bool,
	/// Notified whenever a new wait is registered, so the deadlock daemon
	/// (spec §4.16) can run a pass sooner than its normal interval.
	pub(crate) wake: Arc<(Mutex<()>, std::sync::Condvar)>,
	pub(crate) deadlock_stats: crate::deadlock::DeadlockDetectorStats,
}

impl LockTable {
	#[must_use]
	pub fn new(escalation_at: u32, rollback_on_escalation: bool) -> Self {
		Self {
			resources: ResourceTable::new(),
			trans: DashMap::new(),
			escalation_at: escalation_at.max(1),
			rollback_on_escalation,
			wake: Arc::new((Mutex::new(()), std::sync::Condvar::new())),
			deadlock_stats: crate::deadlock::DeadlockDetectorStats::default(),
		}
	}

	/// Counters for the background deadlock detector (SPEC_FULL §11.4).
	#[must_use]
	pub fn deadlock_stats(&self) -> &crate::deadlock::DeadlockDetectorStats { &self.deadlock_stats }

	/// Runs detector passes until `shutdown` resolves, sleeping for
	/// `interval` between passes unless woken early by a new wait
	/// (spec §4.16: "no more often than `lk_run_deadlock_interval`
	/// seconds"). Intended to be spawned onto its own thread by the binary
	/// wiring this crate together.
	pub fn run_deadlock_daemon(self: &Arc<Self>, interval: Duration, shutdown: &std::sync::atomic::AtomicBool) {
		crate::deadlock::run_daemon(self, interval, shutdown);
	}

	pub fn register_transaction(&self, tran_index: u32, tranid: u64, default_wait_msecs: Option<u32>) -> Arc<TranLock> {
		let tran = Arc::new(TranLock::new(tran_index, tranid, default_wait_msecs));
		self.trans.insert(tran_index, Arc::clone(&tran));
		tran
	}

	#[must_use]
	pub fn transaction(&self, tran_index: u32) -> Option<Arc<TranLock>> { self.trans.get(&tran_index).map(|e| e.clone()) }

	pub fn unregister_transaction(&self, tran_index: u32) { self.trans.remove(&tran_index); }

	#[must_use]
	pub(crate) fn all_transactions(&self) -> Vec<Arc<TranLock>> { self.trans.iter().map(|e| e.value().clone()).collect() }

	fn tran(&self, tran_index: u32) -> Result<Arc<TranLock>> {
		self.transaction(tran_index)
			.ok_or_else(|| Error::NotGrantedDueError(format!("unknown tran_index {tran_index}")))
	}

	/// `lock_object(oid, class_oid, lock, cond)`, plus the optional per-call
	/// wait override (SPEC_FULL §11.1). `class_oid == 0` means `oid` names a
	/// class (or the root class when `oid == 0` too); otherwise `oid` names
	/// an instance of `class_oid`.
	#[tracing::instrument(level = "trace", skip(self))]
	pub fn lock_object(
		&self, tran_index: u32, oid: u64, class_oid: u64, lock: LockMode, cond: bool, wait_msecs: Option<Duration>,
	) -> Result<LockMode> {
		let tran = self.tran(tran_index)?;
		let key = resource_key(oid, class_oid);

		// Step 1: root/class implicit check.
		if key.kind == ResourceType::Instance {
			if let Some(class_entry) = tran.find_class_hold(&LockResourceKey::class(class_oid)) {
				let class_mode = class_entry.granted_mode();
				if conv(lock, class_mode) == class_mode {
					trace!(tran_index, %class_mode, %lock, "instance lock implied by held class lock");
					return Ok(class_mode);
				}
			}
		}

		let resource = self.resources.get_or_insert(key);
		let effective_wait = wait_msecs.or_else(|| tran.default_wait_msecs().map(|ms| Duration::from_millis(u64::from(ms))));

		// The `WaitSlot` is created and installed on the entry here, while
		// `inner` is still locked, for a `MustWait` outcome — not after the
		// mutex is dropped. Otherwise a concurrent `unlock_object` could
		// observe this entry in `holders`/`waiters`, grant it, and call
		// `take_wait()` before the wait even exists, leaving the grant
		// stranded with no one left to resume it (spec §4.10 step 6's
		// "register the wait, then release the resource mutex and suspend").
		let outcome = {
			let mut inner = resource.inner.lock().expect("resource mutex poisoned");

			let outcome = if let Some(existing) = inner.holders.iter().find(|h| h.tran_index == tran_index).cloned() {
				perform_conversion(&mut inner, &existing, lock, cond)
			} else {
				perform_new_request(&mut inner, tran_index, key, lock, cond)
			};

			if let RequestOutcome::MustWait(ref entry) = outcome {
				let wait = Arc::new(WaitSlot::new(effective_wait.is_some()));
				entry.install_wait(Arc::clone(&wait));
			}

			outcome
		};

		match outcome {
			| RequestOutcome::Granted(entry) => {
				self.on_granted(&tran, &resource, key, &entry)?;
				Ok(entry.granted_mode())
			},
			| RequestOutcome::RejectedTimeout => Err(Error::NotGrantedDueTimeout),
			| RequestOutcome::MustWait(entry) => self.suspend_and_resume(&tran, &resource, key, entry, effective_wait),
		}
	}

	/// `lock_subclass`: same request algorithm, targeting a class resource.
	pub fn lock_subclass(&self, tran_index: u32, class_oid: u64, lock: LockMode, cond: bool, wait_msecs: Option<Duration>) -> Result<LockMode> {
		self.lock_object(tran_index, class_oid, 0, lock, cond, wait_msecs)
	}

	/// `lock_scan`: acquires a scan-duration lock, which is just a regular
	/// request made with the scan's intended hold mode (`IS` for a read
	/// scan, `S` for a repeatable one); the caller chooses `lock`.
	pub fn lock_scan(&self, tran_index: u32, oid: u64, class_oid: u64, lock: LockMode, wait_msecs: Option<Duration>) -> Result<LockMode> {
		self.lock_object(tran_index, oid, class_oid, lock, false, wait_msecs)
	}

	/// `lock_classes_lock_hint`: best-effort conditional pre-acquisition of
	/// several class locks ahead of a query plan. Returns the subset that
	/// actually granted; callers proceed even on partial success, since
	/// these are hints, not requirements.
	pub fn lock_classes_lock_hint(&self, tran_index: u32, hints: &[(u64, LockMode)]) -> Vec<(u64, LockMode)> {
		hints
			.iter()
			.filter_map(|&(class_oid, mode)| {
				self.lock_object(tran_index, class_oid, 0, mode, true, Some(Duration::ZERO))
					.ok()
					.map(|granted| (class_oid, granted))
			})
			.collect()
	}

	/// `lock_hold_object_instant`: acquires a lock exactly as `lock_object`
	/// does, but tagged as instant-duration so it is released in bulk at
	/// the transaction's next `stop_instant_lock_mode` rather than at
	/// transaction end (SPEC_FULL §11.2).
	pub fn lock_hold_object_instant(&self, tran_index: u32, oid: u64, class_oid: u64, lock: LockMode, wait_msecs: Option<Duration>) -> Result<LockMode> {
		let tran = self.tran(tran_index)?;
		tran.start_instant_lock_mode();
		self.lock_object(tran_index, oid, class_oid, lock, false, wait_msecs)
	}

	/// `lock_start_instant_lock_mode` (SPEC_FULL §11.2).
	pub fn start_instant_lock_mode(&self, tran_index: u32) -> Result<()> {
		self.tran(tran_index)?.start_instant_lock_mode();
		Ok(())
	}

	/// `lock_stop_instant_lock_mode`: releases every lock acquired while
	/// instant-duration mode was on (SPEC_FULL §11.2).
	pub fn stop_instant_lock_mode(&self, tran_index: u32) -> Result<()> {
		let tran = self.tran(tran_index)?;
		for entry in tran.stop_instant_lock_mode() {
			self.unlock_object(tran_index, entry.resource_key.oid, entry.resource_key.class_oid, true)?;
		}
		Ok(())
	}

	/// `lock_is_instant_lock_mode` (SPEC_FULL §11.2).
	pub fn is_instant_lock_mode(&self, tran_index: u32) -> bool {
		self.transaction(tran_index).is_some_and(|t| t.is_instant_lock_mode())
	}

	/// `lock_internal_perform_unlock_object` (spec §4.12).
	pub fn unlock_object(&self, tran_index: u32, oid: u64, class_oid: u64, release_flag: bool) -> Result<()> {
		let tran = self.tran(tran_index)?;
		let key = resource_key(oid, class_oid);
		let Some(resource) = self.resources.get(&key) else {
			return Ok(());
		};

		let is_instant = tran.is_instant_lock_mode();
		let mut inner = resource.inner.lock().expect("resource mutex poisoned");

		if let Some(entry) = inner.holders.iter().find(|h| h.tran_index == tran_index).cloned() {
			if !release_flag && entry.drop_count(is_instant) {
				return Ok(());
			}

			inner.holders.retain(|e| !Arc::ptr_eq(e, &entry));
			match key.kind {
				| ResourceType::Instance => {
					tran.remove_inst_hold(&key);
					decrement_ngranules(self, key.class_oid);
				},
				| ResourceType::Class | ResourceType::RootClass => tran.remove_class_hold(&key),
			}

			if should_move_to_non2pl(&tran) {
				let non2pl_entry = Non2plEntry::new(tran_index, key, entry.granted_mode());
				inner.non2pl.push(non2pl_entry.clone());
				tran.push_non2pl(non2pl_entry);
			}

			tran.release_to_free_pool(entry);
		} else if let Some(pos) = inner.waiters.iter().position(|w| w.tran_index == tran_index) {
			inner.waiters.remove(pos);
			grant_blocked_waiter_partial(&mut inner, pos);
		}

		inner.recompute_total_holders_mode();

		if inner.is_empty() {
			drop(inner);
			self.resources.remove_if_empty(&key);
			return Ok(());
		}

		grant_blocked_holder(&mut inner);
		grant_blocked_waiter(&mut inner);
		Ok(())
	}

	/// Releases every lock `tran_index` currently holds. Used by a full
	/// rollback — in particular a deadlock victim's abort (spec §4.16 step
	/// 5): resuming the victim's own wait only unblocks the one resource it
	/// was waiting on, but an aborted transaction releases everything it
	/// holds, which is what actually wakes any other transaction waiting on
	/// one of its *other* locks.
	pub fn unlock_all(&self, tran_index: u32) {
		let Some(tran) = self.transaction(tran_index) else { return };
		for key in tran.held_resource_keys() {
			let _ = self.unlock_object(tran_index, key.oid, key.class_oid, true);
		}
	}

	/// `lock_reacquire_crash_locks` (SPEC_FULL §11.6): re-grants a
	/// previously-recorded set of locks directly, bypassing the wait path
	/// (steps 3-5 of §4.10) since these locks are assumed uncontended.
	pub fn reacquire(&self, tran_index: u32, tranid: u64, locks: &[(LockResourceKey, LockMode)]) -> Result<()> {
		let tran = self
			.transaction(tran_index)
			.unwrap_or_else(|| self.register_transaction(tran_index, tranid, None));

		for &(key, mode) in locks {
			let resource = self.resources.get_or_insert(key);
			let entry = LockEntry::new(tran_index, key, mode);
			let mut inner = resource.inner.lock().expect("resource mutex poisoned");
			upr::reposition(&mut inner.holders, entry.clone());
			inner.recompute_total_holders_mode();
			drop(inner);

			match key.kind {
				| ResourceType::Instance => {
					tran.add_inst_hold(entry);
					increment_ngranules(self, key.class_oid);
				},
				| ResourceType::Class | ResourceType::RootClass => tran.add_class_hold(entry),
			}
		}
		Ok(())
	}

	fn on_granted(&self, tran: &Arc<TranLock>, resource: &Arc<LockResource>, key: LockResourceKey, entry: &EntryHandle) -> Result<()> {
		let is_new_hold = match key.kind {
			| ResourceType::Instance => tran.find_inst_hold(&key).is_none(),
			| ResourceType::Class | ResourceType::RootClass => tran.find_class_hold(&key).is_none(),
		};

		if is_new_hold {
			match key.kind {
				| ResourceType::Instance => {
					tran.add_inst_hold(entry.clone());
					increment_ngranules(self, key.class_oid);
				},
				| ResourceType::Class | ResourceType::RootClass => tran.add_class_hold(entry.clone()),
			}
		}

		let promoted = {
			let mut inner = resource.inner.lock().expect("resource mutex poisoned");
			check_incoming_against_non2pl(&mut inner.non2pl, entry.granted_mode())
		};
		if !promoted.is_empty() {
			for releaser_index in &promoted {
				if let Some(releaser) = self.transaction(*releaser_index) {
					releaser.add_incons_non2pl(1);
					releaser.with_non2pl_mut(|list| crate::non2pl::mark_promoted(list, key));
				}
			}
			metrics::counter!("transerv_lock_non2pl_inconsistencies").increment(promoted.len() as u64);
		}

		if key.kind == ResourceType::Instance && is_new_hold {
			let ngranules = resource_ngranules(self, key.class_oid);
			if ngranules >= self.escalation_at {
				crate::escalation::maybe_escalate(self, tran, key.class_oid, self.rollback_on_escalation)?;
			}
		}

		Ok(())
	}

	/// Suspends on the `WaitSlot` already installed on `entry` (installed
	/// under the resource mutex by the caller before it was released — see
	/// `lock_object`) and maps the resumption state to the right result.
	fn suspend_and_resume(
		&self, tran: &Arc<TranLock>, resource: &Arc<LockResource>, key: LockResourceKey, entry: EntryHandle, wait_msecs: Option<Duration>,
	) -> Result<LockMode> {
		let wait = entry.wait().expect("MustWait entries always carry an installed WaitSlot");

		{
			let (lock, cv) = &*self.wake;
			let _guard = lock.lock().expect("wake mutex poisoned");
			cv.notify_all();
		}

		let resume = wait.suspend(wait_msecs);
		debug!(tran_index = tran.tran_index, ?resume, "lock waiter resumed");

		match resume {
			| ResumeState::Resumed => {
				self.on_granted(tran, resource, key, &entry)?;
				Ok(entry.granted_mode())
			},
			| ResumeState::ResumedTimeout | ResumeState::ResumedDeadlockTimeout => {
				self.cleanup_wait_entry(resource, &entry);
				Err(Error::NotGrantedDueTimeout)
			},
			| ResumeState::ResumedAbortedFirst | ResumeState::ResumedAbortedOther => {
				self.cleanup_wait_entry(resource, &entry);
				Err(Error::NotGrantedDueAborted)
			},
			| ResumeState::ResumedInterrupt => {
				self.cleanup_wait_entry(resource, &entry);
				Err(Error::Interrupted)
			},
			| ResumeState::Suspended => unreachable!("suspend() never returns in the Suspended state"),
		}
	}

	fn cleanup_wait_entry(&self, resource: &Arc<LockResource>, entry: &EntryHandle) {
		let mut inner = resource.inner.lock().expect("resource mutex poisoned");
		if let Some(pos) = inner.waiters.iter().position(|w| Arc::ptr_eq(w, entry)) {
			inner.waiters.remove(pos);
			inner.recompute_total_waiters_mode();
		} else if inner.holders.iter().any(|h| Arc::ptr_eq(h, entry)) {
			entry.set_blocked_mode(None);
			upr::reposition(&mut inner.holders, entry.clone());
			inner.recompute_total_holders_mode();
		}
	}
}

enum RequestOutcome {
	Granted(EntryHandle),
	RejectedTimeout,
	MustWait(EntryHandle),
}

/// Steps 3 and 5 of §4.10 for a transaction that already holds `existing` on
/// this resource.
fn perform_conversion(inner: &mut crate::resource::LockResourceInner, existing: &EntryHandle, lock: LockMode, cond: bool) -> RequestOutcome {
	let granted = existing.granted_mode();
	let new_mode = conv(lock, granted);

	if new_mode == granted {
		existing.bump_count(false);
		return RequestOutcome::Granted(existing.clone());
	}

	let others_mode = inner
		.holders
		.iter()
		.filter(|h| !Arc::ptr_eq(h, existing))
		.fold(LockMode::Null, |acc, h| conv(acc, h.granted_mode()));

	if comp(new_mode, others_mode) {
		existing.set_granted_mode(new_mode);
		existing.bump_count(false);
		upr::reposition(&mut inner.holders, existing.clone());
		inner.recompute_total_holders_mode();
		return RequestOutcome::Granted(existing.clone());
	}

	if cond {
		return RequestOutcome::RejectedTimeout;
	}

	existing.set_blocked_mode(Some(new_mode));
	upr::reposition(&mut inner.holders, existing.clone());
	inner.recompute_total_holders_mode();
	RequestOutcome::MustWait(existing.clone())
}

/// Steps 2 and 4-5 of §4.10 for a transaction with no existing entry on
/// this resource.
fn perform_new_request(inner: &mut crate::resource::LockResourceInner, tran_index: u32, key: LockResourceKey, lock: LockMode, cond: bool) -> RequestOutcome {
	if inner.is_empty() {
		let entry = LockEntry::new(tran_index, key, lock);
		inner.holders.push(entry.clone());
		inner.recompute_total_holders_mode();
		return RequestOutcome::Granted(entry);
	}

	if comp(lock, inner.total_holders_mode) && comp(lock, inner.total_waiters_mode) {
		let entry = LockEntry::new(tran_index, key, lock);
		upr::reposition(&mut inner.holders, entry.clone());
		inner.recompute_total_holders_mode();
		return RequestOutcome::Granted(entry);
	}

	if cond {
		return RequestOutcome::RejectedTimeout;
	}

	let entry = LockEntry::new(tran_index, key, LockMode::Null);
	entry.set_blocked_mode(Some(lock));
	entry.set_granted_mode(LockMode::Null);
	inner.waiters.push(entry.clone());
	inner.recompute_total_waiters_mode();
	RequestOutcome::MustWait(entry)
}

fn resource_key(oid: u64, class_oid: u64) -> LockResourceKey {
	if class_oid != 0 {
		LockResourceKey::instance(oid, class_oid)
	} else if oid == 0 {
		LockResourceKey::root_class()
	} else {
		LockResourceKey::class(oid)
	}
}

fn should_move_to_non2pl(tran: &TranLock) -> bool {
	// READ COMMITTED releases-before-end-of-transaction are the only
	// releases that populate the non-2PL list (spec §4.15). Isolation
	// level itself is tracked by the transaction manager, out of this
	// crate's scope (spec §1 Non-goals); callers signal it by calling
	// `unlock_object` with `release_flag = true` before end-of-transaction,
	// which is the only case this crate can observe directly.
	tran.is_active()
}

fn resource_ngranules(table: &LockTable, class_oid: u64) -> u32 {
	table
		.resources
		.get(&LockResourceKey::class(class_oid))
		.map(|r| r.inner.lock().expect("resource mutex poisoned").ngranules)
		.unwrap_or(0)
}

fn increment_ngranules(table: &LockTable, class_oid: u64) {
	if let Some(r) = table.resources.get(&LockResourceKey::class(class_oid)) {
		r.inner.lock().expect("resource mutex poisoned").ngranules += 1;
	}
}

fn decrement_ngranules(table: &LockTable, class_oid: u64) {
	if let Some(r) = table.resources.get(&LockResourceKey::class(class_oid)) {
		let mut inner = r.inner.lock().expect("resource mutex poisoned");
		inner.ngranules = inner.ngranules.saturating_sub(1);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> LockTable { LockTable::new(100, false) }

	/// P6: acquiring the same lock twice and releasing it twice leaves no
	/// trace of the resource behind.
	#[test]
	fn lock_count_is_conserved_across_repeat_grant_and_release() {
		let table = table();
		table.register_transaction(1, 101, None);

		table.lock_object(1, 10, 5, LockMode::S, false, None).unwrap();
		table.lock_object(1, 10, 5, LockMode::S, false, None).unwrap();
		assert_eq!(table.resources.len(), 1);

		table.unlock_object(1, 10, 5, false).unwrap();
		assert_eq!(table.resources.len(), 1, "one release of two must not drop the resource");

		table.unlock_object(1, 10, 5, false).unwrap();
		assert_eq!(table.resources.len(), 0, "second release must remove the now-empty resource");
	}

	/// P7: a transaction never ends up with two holder entries on the same
	/// resource; repeat requests convert the existing entry in place.
	#[test]
	fn no_doublet_holder_entries_for_one_transaction() {
		let table = table();
		table.register_transaction(1, 101, None);

		table.lock_object(1, 10, 5, LockMode::Is, false, None).unwrap();
		table.lock_object(1, 10, 5, LockMode::S, false, None).unwrap();
		table.lock_object(1, 10, 5, LockMode::X, false, None).unwrap();

		let resource = table.resources.get(&LockResourceKey::instance(10, 5)).unwrap();
		let inner = resource.inner.lock().unwrap();
		assert_eq!(inner.holders.iter().filter(|h| h.tran_index == 1).count(), 1);
	}

	/// P8: converting a held lock to a stronger mode never decreases the
	/// granted mode under `conv`'s ordering (`conv(old, new) == new`).
	#[test]
	fn conversion_never_decreases_granted_mode() {
		let table = table();
		table.register_transaction(1, 101, None);

		let first = table.lock_object(1, 10, 5, LockMode::Is, false, None).unwrap();
		let second = table.lock_object(1, 10, 5, LockMode::X, false, None).unwrap();
		assert_eq!(first, LockMode::Is);
		assert_eq!(second, LockMode::X);
		assert_eq!(conv(first, second), second, "X must dominate IS under the lattice join");
	}

	/// P9: two requests whose modes are compatible under `comp` both grant
	/// without either side waiting.
	#[test]
	fn compatible_requests_both_grant_immediately() {
		let table = table();
		table.register_transaction(1, 101, None);
		table.register_transaction(2, 102, None);

		let a = table.lock_object(1, 10, 5, LockMode::Is, true, Some(Duration::ZERO)).unwrap();
		let b = table.lock_object(2, 10, 5, LockMode::Is, true, Some(Duration::ZERO)).unwrap();
		assert_eq!(a, LockMode::Is);
		assert_eq!(b, LockMode::Is);
	}

	/// S6: with `lk_escalation_at = 3`, holding IX on a class and then X on
	/// three of its instances escalates to X on the class and clears the
	/// three dominated instance-level holds.
	#[test]
	fn escalation_promotes_to_class_lock_and_clears_instance_holds() {
		let table = LockTable::new(3, false);
		table.register_transaction(1, 101, None);

		table.lock_object(1, 1, 0, LockMode::Ix, false, None).unwrap();
		table.lock_object(1, 100, 1, LockMode::X, false, None).unwrap();
		table.lock_object(1, 101, 1, LockMode::X, false, None).unwrap();
		table.lock_object(1, 102, 1, LockMode::X, false, None).unwrap();

		let tran = table.transaction(1).unwrap();
		let class_hold = tran.find_class_hold(&LockResourceKey::class(1)).expect("class hold must still exist");
		assert_eq!(class_hold.granted_mode(), LockMode::X, "class lock must have escalated to X");

		for oid in [100, 101, 102] {
			assert!(
				tran.find_inst_hold(&LockResourceKey::instance(oid, 1)).is_none(),
				"instance hold on oid {oid} must be cleared after escalation"
			);
		}
	}
}
