//! `lock_entry`: the node type shared by a resource's holder list, waiter
//! list, and a transaction's hold list (spec §3.2). The same struct plays
//! all three roles; which list(s) it is currently linked into is tracked by
//! the caller, not by a field on the entry itself.

use std::sync::{Arc, Mutex};

use crate::{mode::LockMode, waiting::WaitSlot};

pub(crate) struct LockEntryState {
	pub granted_mode: LockMode,
	pub blocked_mode: Option<LockMode>,
	pub count: u32,
	pub instant_lock_count: u32,
	/// Present while this entry is on a waiter list; holds the suspended
	/// thread's resumption mailbox (spec §9 "condvar-based suspension").
	pub wait: Option<Arc<WaitSlot>>,
}

pub struct LockEntry {
	pub tran_index: u32,
	pub resource_key: crate::resource::LockResourceKey,
	pub(crate) state: Mutex<LockEntryState>,
}

pub type EntryHandle = Arc<LockEntry>;

impl LockEntry {
	#[must_use]
	pub fn new(tran_index: u32, resource_key: crate::resource::LockResourceKey, granted_mode: LockMode) -> EntryHandle {
		Arc::new(Self {
			tran_index,
			resource_key,
			state: Mutex::new(LockEntryState {
				granted_mode,
				blocked_mode: None,
				count: 1,
				instant_lock_count: 0,
				wait: None,
			}),
		})
	}

	#[must_use]
	pub fn granted_mode(&self) -> LockMode { self.state.lock().expect("entry mutex poisoned").granted_mode }

	#[must_use]
	pub fn blocked_mode(&self) -> Option<LockMode> { self.state.lock().expect("entry mutex poisoned").blocked_mode }

	#[must_use]
	pub fn count(&self) -> u32 { self.state.lock().expect("entry mutex poisoned").count }

	#[must_use]
	pub fn instant_lock_count(&self) -> u32 { self.state.lock().expect("entry mutex poisoned").instant_lock_count }

	pub fn set_granted_mode(&self, mode: LockMode) { self.state.lock().expect("entry mutex poisoned").granted_mode = mode; }

	pub fn set_blocked_mode(&self, mode: Option<LockMode>) { self.state.lock().expect("entry mutex poisoned").blocked_mode = mode; }

	pub fn bump_count(&self, instant: bool) {
		let mut s = self.state.lock().expect("entry mutex poisoned");
		s.count += 1;
		if instant {
			s.instant_lock_count += 1;
		}
	}

	/// `false` if the count reached zero and the caller must unlink this
	/// entry from its lists; `true` if it is still held.
	#[must_use]
	pub fn drop_count(&self, instant: bool) -> bool {
		let mut s = self.state.lock().expect("entry mutex poisoned");
		s.count = s.count.saturating_sub(1);
		if instant {
			s.instant_lock_count = s.instant_lock_count.saturating_sub(1);
		}
		s.count > 0
	}

	pub fn install_wait(&self, wait: Arc<WaitSlot>) { self.state.lock().expect("entry mutex poisoned").wait = Some(wait); }

	/// Returns the installed `WaitSlot` without removing it, for the waiter
	/// itself to suspend on while leaving it in place for a granter to find
	/// via `take_wait`.
	#[must_use]
	pub fn wait(&self) -> Option<Arc<WaitSlot>> { self.state.lock().expect("entry mutex poisoned").wait.clone() }

	#[must_use]
	pub fn take_wait(&self) -> Option<Arc<WaitSlot>> { self.state.lock().expect("entry mutex poisoned").wait.take() }
}
