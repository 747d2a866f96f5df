//! Non-2PL list bookkeeping (spec §4.15). A non-2PL entry records a lock
//! released before end-of-transaction under READ COMMITTED; later
//! acquisitions on that resource check every entry for an isolation
//! violation and, if found, promote it so the releaser can be notified.

use crate::mode::LockMode;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Non2plState {
	Recorded,
	InconNonTwoPhaseLock,
}

/// Lives on both the resource's non-2PL list and the releasing
/// transaction's own non-2PL list (spec §3.2, §4.15).
#[derive(Clone)]
pub struct Non2plEntry {
	pub tran_index: u32,
	pub resource_key: crate::resource::LockResourceKey,
	pub released_mode: LockMode,
	pub state: Non2plState,
}

impl Non2plEntry {
	#[must_use]
	pub fn new(tran_index: u32, resource_key: crate::resource::LockResourceKey, released_mode: LockMode) -> Self {
		Self { tran_index, resource_key, released_mode, state: Non2plState::Recorded }
	}
}

/// Inspects every entry in `resource`'s non-2PL list against an
/// incoming `new_mode` request; any entry incompatible with it is promoted
/// to `InconNonTwoPhaseLock`. Returns the `tran_index` of each transaction
/// whose entry was promoted in this pass (a transaction may appear more
/// than once if it released several modes on the same resource), for the
/// caller to notify the owning transaction and bump its `num_incons_non2pl`.
pub(crate) fn check_incoming_against_non2pl(non2pl: &mut [Non2plEntry], new_mode: LockMode) -> Vec<u32> {
	let mut promoted = Vec::new();
	for entry in non2pl.iter_mut() {
		if entry.state == Non2plState::Recorded && !crate::mode::comp(new_mode, entry.released_mode) {
			entry.state = Non2plState::InconNonTwoPhaseLock;
			promoted.push(entry.tran_index);
		}
	}
	promoted
}

/// Mirrors a promotion recorded on a resource's non-2PL list onto a
/// transaction's own copy, so `notify_isolation_incons` can later report it
/// to that transaction specifically.
pub(crate) fn mark_promoted(non2pl: &mut [Non2plEntry], resource_key: crate::resource::LockResourceKey) {
	for entry in non2pl.iter_mut() {
		if entry.resource_key == resource_key && entry.state == Non2plState::Recorded {
			entry.state = Non2plState::InconNonTwoPhaseLock;
		}
	}
}

/// `lock_notify_isolation_incons` (SPEC_FULL §11.3): walks `non2pl`,
/// invoking `callback` for each `InconNonTwoPhaseLock` entry. The callback
/// may return `false` to stop early.
pub fn notify_isolation_incons(non2pl: &[Non2plEntry], mut callback: impl FnMut(&crate::resource::LockResourceKey) -> bool) {
	for entry in non2pl {
		if entry.state == Non2plState::InconNonTwoPhaseLock && !callback(&entry.resource_key) {
			break;
		}
	}
}
