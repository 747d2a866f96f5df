//! Granting policy: promoting blocked holders (converters) and blocked
//! waiters once a release changes what is compatible (spec §4.13). All
//! functions here run with the resource's mutex already held.

use crate::{
	entry::EntryHandle,
	mode::{comp, conv, LockMode},
	resource::LockResourceInner,
	upr,
	waiting::ResumeState,
};

/// Join of every holder's mode except `skip`'s, used to test a blocked
/// holder's or waiter's mode against "everyone else".
fn holders_mode_excluding(holders: &[EntryHandle], skip: &EntryHandle) -> LockMode {
	holders
		.iter()
		.filter(|h| !std::sync::Arc::ptr_eq(h, skip))
		.fold(LockMode::Null, |acc, h| conv(acc, h.granted_mode()))
}

/// Iterates the holder list; promotes each blocked converter in turn while
/// it is compatible with every other holder's granted mode. Stops at the
/// first incompatibility (spec §4.13).
pub(crate) fn grant_blocked_holder(inner: &mut LockResourceInner) {
	loop {
		let candidate = inner.holders.iter().find(|h| h.blocked_mode().is_some()).cloned();
		let Some(candidate) = candidate else { break };

		let blocked_mode = candidate.blocked_mode().expect("filtered for Some above");
		let others_mode = holders_mode_excluding(&inner.holders, &candidate);

		if !comp(blocked_mode, others_mode) {
			break;
		}

		candidate.set_granted_mode(blocked_mode);
		candidate.set_blocked_mode(None);
		upr::reposition(&mut inner.holders, candidate.clone());
		inner.recompute_total_holders_mode();

		if let Some(wait) = candidate.take_wait() {
			wait.resume(ResumeState::Resumed);
		}
	}
}

/// Iterates the waiter list in FIFO order; promotes each waiter compatible
/// with the current total holders mode, stopping at the first
/// incompatibility to preserve order (spec §4.13).
pub(crate) fn grant_blocked_waiter(inner: &mut LockResourceInner) { grant_blocked_waiter_partial(inner, 0); }

/// Promotes the suffix of the waiter list starting at index `from`,
/// accumulating the combined mode of the preceding still-waiting waiters
/// (spec §4.13's `grant_blocked_waiter_partial`).
pub(crate) fn grant_blocked_waiter_partial(inner: &mut LockResourceInner, from: usize) {
	let mut preceding_waiters_mode = inner
		.waiters
		.iter()
		.take(from)
		.fold(LockMode::Null, |acc, w| conv(acc, w.blocked_mode().unwrap_or(LockMode::Null)));

	let mut i = from;
	while i < inner.waiters.len() {
		let waiter = inner.waiters[i].clone();
		let blocked_mode = waiter.blocked_mode().expect("waiter list entries are always blocked");

		if !comp(blocked_mode, inner.total_holders_mode) || !comp(blocked_mode, preceding_waiters_mode) {
			break;
		}

		inner.waiters.remove(i);
		waiter.set_granted_mode(blocked_mode);
		waiter.set_blocked_mode(None);
		upr::reposition(&mut inner.holders, waiter.clone());
		inner.recompute_total_holders_mode();
		inner.recompute_total_waiters_mode();

		if let Some(wait) = waiter.take_wait() {
			wait.resume(ResumeState::Resumed);
		}

		preceding_waiters_mode = conv(preceding_waiters_mode, blocked_mode);
		// `i` is not advanced: the list shifted left after `remove(i)`.
	}
}
