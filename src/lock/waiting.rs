//! The waiter-owned condvar + mailbox (spec §4.10 step 6, §9 design note:
//! "the waiter-owned condvar + mailbox pattern ... maps cleanly to a
//! per-thread `{mutex, condvar, enum state}` triple").

use std::{
	sync::{Condvar, Mutex},
	time::{Duration, Instant},
};

/// The state a suspended lock waiter resumes in. Preserve this enum exactly
/// as the resumption contract between the request algorithm and whatever
/// resumes it (granter, timeout, or deadlock detector) — spec §4.10 step 6.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResumeState {
	Suspended,
	Resumed,
	ResumedTimeout,
	ResumedDeadlockTimeout,
	ResumedAbortedFirst,
	ResumedAbortedOther,
	ResumedInterrupt,
}

pub struct WaitSlot {
	state: Mutex<ResumeState>,
	condvar: Condvar,
	/// When this wait began; used by the deadlock detector's stale-edge
	/// pruning (spec §4.16 step 3: an edge whose target's
	/// `thrd_wait_stime > edge_wait_stime` is discarded).
	pub wait_stime: Instant,
	/// Whether this wait has a finite `wait_msecs`, used by victim
	/// selection's "prefer a transaction that can timeout" tiebreak.
	pub can_timeout: bool,
}

impl WaitSlot {
	#[must_use]
	pub fn new(can_timeout: bool) -> Self {
		Self {
			state: Mutex::new(ResumeState::Suspended),
			condvar: Condvar::new(),
			wait_stime: Instant::now(),
			can_timeout,
		}
	}

	/// Blocks the calling thread until `resume` sets a non-`Suspended` state,
	/// or `wait_msecs` elapses (`None` waits indefinitely). Returns
	/// `ResumeState::ResumedTimeout` on its own timeout, never leaving the
	/// slot `Suspended`.
	#[must_use]
	pub fn suspend(&self, wait_msecs: Option<Duration>) -> ResumeState {
		let guard = self.state.lock().expect("wait slot mutex poisoned");
		let (mut guard, timed_out) = match wait_msecs {
			| Some(d) => {
				let (g, r) = self
					.condvar
					.wait_timeout_while(guard, d, |s| *s == ResumeState::Suspended)
					.expect("wait slot condvar poisoned");
				(g, r.timed_out())
			},
			| None => (
				self.condvar
					.wait_while(guard, |s| *s == ResumeState::Suspended)
					.expect("wait slot condvar poisoned"),
				false,
			),
		};

		if timed_out && *guard == ResumeState::Suspended {
			*guard = ResumeState::ResumedTimeout;
		}
		*guard
	}

	/// Resumes the waiter with `state`. Idempotent once a terminal state is
	/// set — the first writer wins, matching the contract that a waiter is
	/// resumed in exactly one of the enumerated states.
	pub fn resume(&self, state: ResumeState) {
		let mut guard = self.state.lock().expect("wait slot mutex poisoned");
		if *guard == ResumeState::Suspended {
			*guard = state;
			self.condvar.notify_all();
		}
	}
}

impl Default for WaitSlot {
	fn default() -> Self { Self::new(true) }
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread, time::Duration};

	use super::*;

	#[test]
	fn resume_wakes_suspended_waiter() {
		let slot = Arc::new(WaitSlot::new(true));
		let slot2 = Arc::clone(&slot);
		let handle = thread::spawn(move || slot2.suspend(None));

		thread::sleep(Duration::from_millis(20));
		slot.resume(ResumeState::Resumed);

		assert_eq!(handle.join().unwrap(), ResumeState::Resumed);
	}

	#[test]
	fn suspend_times_out_without_resume() {
		let slot = WaitSlot::new(true);
		let state = slot.suspend(Some(Duration::from_millis(20)));
		assert_eq!(state, ResumeState::ResumedTimeout);
	}
}
