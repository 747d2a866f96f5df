//! Upgrader Positioning Rule: where a holder entry with a non-null
//! `blocked_mode` gets inserted or repositioned in the holder list, so that
//! converters do not starve behind waiters with equal-or-lesser claims
//! (spec §4.11).

use crate::{entry::EntryHandle, mode::comp};

/// Removes `entry` from `holders` if present, then reinserts it at the UPR
/// position. `entry`'s `granted_mode`/`blocked_mode` must already reflect
/// its post-conversion state before calling this.
pub(crate) fn reposition(holders: &mut Vec<EntryHandle>, entry: EntryHandle) {
	holders.retain(|e| !std::sync::Arc::ptr_eq(e, &entry));

	let blocked_mode = entry.blocked_mode();
	let Some(blocked_mode) = blocked_mode else {
		// Case A: unblocked entry goes right before the first still-blocked
		// holder (i.e. after every other unblocked holder).
		let pos = holders.iter().position(|h| h.blocked_mode().is_some()).unwrap_or(holders.len());
		holders.insert(pos, entry);
		return;
	};

	let granted_mode = entry.granted_mode();

	// Case B: scan once for the three candidate predecessors.
	let mut ta: Option<usize> = None;
	let mut tb: Option<usize> = None;
	let mut tc: Option<usize> = None;

	for (i, h) in holders.iter().enumerate() {
		let Some(h_blocked) = h.blocked_mode() else {
			if tc.is_none() {
				tc = Some(i);
			}
			continue;
		};

		if ta.is_none() && comp(h_blocked, blocked_mode) {
			ta = Some(i);
		}
		if tb.is_none() && comp(h.granted_mode(), blocked_mode) && !comp(h_blocked, granted_mode) {
			tb = Some(i);
		}
	}

	let insert_after = ta.or(tb).or(tc);
	match insert_after {
		| Some(i) => holders.insert(i + 1, entry),
		| None => holders.insert(0, entry),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{entry::LockEntry, mode::LockMode, resource::LockResourceKey};

	fn key() -> LockResourceKey { LockResourceKey::instance(1, 1) }

	#[test]
	fn case_a_goes_before_first_blocked() {
		let mut holders = vec![
			LockEntry::new(1, key(), LockMode::Is),
			LockEntry::new(2, key(), LockMode::S),
		];
		holders[1].set_blocked_mode(Some(LockMode::X));

		let newcomer = LockEntry::new(3, key(), LockMode::Is);
		reposition(&mut holders, newcomer.clone());

		let pos = holders.iter().position(|e| std::sync::Arc::ptr_eq(e, &newcomer)).unwrap();
		assert_eq!(pos, 1, "unblocked newcomer must land right before the first blocked holder");
	}

	#[test]
	fn case_b_falls_back_to_head_when_no_candidates() {
		let mut holders = vec![];
		let newcomer = LockEntry::new(1, key(), LockMode::S);
		newcomer.set_blocked_mode(Some(LockMode::X));
		reposition(&mut holders, newcomer.clone());
		assert!(std::sync::Arc::ptr_eq(&holders[0], &newcomer));
	}
}
