//! Deadlock detection (spec §4.16). A background pass builds a wait-for
//! graph (`wfg_node`/`wfg_edge`) from the live resource table, finds cycles,
//! and resolves each by resuming exactly one waiter per cycle in a terminal
//! state instead of letting it wait for a grant that will never come.
//!
//! Unlike the original's incrementally-maintained graph, this rebuilds the
//! graph from scratch every pass by reading each resource's holder/waiter
//! lists live under its own mutex (spec §9's snapshot-iteration note). A
//! freshly built graph cannot contain a stale edge, so the original's
//! cross-pass edge-staleness bookkeeping (comparing `edge_wait_stime` against
//! a target's `thrd_wait_stime`) has no counterpart here.

use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, AtomicU64, Ordering},
		Arc,
	},
	time::Duration,
};

use tracing::{info, warn};

use crate::{
	lock_table::LockTable,
	mode::comp,
	waiting::ResumeState,
};

/// Hard cap on victims resolved in a single pass, guarding against a
/// pathological graph turning one pass into unbounded work (spec §4.16).
const LK_MAX_VICTIM_COUNT: usize = 300;

#[derive(Debug, Default)]
pub struct DeadlockDetectorStats {
	passes_run: AtomicU64,
	victims_selected: AtomicU64,
	forced_timeouts: AtomicU64,
}

impl DeadlockDetectorStats {
	#[must_use]
	pub fn passes_run(&self) -> u64 { self.passes_run.load(Ordering::Relaxed) }

	#[must_use]
	pub fn victims_selected(&self) -> u64 { self.victims_selected.load(Ordering::Relaxed) }

	#[must_use]
	pub fn forced_timeouts(&self) -> u64 { self.forced_timeouts.load(Ordering::Relaxed) }
}

/// A `(from, to)` wait-for edge: `from` cannot proceed until `to`'s hold on
/// the resource changes.
struct WfgEdge {
	to: u32,
}

/// Runs detector passes until `shutdown` is set, sleeping for `interval`
/// between passes but waking early when `table.wake` is notified (a new
/// waiter was just registered).
pub(crate) fn run_daemon(table: &Arc<LockTable>, interval: Duration, shutdown: &AtomicBool) {
	while !shutdown.load(Ordering::Acquire) {
		run_pass(table);

		let (lock, cv) = &*table.wake;
		let guard = lock.lock().expect("wake mutex poisoned");
		let _ = cv.wait_timeout(guard, interval);
	}
}

/// Runs exactly one detection pass and returns the number of victims
/// resolved, for callers (tests, the daemon loop) that want to observe
/// progress directly.
pub(crate) fn run_pass(table: &Arc<LockTable>) -> usize {
	table.deadlock_stats.passes_run.fetch_add(1, Ordering::Relaxed);

	let graph = build_wait_for_graph(table);
	if graph.is_empty() {
		return 0;
	}

	let mut resolved = Vec::new();
	let mut removed: std::collections::HashSet<u32> = std::collections::HashSet::new();

	loop {
		if resolved.len() >= LK_MAX_VICTIM_COUNT {
			warn!(cap = LK_MAX_VICTIM_COUNT, "deadlock detector victim cap reached this pass");
			break;
		}
		let Some(cycle) = find_cycle(&graph, &removed) else { break };
		let Some(victim) = select_victim(table, &cycle) else { break };
		removed.insert(victim);
		resolved.push(victim);
	}

	for (i, tran_index) in resolved.iter().enumerate() {
		resolve_victim(table, *tran_index, i == 0);
	}

	if !resolved.is_empty() {
		info!(victims = resolved.len(), "deadlock detector resolved cycle(s)");
		table.deadlock_stats.victims_selected.fetch_add(resolved.len() as u64, Ordering::Relaxed);
	}
	resolved.len()
}

fn build_wait_for_graph(table: &Arc<LockTable>) -> HashMap<u32, Vec<WfgEdge>> {
	let mut graph: HashMap<u32, Vec<WfgEdge>> = HashMap::new();

	for resource in table.resources.snapshot_resources() {
		let inner = resource.inner.lock().expect("resource mutex poisoned");

		// Blocked holders (converters) wait for every other holder whose
		// mode conflicts with the mode they're converting into.
		for (i, holder) in inner.holders.iter().enumerate() {
			let Some(blocked_mode) = holder.blocked_mode() else { continue };
			let edges = graph.entry(holder.tran_index).or_default();
			for (j, other) in inner.holders.iter().enumerate() {
				if i == j || comp(blocked_mode, other.granted_mode()) {
					continue;
				}
				edges.push(WfgEdge { to: other.tran_index });
			}
		}

		// Waiters wait for every holder whose granted mode conflicts, and
		// for every earlier-queued waiter whose requested mode conflicts
		// (FIFO ordering means an earlier incompatible waiter must be
		// granted, or removed, before this one can be considered).
		for (i, waiter) in inner.waiters.iter().enumerate() {
			let blocked_mode = waiter.blocked_mode().unwrap_or(crate::mode::LockMode::Null);
			let edges = graph.entry(waiter.tran_index).or_default();

			for holder in &inner.holders {
				if !comp(blocked_mode, holder.granted_mode()) {
					edges.push(WfgEdge { to: holder.tran_index });
				}
				if let Some(b) = holder.blocked_mode() {
					if !comp(blocked_mode, b) {
						edges.push(WfgEdge { to: holder.tran_index });
					}
				}
			}
			for earlier in &inner.waiters[..i] {
				let earlier_mode = earlier.blocked_mode().unwrap_or(crate::mode::LockMode::Null);
				if !comp(blocked_mode, earlier_mode) {
					edges.push(WfgEdge { to: earlier.tran_index });
				}
			}
		}
	}

	graph
}

/// Depth-first search for one cycle among nodes not already in `removed`.
/// Returns the cycle as the list of `tran_index` values it passes through.
fn find_cycle(graph: &HashMap<u32, Vec<WfgEdge>>, removed: &std::collections::HashSet<u32>) -> Option<Vec<u32>> {
	let mut visited = std::collections::HashSet::new();

	for &start in graph.keys() {
		if removed.contains(&start) || visited.contains(&start) {
			continue;
		}
		let mut stack = Vec::new();
		let mut on_stack = std::collections::HashSet::new();
		if let Some(cycle) = dfs(start, graph, removed, &mut visited, &mut stack, &mut on_stack) {
			return Some(cycle);
		}
	}
	None
}

fn dfs(
	node: u32, graph: &HashMap<u32, Vec<WfgEdge>>, removed: &std::collections::HashSet<u32>, visited: &mut std::collections::HashSet<u32>,
	stack: &mut Vec<u32>, on_stack: &mut std::collections::HashSet<u32>,
) -> Option<Vec<u32>> {
	if removed.contains(&node) {
		return None;
	}
	visited.insert(node);
	stack.push(node);
	on_stack.insert(node);

	if let Some(edges) = graph.get(&node) {
		for edge in edges {
			if removed.contains(&edge.to) {
				continue;
			}
			if on_stack.contains(&edge.to) {
				let start = stack.iter().position(|&n| n == edge.to).expect("on_stack implies present in stack");
				return Some(stack[start..].to_vec());
			}
			if !visited.contains(&edge.to) {
				if let Some(cycle) = dfs(edge.to, graph, removed, visited, stack, on_stack) {
					return Some(cycle);
				}
			}
		}
	}

	stack.pop();
	on_stack.remove(&node);
	None
}

/// Picks one transaction out of `cycle` to abort (spec §4.16 step 5):
/// prefer one without deadlock priority, then fewer log records written
/// (less rollback work lost), then one that is already inactive, then the
/// youngest `tranid` (least sunk progress), then the lowest `tran_index` as
/// a final deterministic tiebreak. Whether the victim's own wait can still
/// simply time out is decided separately, in `resolve_victim`.
fn select_victim(table: &LockTable, cycle: &[u32]) -> Option<u32> {
	cycle
		.iter()
		.filter_map(|&tran_index| table.transaction(tran_index).map(|t| (tran_index, t)))
		.min_by_key(|(tran_index, t)| {
			(
				t.has_deadlock_priority(),
				t.num_log_records(),
				t.is_active(),
				std::cmp::Reverse(t.tranid),
				*tran_index,
			)
		})
		.map(|(tran_index, _)| tran_index)
}

/// Finds every entry belonging to `tran_index` that currently carries a
/// suspended wait, across every resource, and resumes it in a terminal
/// state instead of letting it wait for a grant. Then releases every lock
/// the victim holds — matching a real rollback's `lock_unlock_all`, and
/// the only thing that actually frees whatever the rest of the cycle was
/// waiting on (resuming the victim's own wait only clears the one resource
/// *it* was blocked on, not the locks it held that blocked everyone else).
fn resolve_victim(table: &LockTable, tran_index: u32, is_first: bool) {
	for resource in table.resources.snapshot_resources() {
		let inner = resource.inner.lock().expect("resource mutex poisoned");
		let candidates = inner
			.holders
			.iter()
			.chain(inner.waiters.iter())
			.filter(|e| e.tran_index == tran_index)
			.cloned()
			.collect::<Vec<_>>();
		drop(inner);

		for entry in candidates {
			let Some(wait) = entry.take_wait() else { continue };
			if wait.can_timeout {
				wait.resume(ResumeState::ResumedDeadlockTimeout);
				table.deadlock_stats.forced_timeouts.fetch_add(1, Ordering::Relaxed);
			} else if is_first {
				wait.resume(ResumeState::ResumedAbortedFirst);
			} else {
				wait.resume(ResumeState::ResumedAbortedOther);
			}
		}
	}

	table.unlock_all(tran_index);
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use super::*;
	use crate::mode::LockMode;

	#[test]
	fn two_transaction_cycle_yields_exactly_one_victim() {
		let table = Arc::new(LockTable::new(100, false));
		table.register_transaction(1, 101, None);
		table.register_transaction(2, 102, None);

		table.lock_object(1, 10, 5, LockMode::X, false, Some(Duration::ZERO)).unwrap();
		table.lock_object(2, 20, 5, LockMode::X, false, Some(Duration::ZERO)).unwrap();

		let t1 = Arc::clone(&table);
		let h1 = std::thread::spawn(move || t1.lock_object(1, 20, 5, LockMode::X, false, None));
		std::thread::sleep(Duration::from_millis(30));
		let t2 = Arc::clone(&table);
		let h2 = std::thread::spawn(move || t2.lock_object(2, 10, 5, LockMode::X, false, None));
		std::thread::sleep(Duration::from_millis(30));

		let victims = run_pass(&table);
		assert_eq!(victims, 1, "a two-transaction cycle must resolve to exactly one victim");

		let r1 = h1.join().unwrap();
		let r2 = h2.join().unwrap();
		assert!(r1.is_err() ^ r2.is_err(), "exactly one side of the cycle must fail");
	}
}
