//! Lock escalation (spec §4.14): replacing many fine-grained instance locks
//! on one class with a single coarser class lock once the granule count
//! crosses `lk_escalation_at`.

use std::{sync::Arc, time::Duration};

use tracing::{debug, warn};

use crate::{
	error::{Error, Result},
	lock_table::LockTable,
	mode::LockMode,
	resource::LockResourceKey,
	tran_lock::TranLock,
};

/// Called after every instance lock grant once the owning class resource's
/// `ngranules` has reached the threshold. A no-op if escalation is already
/// in progress for this transaction (serialized via `try_begin_escalation`)
/// or if the held class mode doesn't call for one of the two escalation
/// targets.
pub(crate) fn maybe_escalate(table: &LockTable, tran: &Arc<TranLock>, class_oid: u64, rollback_on_escalation: bool) -> Result<()> {
	if !tran.try_begin_escalation() {
		return Ok(());
	}
	let result = do_escalate(table, tran, class_oid, rollback_on_escalation);
	tran.end_escalation();
	result
}

fn do_escalate(table: &LockTable, tran: &Arc<TranLock>, class_oid: u64, rollback_on_escalation: bool) -> Result<()> {
	let class_key = LockResourceKey::class(class_oid);
	let Some(class_entry) = tran.find_class_hold(&class_key) else {
		return Ok(());
	};

	let target = match class_entry.granted_mode() {
		| LockMode::Ix | LockMode::Six => LockMode::X,
		| LockMode::Is => LockMode::S,
		| _ => return Ok(()),
	};

	match table.lock_object(tran.tran_index, class_oid, 0, target, true, Some(Duration::ZERO)) {
		| Ok(granted) => {
			debug!(tran_index = tran.tran_index, class_oid, %granted, "lock escalated");
			clear_dominated_instance_locks(table, tran, class_oid, granted);
			Ok(())
		},
		| Err(err) => {
			warn!(tran_index = tran.tran_index, class_oid, %target, "lock escalation failed");
			if rollback_on_escalation {
				Err(Error::AbortDueRollbackOnEscalation)
			} else {
				Err(err)
			}
		},
	}
}

/// Releases every instance-level hold under `class_oid` now implied by the
/// escalated class lock, waking any of their own waiters/converters in the
/// process.
fn clear_dominated_instance_locks(table: &LockTable, tran: &Arc<TranLock>, class_oid: u64, escalated_mode: LockMode) {
	for entry in tran.inst_holds_under_class(class_oid) {
		if crate::mode::conv(escalated_mode, entry.granted_mode()) != escalated_mode {
			// Not actually dominated (shouldn't happen for X/S targets, but
			// guards against a future escalation strategy that isn't total).
			continue;
		}

		let Some(resource) = table.resources.get(&entry.resource_key) else { continue };
		let mut inner = resource.inner.lock().expect("resource mutex poisoned");
		inner.holders.retain(|e| !Arc::ptr_eq(e, &entry));
		inner.recompute_total_holders_mode();

		if let Some(class_resource) = table.resources.get(&LockResourceKey::class(class_oid)) {
			let mut class_inner = class_resource.inner.lock().expect("resource mutex poisoned");
			class_inner.ngranules = class_inner.ngranules.saturating_sub(1);
		}

		if inner.is_empty() {
			drop(inner);
			table.resources.remove_if_empty(&entry.resource_key);
		} else {
			crate::granting::grant_blocked_holder(&mut inner);
			crate::granting::grant_blocked_waiter(&mut inner);
		}
	}

	tran.retain_inst_holds(|e| e.resource_key.class_oid != class_oid);
}
