//! Composite locking (SPEC_FULL §11.5): bulk delete/update statements need
//! to acquire several object locks as one unit, releasing everything taken
//! so far the moment any one of them fails, rather than leaving the caller
//! to unwind partial lock state by hand.

use std::time::Duration;

use crate::{error::Result, lock_table::LockTable, mode::LockMode, resource::LockResourceKey};

pub struct CompositeLock<'a> {
	table: &'a LockTable,
	tran_index: u32,
	acquired: Vec<LockResourceKey>,
}

impl<'a> CompositeLock<'a> {
	#[must_use]
	pub fn new(table: &'a LockTable, tran_index: u32) -> Self { Self { table, tran_index, acquired: Vec::new() } }

	/// Acquires one more lock as part of this unit. On failure, every lock
	/// this `CompositeLock` already holds is released before the error is
	/// returned.
	pub fn add(&mut self, oid: u64, class_oid: u64, lock: LockMode, wait_msecs: Option<Duration>) -> Result<LockMode> {
		match self.table.lock_object(self.tran_index, oid, class_oid, lock, false, wait_msecs) {
			| Ok(granted) => {
				self.acquired.push(if class_oid != 0 {
					LockResourceKey::instance(oid, class_oid)
				} else {
					LockResourceKey::class(oid)
				});
				Ok(granted)
			},
			| Err(err) => {
				self.release_all();
				Err(err)
			},
		}
	}

	/// Releases everything acquired so far without waiting for transaction
	/// end; called automatically on failure, or explicitly once the caller
	/// is done with the whole unit.
	pub fn release_all(&mut self) {
		for key in self.acquired.drain(..) {
			let _ = self.table.unlock_object(self.tran_index, key.oid, key.class_oid, true);
		}
	}

	#[must_use]
	pub fn locked_count(&self) -> usize { self.acquired.len() }
}
