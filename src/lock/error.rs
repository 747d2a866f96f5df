/// Errors surfaced by the lock manager's entry points (spec §6.4, §7).
///
/// `Granted` is not represented here — entry points return `Ok(LockMode)` on
/// success and one of these on failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// `LK_NOTGRANTED_DUE_TIMEOUT`: a conditional request couldn't be granted
	/// immediately, or an unconditional wait exceeded `wait_msecs`.
	#[error("lock not granted: timed out")]
	NotGrantedDueTimeout,

	/// `LK_NOTGRANTED_DUE_ABORTED`: the waiter's transaction was selected as
	/// a deadlock victim and driven through abort.
	#[error("lock not granted: transaction aborted")]
	NotGrantedDueAborted,

	/// `LK_NOTGRANTED_DUE_ERROR`: resource/entry allocation failure, or any
	/// other non-retryable condition.
	#[error("lock not granted: {0}")]
	NotGrantedDueError(String),

	/// Escalation failed and `lk_rollback_on_lock_escalation` is set.
	#[error("transaction aborted due to failed lock escalation")]
	AbortDueRollbackOnEscalation,

	/// Shutdown or a user interrupt resumed the waiter.
	#[error("lock wait interrupted")]
	Interrupted,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
