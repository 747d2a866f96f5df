//! Partitioned hash of waiters keyed by rsn, turning asynchronous replies
//! into synchronous `send_recv` (spec §4.6).

use std::{
	collections::HashMap,
	sync::{Arc, Condvar, Mutex},
};

use crate::error::Error;

struct Bucket<T> {
	state: Mutex<BucketState<T>>,
	condvar: Condvar,
}

struct BucketState<T> {
	responses: HashMap<u64, T>,
	stopped: bool,
}

/// Fixed-bucket-count broker. Bucket count is chosen at construction time
/// (config: `response_broker_bucket_count`), ideally at least the expected
/// peak number of concurrent `send_recv` callers.
pub struct ResponseBroker<T> {
	buckets: Vec<Bucket<T>>,
	stop_error: Error,
}

impl<T: Clone> ResponseBroker<T> {
	pub fn new(bucket_count: usize, stop_error: Error) -> Self {
		assert!(bucket_count > 0, "response_broker_bucket_count must be at least 1");
		let buckets = (0..bucket_count)
			.map(|_| Bucket {
				state: Mutex::new(BucketState {
					responses: HashMap::new(),
					stopped: false,
				}),
				condvar: Condvar::new(),
			})
			.collect();

		Self { buckets, stop_error }
	}

	fn bucket(&self, rsn: u64) -> &Bucket<T> { &self.buckets[(rsn as usize) % self.buckets.len()] }

	/// Deliver a response for `rsn`, waking any waiter on this bucket. A
	/// no-op once the broker has been stopped.
	pub fn register_response(&self, rsn: u64, payload: T) {
		let bucket = self.bucket(rsn);
		let mut state = bucket.state.lock().expect("bucket mutex poisoned");
		if state.stopped {
			return;
		}
		state.responses.insert(rsn, payload);
		bucket.condvar.notify_all();
	}

	/// Block until `rsn`'s response arrives or the broker is stopped.
	pub fn get_response(&self, rsn: u64) -> Result<T, Error> {
		let bucket = self.bucket(rsn);
		let mut state = bucket.state.lock().expect("bucket mutex poisoned");
		loop {
			if let Some(payload) = state.responses.remove(&rsn) {
				return Ok(payload);
			}
			if state.stopped {
				return Err(self.stop_error.clone_for_stop());
			}
			state = bucket.condvar.wait(state).expect("bucket condvar poisoned");
		}
	}

	/// Unblock every outstanding `get_response` across all buckets with the
	/// configured stop error. After this, `register_response` is a no-op.
	pub fn stop(&self) {
		for bucket in &self.buckets {
			let mut state = bucket.state.lock().expect("bucket mutex poisoned");
			state.stopped = true;
			bucket.condvar.notify_all();
		}
	}
}

impl Error {
	fn clone_for_stop(&self) -> Error {
		match self {
			| Error::ErrorOnWrite => Error::ErrorOnWrite,
			| Error::ConnPageServerCannotBeReached => Error::ConnPageServerCannotBeReached,
			| Error::ConnNoPageServerAvailable => Error::ConnNoPageServerAvailable,
			| _ => Error::ErrorOnWrite,
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{sync::Arc, thread, time::Duration};

	use super::ResponseBroker;
	use crate::error::Error;

	#[test]
	fn delivers_registered_response() {
		let broker: ResponseBroker<u32> = ResponseBroker::new(4, Error::ErrorOnWrite);
		broker.register_response(5, 42);
		assert_eq!(broker.get_response(5).unwrap(), 42);
	}

	#[test]
	fn stop_cancels_waiters() {
		let broker = Arc::new(ResponseBroker::<u32>::new(4, Error::ErrorOnWrite));
		let waiter = {
			let broker = Arc::clone(&broker);
			thread::spawn(move || broker.get_response(99))
		};

		thread::sleep(Duration::from_millis(20));
		broker.stop();

		assert!(matches!(waiter.join().unwrap(), Err(Error::ErrorOnWrite)));
		assert!(matches!(broker.get_response(100), Err(Error::ErrorOnWrite)));
	}
}
