//! `async_disconnect_handler<T>`: retires handlers off the request threads
//! by dropping them on a background thread instead of the caller's thread
//! (spec §4.8). The owner MUST call `terminate()` before its own destructor;
//! after `terminate()`, any further `disconnect()` is a contract violation.

use std::{
	collections::VecDeque,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc, Condvar, Mutex,
	},
	thread::JoinHandle,
	time::Duration,
};

const CYCLE_TIMEOUT: Duration = Duration::from_secs(1);

pub struct AsyncDisconnectHandler<T: Send + 'static> {
	queue: Arc<(Mutex<VecDeque<T>>, Condvar)>,
	terminated: Arc<AtomicBool>,
	shutdown: Arc<AtomicBool>,
	thread: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + 'static> AsyncDisconnectHandler<T> {
	pub fn new() -> Self {
		let queue = Arc::new((Mutex::new(VecDeque::new()), Condvar::new()));
		let shutdown = Arc::new(AtomicBool::new(false));

		let thread_queue = Arc::clone(&queue);
		let thread_shutdown = Arc::clone(&shutdown);
		let handle = std::thread::spawn(move || {
			loop {
				let mut buffer: VecDeque<T> = VecDeque::new();
				{
					let (lock, cv) = &*thread_queue;
					let mut guard = lock.lock().expect("disconnect queue mutex poisoned");
					if guard.is_empty() {
						let (g, _) = cv
							.wait_timeout(guard, CYCLE_TIMEOUT)
							.expect("disconnect queue condvar poisoned");
						guard = g;
					}
					std::mem::swap(&mut *guard, &mut buffer);
				}

				// letting `buffer` drop here runs T's destructors (joining any
				// receiver/sender threads inside T) off the caller's thread.
				drop(buffer);

				if thread_shutdown.load(Ordering::Acquire) {
					let (lock, _) = &*thread_queue;
					if lock.lock().expect("disconnect queue mutex poisoned").is_empty() {
						break;
					}
				}
			}
		});

		Self {
			queue,
			terminated: Arc::new(AtomicBool::new(false)),
			shutdown,
			thread: Mutex::new(Some(handle)),
		}
	}

	/// Enqueue `handle` to be dropped on the background thread.
	pub fn disconnect(&self, handle: T) {
		assert!(
			!self.terminated.load(Ordering::Acquire),
			"disconnect() called after terminate(): contract violation"
		);

		let (lock, cv) = &*self.queue;
		lock.lock().expect("disconnect queue mutex poisoned").push_back(handle);
		cv.notify_one();
	}

	/// Must be called before this handler is dropped.
	pub fn terminate(&self) {
		self.terminated.store(true, Ordering::Release);
		self.shutdown.store(true, Ordering::Release);
		let (_, cv) = &*self.queue;
		cv.notify_one();
		if let Some(handle) = self.thread.lock().expect("thread mutex poisoned").take() {
			let _ = handle.join();
		}
	}
}

impl<T: Send + 'static> Default for AsyncDisconnectHandler<T> {
	fn default() -> Self { Self::new() }
}
