//! `request_sync_send_queue` (multi-producer enqueue, two-mutex drain) and
//! `request_queue_autosend` (single sender thread with timed wakeup), spec
//! §4.5.

use std::{
	collections::VecDeque,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc, Condvar, Mutex,
	},
	thread::JoinHandle,
	time::Duration,
};

use crate::{error::Error, request_client::RequestClient};

pub struct QueueItem {
	pub msg_id: i32,
	pub payload: Vec<u8>,
}

/// FIFO of `(msg_id, payload)` with a queue-mutex (guarding the FIFO itself)
/// split from a send-mutex (guarding the drain), so a producer can keep
/// enqueueing while a sender drains.
pub struct RequestSyncSendQueue {
	queue: Mutex<VecDeque<QueueItem>>,
	not_empty: Condvar,
	send_mutex: Mutex<()>,
	error_handler: Box<dyn Fn(&Error) + Send + Sync>,
}

impl RequestSyncSendQueue {
	pub fn new(error_handler: impl Fn(&Error) + Send + Sync + 'static) -> Self {
		Self {
			queue: Mutex::new(VecDeque::new()),
			not_empty: Condvar::new(),
			send_mutex: Mutex::new(()),
			error_handler: Box::new(error_handler),
		}
	}

	/// Appends under the queue-mutex and signals the condvar. Safe from any
	/// number of concurrent producer threads.
	pub fn push(&self, msg_id: i32, payload: Vec<u8>) {
		let mut queue = self.queue.lock().expect("queue mutex poisoned");
		queue.push_back(QueueItem { msg_id, payload });
		self.not_empty.notify_one();
	}

	/// Swaps the queue into `backbuffer` under the queue-mutex, then drains
	/// `backbuffer` under the send-mutex, emitting each item via `client`.
	pub fn send_all(&self, client: &RequestClient, backbuffer: &mut VecDeque<QueueItem>) {
		{
			let mut queue = self.queue.lock().expect("queue mutex poisoned");
			std::mem::swap(&mut *queue, backbuffer);
		}

		let _send_guard = self.send_mutex.lock().expect("send mutex poisoned");
		while let Some(item) = backbuffer.pop_front() {
			if let Err(e) = client.send(item.msg_id, &item.payload) {
				(self.error_handler)(&e);
			}
		}
	}

	/// `send_all` preceded by a bounded condvar wait. A timeout with an
	/// empty queue is a no-op.
	pub fn wait_not_empty_and_send_all(
		&self, client: &RequestClient, backbuffer: &mut VecDeque<QueueItem>, timeout: Duration,
	) {
		{
			let queue = self.queue.lock().expect("queue mutex poisoned");
			if queue.is_empty() {
				let (queue, timed_out) = self
					.not_empty
					.wait_timeout(queue, timeout)
					.expect("queue condvar poisoned");
				if timed_out.timed_out() && queue.is_empty() {
					return;
				}
			}
		}

		self.send_all(client, backbuffer);
	}
}

/// Single sender thread draining a [`RequestSyncSendQueue`] on a timed loop.
pub struct RequestQueueAutosend {
	shutdown: Arc<AtomicBool>,
	thread: Mutex<Option<JoinHandle<()>>>,
}

const POLL_TIMEOUT: Duration = Duration::from_millis(10);

impl RequestQueueAutosend {
	pub fn start(queue: Arc<RequestSyncSendQueue>, client: Arc<RequestClient>) -> Arc<Self> {
		let shutdown = Arc::new(AtomicBool::new(false));
		let this = Arc::new(Self {
			shutdown: Arc::clone(&shutdown),
			thread: Mutex::new(None),
		});

		let handle = std::thread::spawn(move || {
			let mut backbuffer = VecDeque::new();
			while !shutdown.load(Ordering::Acquire) {
				queue.wait_not_empty_and_send_all(&client, &mut backbuffer, POLL_TIMEOUT);
			}
			// final drain so nothing queued just before shutdown is lost
			queue.send_all(&client, &mut backbuffer);
		});

		*this.thread.lock().expect("thread mutex poisoned") = Some(handle);
		this
	}

	pub fn stop_thread(&self) {
		self.shutdown.store(true, Ordering::Release);
		if let Some(handle) = self.thread.lock().expect("thread mutex poisoned").take() {
			let _ = handle.join();
		}
	}
}

#[cfg(test)]
mod tests {
	use std::{
		net::{TcpListener, TcpStream},
		sync::{Arc, Mutex},
		time::Duration,
	};

	use super::{RequestQueueAutosend, RequestSyncSendQueue};
	use crate::{channel::Channel, request_client::RequestClient};

	fn loopback_client() -> (RequestClient, TcpStream) {
		let listener = TcpListener::bind("127.0.0.1:0").unwrap();
		let addr = listener.local_addr().unwrap();
		let client_stream = TcpStream::connect(addr).unwrap();
		let (server_stream, _) = listener.accept().unwrap();
		let channel = Channel::from_stream("test".into(), client_stream).unwrap();
		(RequestClient::new(Arc::new(Mutex::new(channel))), server_stream)
	}

	#[test]
	fn single_sender_fifo() {
		let (client, mut server_stream) = loopback_client();
		let client = Arc::new(client);
		let queue = Arc::new(RequestSyncSendQueue::new(|_| {}));
		let autosend = RequestQueueAutosend::start(Arc::clone(&queue), Arc::clone(&client));

		for i in 0..50_i32 {
			queue.push(1, i.to_be_bytes().to_vec());
		}

		use std::io::Read;
		let mut received = Vec::new();
		for _ in 0..50 {
			let mut len_buf = [0_u8; 4];
			server_stream.read_exact(&mut len_buf).unwrap();
			let len = i32::from_be_bytes(len_buf) as usize;
			let mut buf = vec![0_u8; len];
			server_stream.read_exact(&mut buf).unwrap();
			let value = i32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]);
			received.push(value);
		}

		autosend.stop_thread();
		assert_eq!(received, (0..50).collect::<Vec<_>>());
		let _ = Duration::from_millis(0);
	}
}
