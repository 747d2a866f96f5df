//! Registers `MsgId -> handler(payload)` and dispatches on a single receiver
//! thread (spec §4.2).

use std::{
	collections::HashMap,
	sync::{
		atomic::{AtomicBool, Ordering},
		Arc, Mutex,
	},
	thread::JoinHandle,
};

use transerv_core::{debug, error, trace};

use crate::{channel::Channel, error::Result};

pub type Handler = Box<dyn Fn(&[u8]) + Send + Sync>;

/// A single-receiver dispatch table keyed by `MsgId` (an i32 discriminant).
pub struct RequestServer {
	channel: Arc<Mutex<Channel>>,
	handlers: Mutex<HashMap<i32, Handler>>,
	shutdown: Arc<AtomicBool>,
	thread: Mutex<Option<JoinHandle<()>>>,
	on_closed: Box<dyn Fn() + Send + Sync>,
}

impl RequestServer {
	pub fn new(channel: Arc<Mutex<Channel>>, on_closed: impl Fn() + Send + Sync + 'static) -> Self {
		Self {
			channel,
			handlers: Mutex::new(HashMap::new()),
			shutdown: Arc::new(AtomicBool::new(false)),
			thread: Mutex::new(None),
			on_closed: Box::new(on_closed),
		}
	}

	/// Handler registration must complete before `start_thread` is called.
	pub fn register(&self, msg_id: i32, handler: Handler) {
		self.handlers
			.lock()
			.expect("handlers mutex poisoned")
			.insert(msg_id, handler);
	}

	/// Spawn exactly one receiver thread that loops reading frames and
	/// dispatching to registered handlers.
	pub fn start_thread(self: &Arc<Self>) {
		let this = Arc::clone(self);
		let handle = std::thread::spawn(move || this.run());
		*self.thread.lock().expect("thread mutex poisoned") = Some(handle);
	}

	fn run(self: Arc<Self>) {
		loop {
			if self.shutdown.load(Ordering::Acquire) {
				break;
			}

			let mut channel = self.channel.lock().expect("channel mutex poisoned");
			let len = match channel.recv_int() {
				| Ok(Some(len)) => len,
				| Ok(None) => continue, // heartbeat / empty poll
				| Err(e) => {
					debug!("request_server receiver exiting: {e}");
					drop(channel);
					(self.on_closed)();
					break;
				},
			};

			if len < 4 {
				error!(len, "request_server received a malformed frame length");
				continue;
			}

			let mut payload = vec![0_u8; len as usize];
			if let Err(e) = read_exact(&mut channel, &mut payload) {
				debug!("request_server receiver exiting: {e}");
				drop(channel);
				(self.on_closed)();
				break;
			}
			drop(channel);

			let msg_id = i32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]);
			let body = &payload[4..];

			let handlers = self.handlers.lock().expect("handlers mutex poisoned");
			match handlers.get(&msg_id) {
				| Some(handler) => {
					trace!(msg_id, "dispatching request");
					handler(body);
				},
				| None => error!(msg_id, "unknown msg_id; contract violation"),
			}
		}
	}

	pub fn stop_thread(&self) {
		self.shutdown.store(true, Ordering::Release);
		if let Some(handle) = self.thread.lock().expect("thread mutex poisoned").take() {
			let _ = handle.join();
		}
	}
}

fn read_exact(channel: &mut Channel, buf: &mut [u8]) -> Result<()> {
	let n = channel.recv(buf)?;
	if n < buf.len() {
		return Err(crate::error::Error::ConnPageServerCannotBeReached);
	}
	Ok(())
}
