//! Composes [`RequestClient`] and [`RequestServer`] over the same channel:
//! one receiver thread handles incoming ids, `send()` emits outgoing ones
//! (spec §4.4). Outgoing and incoming msg-id spaces are independent; nothing
//! stops a caller from numbering them from distinct enums on each side.

use std::sync::{Arc, Mutex};

use crate::{channel::Channel, error::Result, request_client::RequestClient, request_server::RequestServer};

pub struct RequestClientServer {
	pub client: RequestClient,
	pub server: Arc<RequestServer>,
}

impl RequestClientServer {
	pub fn new(channel: Channel, on_closed: impl Fn() + Send + Sync + 'static) -> Self {
		let channel = Arc::new(Mutex::new(channel));
		Self {
			client: RequestClient::new(Arc::clone(&channel)),
			server: Arc::new(RequestServer::new(channel, on_closed)),
		}
	}

	pub fn register(&self, msg_id: i32, handler: crate::request_server::Handler) {
		self.server.register(msg_id, handler);
	}

	pub fn start(self: &Arc<Self>) { self.server.start_thread(); }

	pub fn send(&self, msg_id: i32, payload: &[u8]) -> Result<()> { self.client.send(msg_id, payload) }

	pub fn stop(&self) { self.server.stop_thread(); }
}
