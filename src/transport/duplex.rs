//! `request_sync_client_server`: composes the queue/autosend, request_server
//! and response_broker into a full-duplex RPC endpoint with fire-and-forget
//! `push`, blocking `send_recv`, and `respond` for handler-side replies
//! (spec §4.7).
//!
//! Every outgoing payload is prefixed with an 8-byte big-endian rsn; `rsn ==
//! 0` means fire-and-forget. `respond` reuses the rsn extracted from the
//! originating request — that is the only thing that pairs a reply with its
//! request (spec §9 design note).

use std::sync::{Arc, Mutex};

use crate::{
	channel::Channel,
	error::{Error, Result},
	queue::{RequestQueueAutosend, RequestSyncSendQueue},
	request_client::RequestClient,
	request_server::{Handler, RequestServer},
	response_broker::ResponseBroker,
	rsn::SequenceNumberGenerator,
};

/// Reserved msg-id carrying reply traffic. A reply enqueued locally under
/// `OUTGOING_RESPONSE` arrives on the peer's wire as the same id, which the
/// peer's dispatcher treats as `INCOMING_RESPONSE` — the two names describe
/// the same wire value from the two sides of one exchange.
pub const OUTGOING_RESPONSE: i32 = -1;
pub const INCOMING_RESPONSE: i32 = OUTGOING_RESPONSE;

pub struct SequencedPayload {
	pub rsn: u64,
	pub payload: Vec<u8>,
}

pub struct RequestSyncClientServer {
	client: Arc<RequestClient>,
	server: Arc<RequestServer>,
	queue: Arc<RequestSyncSendQueue>,
	autosend: Mutex<Option<Arc<RequestQueueAutosend>>>,
	broker: Arc<ResponseBroker<Vec<u8>>>,
	generator: SequenceNumberGenerator,
}

fn encode(rsn: u64, payload: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(8 + payload.len());
	out.extend_from_slice(&rsn.to_be_bytes());
	out.extend_from_slice(payload);
	out
}

fn decode(body: &[u8]) -> (u64, &[u8]) {
	let rsn = u64::from_be_bytes(body[0..8].try_into().expect("body shorter than rsn prefix"));
	(rsn, &body[8..])
}

impl RequestSyncClientServer {
	pub fn new(channel: Channel, bucket_count: usize, on_closed: impl Fn() + Send + Sync + 'static) -> Arc<Self> {
		let channel = Arc::new(Mutex::new(channel));
		let client = Arc::new(RequestClient::new(Arc::clone(&channel)));
		let server = Arc::new(RequestServer::new(channel, on_closed));
		let broker = Arc::new(ResponseBroker::new(bucket_count, Error::ErrorOnWrite));
		let queue = Arc::new(RequestSyncSendQueue::new(|e| {
			transerv_core::error!("request_sync_send_queue: send failed: {e}");
		}));

		let this = Arc::new(Self {
			client,
			server,
			queue,
			autosend: Mutex::new(None),
			broker: Arc::clone(&broker),
			generator: SequenceNumberGenerator::new(),
		});

		// The IncomingResponse handler is installed by the core: pull the user
		// payload out and register it with the broker.
		let broker_for_handler = Arc::clone(&broker);
		this.server
			.register(INCOMING_RESPONSE, Box::new(move |body| {
				let (rsn, payload) = decode(body);
				broker_for_handler.register_response(rsn, payload.to_vec());
			}));

		this
	}

	/// Register a handler for an incoming application msg-id. The handler
	/// receives `(rsn, user_payload)`; call [`Self::respond`] to reply.
	pub fn on(&self, in_id: i32, handler: impl Fn(SequencedPayload) + Send + Sync + 'static) {
		self.server.register(
			in_id,
			Box::new(move |body| {
				let (rsn, payload) = decode(body);
				handler(SequencedPayload { rsn, payload: payload.to_vec() });
			}) as Handler,
		);
	}

	/// Enqueues `(rsn=0, payload)` under `out_id`. No reply expected.
	pub fn push(&self, out_id: i32, payload: &[u8]) { self.queue.push(out_id, encode(0, payload)); }

	/// Allocates a fresh rsn, enqueues the request, and blocks for the reply.
	pub fn send_recv(&self, out_id: i32, request: &[u8]) -> Result<Vec<u8>> {
		let rsn = self.generator.get_unique_number();
		self.queue.push(out_id, encode(rsn, request));
		self.broker.get_response(rsn)
	}

	/// Reuses the rsn of the originating request to route a reply back.
	pub fn respond(&self, reply: SequencedPayload) {
		self.queue.push(OUTGOING_RESPONSE, encode(reply.rsn, &reply.payload));
	}

	/// Starts the autosend thread and the receiver thread.
	pub fn start(self: &Arc<Self>) {
		self.server.start_thread();
		let autosend = RequestQueueAutosend::start(Arc::clone(&self.queue), Arc::clone(&self.client));
		*self.autosend.lock().expect("autosend mutex poisoned") = Some(autosend);
	}

	/// Tears down in the opposite order of `start`, and calls `broker.stop()`
	/// so in-flight `send_recv` fails rather than hanging.
	pub fn stop(&self) {
		if let Some(autosend) = self.autosend.lock().expect("autosend mutex poisoned").take() {
			autosend.stop_thread();
		}
		self.server.stop_thread();
		self.broker.stop();
	}
}
