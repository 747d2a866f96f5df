//! `send(MsgId, payload)` serializes `(MsgId, payload)` into one frame and
//! writes it as `[length][msg_id][payload]` (spec §4.3, §6.1).

use std::sync::{Arc, Mutex};

use crate::{channel::Channel, error::Result};

pub struct RequestClient {
	channel: Arc<Mutex<Channel>>,
}

impl RequestClient {
	#[must_use]
	pub fn new(channel: Arc<Mutex<Channel>>) -> Self { Self { channel } }

	/// Serialize `(msg_id, payload)` into one logical frame and emit the
	/// length prefix followed by the payload.
	pub fn send(&self, msg_id: i32, payload: &[u8]) -> Result<()> {
		let mut framed = Vec::with_capacity(4 + payload.len());
		framed.extend_from_slice(&msg_id.to_be_bytes());
		framed.extend_from_slice(payload);

		let mut channel = self.channel.lock().expect("channel mutex poisoned");
		channel.send_int(i32::try_from(framed.len()).expect("frame too large"))?;
		channel.send(&framed)
	}
}
