//! Per-peer connection lifecycle and the server-level API that multiplexes
//! over the currently selected "main" connection (spec §4.8).
//!
//! ```text
//!           connect()                 set_connection()
//!   IDLE ───────────▶ CONNECTING ───────────────────▶ CONNECTED
//!    ▲                   │                                │
//!    │                   │ handshake fail                 │ disconnect_async()
//!    │                   ▼                                ▼
//!    └──────── IDLE ◀──── DISCONNECTING ◀─────────────────┘
//! ```

use std::{
	sync::{Arc, RwLock},
	time::Duration,
};

use transerv_core::{
	config::TranServerRole,
	{debug, warn},
};

use crate::{
	async_disconnect::AsyncDisconnectHandler,
	channel::Channel,
	duplex::RequestSyncClientServer,
	error::{Error, Result},
};

/// Maps the configured role to the handshake's `conn_type` (spec §6.2,
/// SPEC_FULL §11.7). Defined as an extension trait since `TranServerRole`
/// lives in `transerv-core`, not here.
trait ConnType {
	fn conn_type(self) -> i32;
}

impl ConnType for TranServerRole {
	fn conn_type(self) -> i32 {
		match self {
			| Self::Active => 1,
			| Self::Passive => 2,
		}
	}
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ConnectionState {
	Idle,
	Connecting,
	Connected,
	Disconnecting,
}

pub struct ConnectionHandler {
	host: String,
	port: u16,
	poll_timeout: Duration,
	conn_type: i32,
	state: RwLock<ConnectionState>,
	endpoint: RwLock<Option<Arc<RequestSyncClientServer>>>,
	bucket_count: usize,
}

impl ConnectionHandler {
	fn new(host: String, port: u16, poll_timeout: Duration, conn_type: i32, bucket_count: usize) -> Self {
		Self {
			host,
			port,
			poll_timeout,
			conn_type,
			state: RwLock::new(ConnectionState::Idle),
			endpoint: RwLock::new(None),
			bucket_count,
		}
	}

	fn state(&self) -> ConnectionState { *self.state.read().expect("state lock poisoned") }

	fn is_connected(&self) -> bool { self.state() == ConnectionState::Connected }

	/// TCP connect with channel poll timeout, handshake, and transition to
	/// CONNECTED. On any failure, state returns to IDLE.
	fn connect(&self) -> Result<()> {
		*self.state.write().expect("state lock poisoned") = ConnectionState::Connecting;

		let result = self.do_connect();
		match result {
			| Ok(endpoint) => {
				*self.endpoint.write().expect("endpoint lock poisoned") = Some(endpoint);
				*self.state.write().expect("state lock poisoned") = ConnectionState::Connected;
				Ok(())
			},
			| Err(e) => {
				*self.state.write().expect("state lock poisoned") = ConnectionState::Idle;
				Err(e)
			},
		}
	}

	fn do_connect(&self) -> Result<Arc<RequestSyncClientServer>> {
		let mut channel = Channel::connect(&self.host, self.port, self.poll_timeout)?;

		channel.send_int(self.conn_type)?;
		let echoed = channel
			.recv_int()?
			.ok_or(Error::NetPageserverConnection)?;
		if echoed != self.conn_type {
			return Err(Error::NetPageserverConnection);
		}

		Ok(RequestSyncClientServer::new(channel, self.bucket_count, || {}))
	}

	fn endpoint(&self) -> Option<Arc<RequestSyncClientServer>> {
		self.endpoint.read().expect("endpoint lock poisoned").clone()
	}

	/// Retires the current endpoint through `disconnector` and transitions
	/// DISCONNECTING -> IDLE.
	fn disconnect_async(&self, disconnector: &AsyncDisconnectHandler<Arc<RequestSyncClientServer>>) {
		*self.state.write().expect("state lock poisoned") = ConnectionState::Disconnecting;
		if let Some(endpoint) = self.endpoint.write().expect("endpoint lock poisoned").take() {
			endpoint.stop();
			disconnector.disconnect(endpoint);
		}
		*self.state.write().expect("state lock poisoned") = ConnectionState::Idle;
	}
}

/// Holds one `ConnectionHandler` per configured page server plus a
/// reconnector daemon and the main-connection pointer.
pub struct TranServer {
	role: TranServerRole,
	handlers: Vec<Arc<ConnectionHandler>>,
	/// Index into `handlers` of the currently selected main connection.
	main: RwLock<Option<usize>>,
	disconnector: AsyncDisconnectHandler<Arc<RequestSyncClientServer>>,
}

impl TranServer {
	/// Parse `page_server_hosts`, build one handler per entry, connect all of
	/// them best-effort, and pick the first CONNECTED as main. If
	/// `remote_storage` is set and none connect, boot fails.
	pub fn boot(
		page_server_hosts: &str, remote_storage: bool, poll_timeout: Duration, bucket_count: usize,
		role: TranServerRole,
	) -> Result<Arc<Self>> {
		let mut handlers = Vec::new();
		for entry in page_server_hosts.split(',').map(str::trim).filter(|s| !s.is_empty()) {
			match parse_host_port(entry) {
				| Some((host, port)) => handlers.push(Arc::new(ConnectionHandler::new(
					host,
					port,
					poll_timeout,
					role.conn_type(),
					bucket_count,
				))),
				| None => warn!(entry, "invalid host:port entry in page_server_hosts"),
			}
		}

		for handler in &handlers {
			if let Err(e) = handler.connect() {
				debug!(host = %handler.host, port = handler.port, "initial connect failed: {e}");
			}
		}

		let this = Arc::new(Self {
			role,
			handlers,
			main: RwLock::new(None),
			disconnector: AsyncDisconnectHandler::new(),
		});

		this.reset_main_connection()?;

		if remote_storage && this.main.read().expect("main lock poisoned").is_none() {
			return Err(Error::ConnNoPageServerAvailable);
		}

		Ok(this)
	}

	/// Scans handlers in declared order and picks the first CONNECTED.
	pub fn reset_main_connection(&self) -> Result<()> {
		let found = self.handlers.iter().position(|h| h.is_connected());
		*self.main.write().expect("main lock poisoned") = found;
		found.map(|_| ()).ok_or(Error::ConnNoPageServerAvailable)
	}

	fn main_endpoint(&self) -> Result<Arc<RequestSyncClientServer>> {
		let index = self.main.read().expect("main lock poisoned").ok_or(Error::ConnNoPageServerAvailable)?;
		self.handlers[index]
			.endpoint()
			.ok_or(Error::ConnNoPageServerAvailable)
	}

	pub fn push_request(&self, out_id: i32, payload: &[u8]) -> Result<()> {
		match self.main_endpoint() {
			| Ok(endpoint) => {
				endpoint.push(out_id, payload);
				Ok(())
			},
			| Err(_) => {
				self.reset_main_connection()?;
				self.main_endpoint()?.push(out_id, payload);
				Ok(())
			},
		}
	}

	pub fn send_receive(&self, out_id: i32, payload: &[u8]) -> Result<Vec<u8>> {
		match self.main_endpoint() {
			| Ok(endpoint) => endpoint.send_recv(out_id, payload).or_else(|_| {
				self.reset_main_connection()?;
				self.main_endpoint()?.send_recv(out_id, payload)
			}),
			| Err(_) => {
				self.reset_main_connection()?;
				self.main_endpoint()?.send_recv(out_id, payload)
			},
		}
	}

	/// Tears down every connection handler through the async disconnector,
	/// then terminates it. Must be called before this `TranServer` is
	/// dropped.
	pub fn shutdown(&self) {
		for handler in &self.handlers {
			if handler.is_connected() {
				handler.disconnect_async(&self.disconnector);
			}
		}
		self.disconnector.terminate();
	}
}

fn parse_host_port(entry: &str) -> Option<(String, u16)> {
	let (host, port) = entry.rsplit_once(':')?;
	let port: u16 = port.parse().ok()?;
	Some((host.to_owned(), port))
}
