use std::io;

/// Errors surfaced across the transport boundary (spec §6.4).
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("I/O error: {0}")]
	Io(#[from] io::Error),

	/// `ER_NET_PAGESERVER_CONNECTION`: handshake or connect failed.
	#[error("failed to establish connection to peer")]
	NetPageserverConnection,

	/// `ER_CONN_PAGE_SERVER_CANNOT_BE_REACHED`: a send/recv failed mid-connection.
	#[error("peer connection cannot be reached")]
	ConnPageServerCannotBeReached,

	/// `ER_CONN_NO_PAGE_SERVER_AVAILABLE`: no CONNECTED handler remained.
	#[error("no page server connection available")]
	ConnNoPageServerAvailable,

	/// `ER_HOST_PORT_PARAMETER`: an entry in `page_server_hosts` failed to parse.
	#[error("invalid host:port parameter: {0}")]
	HostPortParameter(String),

	/// Broker stop error delivered to every outstanding `send_recv` on teardown.
	#[error("error on write: connection stopped")]
	ErrorOnWrite,

	/// `disconnect()` called on an `async_disconnect_handler` after `terminate()`.
	#[error("disconnect called on a terminated async_disconnect_handler")]
	DisconnectAfterTerminate,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
