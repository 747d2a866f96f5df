//! Bidirectional byte stream over TCP with bounded receive/send and a poll
//! timeout. Frame layout on the wire is `[length: i32][payload: length bytes]`,
//! both in network byte order (spec §6.1).

use std::{
	io::{Read, Write},
	net::{TcpStream, ToSocketAddrs},
	time::Duration,
};

use crate::error::{Error, Result};

/// A single TCP connection used as the transport for one peer.
pub struct Channel {
	id: String,
	stream: TcpStream,
}

impl Channel {
	/// Connect to `host:port`, bounding the connect and I/O timeouts by
	/// `poll_timeout`.
	pub fn connect(host: &str, port: u16, poll_timeout: Duration) -> Result<Self> {
		let addr = (host, port)
			.to_socket_addrs()?
			.next()
			.ok_or(Error::NetPageserverConnection)?;

		let stream = TcpStream::connect_timeout(&addr, poll_timeout).map_err(|_| Error::NetPageserverConnection)?;
		stream.set_read_timeout(Some(poll_timeout))?;
		stream.set_write_timeout(Some(poll_timeout))?;
		stream.set_nodelay(true)?;

		Ok(Self {
			id: format!("{host}:{port}"),
			stream,
		})
	}

	/// Wrap an already-accepted stream (server side).
	pub fn from_stream(id: String, stream: TcpStream) -> Result<Self> {
		stream.set_nodelay(true)?;
		Ok(Self { id, stream })
	}

	#[must_use]
	pub fn get_channel_id(&self) -> &str { &self.id }

	/// Send a raw byte payload with no length prefix.
	pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
		self.stream.write_all(bytes)?;
		Ok(())
	}

	/// Send a 4-byte network-order integer.
	pub fn send_int(&mut self, i: i32) -> Result<()> { self.send(&i.to_be_bytes()) }

	/// Receive exactly `buf.len()` bytes. Returns the number of bytes read;
	/// `Ok(0)` means the peer closed the connection cleanly.
	pub fn recv(&mut self, buf: &mut [u8]) -> Result<usize> {
		if buf.is_empty() {
			return Ok(0);
		}

		match self.stream.read(buf) {
			| Ok(0) => Ok(0),
			| Ok(n) => {
				let mut filled = n;
				while filled < buf.len() {
					match self.stream.read(&mut buf[filled..]) {
						| Ok(0) => return Ok(0),
						| Ok(m) => filled += m,
						| Err(e) => return Err(e.into()),
					}
				}
				Ok(filled)
			},
			| Err(e) => Err(e.into()),
		}
	}

	/// Receive a 4-byte network-order integer. `Ok(None)` means a recoverable
	/// timeout ("no data yet", a caller-visible heartbeat); a clean peer close
	/// (0 bytes read) is reported as `ConnPageServerCannotBeReached` instead of
	/// `None`, since the two are not the same event (spec §7).
	pub fn recv_int(&mut self) -> Result<Option<i32>> {
		let mut buf = [0_u8; 4];
		match self.recv(&mut buf) {
			| Ok(0) => Err(Error::ConnPageServerCannotBeReached),
			| Ok(_) => Ok(Some(i32::from_be_bytes(buf))),
			| Err(Error::Io(e)) if matches!(e.kind(), std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut) =>
				Ok(None),
			| Err(e) => Err(e),
		}
	}

	pub fn close(&mut self) -> Result<()> {
		self.stream.shutdown(std::net::Shutdown::Both)?;
		Ok(())
	}

	pub fn try_clone(&self) -> Result<Self> {
		Ok(Self {
			id: self.id.clone(),
			stream: self.stream.try_clone()?,
		})
	}
}
