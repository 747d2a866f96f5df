mod err;
mod log;
mod panic;
mod serde;

use std::{any::Any, borrow::Cow, convert::Infallible, fmt};

pub use log::*;

/// Error codes surfaced across the transport/lock-manager boundary, per
/// spec.md §6.4.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorCode {
	NoErrors,
	ErNetPageserverConnection,
	ErConnPageServerCannotBeReached,
	ErConnNoPageServerAvailable,
	ErHostPortParameter,
	ErrorOnWrite,
	ErNoPageServerConnection,
	LkNotgranted,
	LkNotgrantedDueTimeout,
	LkNotgrantedDueAborted,
	LkNotgrantedDueError,
}

#[derive(thiserror::Error)]
pub enum Error {
	#[error("PANIC!")]
	PanicAny(Box<dyn Any + Send>),
	#[error("PANIC! {0}")]
	Panic(&'static str, Box<dyn Any + Send + 'static>),

	// std
	#[error("{0}")]
	Fmt(#[from] fmt::Error),
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
	#[error("{0}")]
	Utf8Error(#[from] std::str::Utf8Error),
	#[error("{0}")]
	FromUtf8Error(#[from] std::string::FromUtf8Error),
	#[error("{0}")]
	TryFromSliceError(#[from] std::array::TryFromSliceError),
	#[error("{0}")]
	TryFromIntError(#[from] std::num::TryFromIntError),
	#[error("{0}")]
	ParseIntError(#[from] std::num::ParseIntError),
	#[error("{0}")]
	ParseFloatError(#[from] std::num::ParseFloatError),
	#[error("{0}")]
	AddrParseError(#[from] std::net::AddrParseError),

	// third-party
	#[error("Join error: {0}")]
	JoinError(#[from] tokio::task::JoinError),
	#[error("Config load error: {0}")]
	Figment(#[from] figment::Error),
	#[error("{0}")]
	SerdeDe(Cow<'static, str>),
	#[error("{0}")]
	SerdeSer(Cow<'static, str>),

	// transport (spec.md §2, §4.1-§4.8, §6.4)
	#[error("There was a problem with the '{0}' directive in your configuration: {1}")]
	Config(&'static str, Cow<'static, str>),
	#[error("net_pageserver_connection: handshake with {0} failed")]
	NetPageserverConnection(Cow<'static, str>),
	#[error("page server at {0} cannot be reached")]
	ConnPageServerCannotBeReached(Cow<'static, str>),
	#[error("no connected page server available")]
	ConnNoPageServerAvailable,
	#[error("invalid host:port entry '{0}'")]
	HostPortParameter(Cow<'static, str>),
	#[error("no page server connection could be established at boot")]
	NoPageServerConnection,
	#[error("write failed, broker stopped: {0}")]
	ErrorOnWrite(Cow<'static, str>),

	// lock manager (spec.md §4.9-§4.16, §6.4)
	#[error("lock not granted")]
	LockNotGranted,
	#[error("lock not granted, timed out")]
	LockTimeout,
	#[error("lock not granted, transaction aborted")]
	LockAborted,
	#[error("lock not granted, internal error: {0}")]
	LockInternal(Cow<'static, str>),

	// unique / untyped
	#[error("{0}")]
	Err(Cow<'static, str>),
}

impl Error {
	#[must_use]
	pub fn code(&self) -> ErrorCode {
		match self {
			Self::NetPageserverConnection(..) => ErrorCode::ErNetPageserverConnection,
			Self::ConnPageServerCannotBeReached(..) => ErrorCode::ErConnPageServerCannotBeReached,
			Self::ConnNoPageServerAvailable => ErrorCode::ErConnNoPageServerAvailable,
			Self::HostPortParameter(..) => ErrorCode::ErHostPortParameter,
			Self::NoPageServerConnection => ErrorCode::ErNoPageServerConnection,
			Self::ErrorOnWrite(..) => ErrorCode::ErrorOnWrite,
			Self::LockNotGranted => ErrorCode::LkNotgranted,
			Self::LockTimeout => ErrorCode::LkNotgrantedDueTimeout,
			Self::LockAborted => ErrorCode::LkNotgrantedDueAborted,
			Self::LockInternal(..) => ErrorCode::LkNotgrantedDueError,
			_ => ErrorCode::LkNotgrantedDueError,
		}
	}

	/// Sanitizes public-facing errors that can leak sensitive information.
	pub fn sanitized_string(&self) -> String {
		match self {
			Self::Io(..) => String::from("I/O error occurred."),
			_ => self.to_string(),
		}
	}
}

impl fmt::Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{self}") }
}

#[allow(clippy::fallible_impl_from)]
impl From<Infallible> for Error {
	#[cold]
	#[inline(never)]
	fn from(_e: Infallible) -> Self {
		panic!("infallible error should never exist");
	}
}

#[cold]
#[inline(never)]
pub fn infallible(_e: &Infallible) {
	panic!("infallible error should never exist");
}
