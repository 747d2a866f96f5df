pub mod check;
pub mod manager;

use std::{net::SocketAddr, path::PathBuf};

use figment::providers::{Env, Format, Toml};
pub use figment::{value::Value as FigmentValue, Figment};
use serde::Deserialize;

pub use self::{check::check, manager::Manager};
use crate::{err, error::Error, Result};

/// Role a transaction server boots as, per the active/passive distinction
/// the original `tran_server` hierarchy draws between its two subclasses.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum TranServerRole {
	Active,
	Passive,
}

impl Default for TranServerRole {
	fn default() -> Self { Self::Active }
}

/// All the config options for the transaction server and its transport.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
	/// Logical name of this node, used only in logs and in the handshake's
	/// identifying fields.
	///
	/// default: "transerv"
	#[serde(default = "default_server_name")]
	pub server_name: String,

	/// Whether this server boots as the active transaction server (accepts
	/// writes and originates page requests) or a passive replica.
	///
	/// default: "active"
	#[serde(default)]
	pub role: TranServerRole,

	/// Address this node's `request_server` listens on for inbound
	/// connections from other nodes.
	///
	/// default: "127.0.0.1:1523"
	#[serde(default = "default_bind_addr")]
	pub bind_addr: SocketAddr,

	/// Comma-separated `host:port` entries for the page servers this node's
	/// `request_client` connects out to. Entries that fail to parse are
	/// logged and skipped rather than failing the whole list.
	///
	/// example: "10.0.0.1:1523,10.0.0.2:1523"
	///
	/// default: ""
	#[serde(default)]
	pub page_server_hosts: String,

	/// Whether at least one reachable page server is required at boot. If
	/// true and no entry in `page_server_hosts` is both parseable and
	/// connectable, boot fails.
	#[serde(default)]
	pub remote_storage: bool,

	/// Number of instance locks held on a resource by one transaction before
	/// the lock is escalated to a coarser class lock.
	///
	/// default: 100
	#[serde(default = "default_lk_escalation_at")]
	pub lk_escalation_at: u32,

	/// Whether to roll back a transaction instead of escalating its locks
	/// when the escalation threshold is reached.
	#[serde(default)]
	pub lk_rollback_on_lock_escalation: bool,

	/// Interval, in fractional seconds, between deadlock-detector passes.
	///
	/// default: 1.0
	#[serde(default = "default_lk_run_deadlock_interval")]
	pub lk_run_deadlock_interval: f64,

	/// Trace-log every request/response crossing the transport, gated behind
	/// this flag since it is high-volume.
	#[serde(default)]
	pub er_log_comm_request: bool,

	/// Number of buckets the response broker's rsn-to-payload map is split
	/// into; each bucket has its own mutex and condvar.
	///
	/// default: 64
	#[serde(default = "default_response_broker_bucket_count")]
	pub response_broker_bucket_count: usize,

	/// How long the autosend queue drain thread blocks waiting for new
	/// entries before checking the send queue again, in milliseconds.
	///
	/// default: 10
	#[serde(default = "default_channel_poll_timeout_ms")]
	pub channel_poll_timeout_ms: u64,

	/// Max log level. Allows trace, debug, info, warn, or error, and full
	/// `tracing_subscriber::EnvFilter` directive syntax.
	///
	/// default: "info"
	#[serde(default = "default_log")]
	pub log: String,

	/// Output logs with ANSI colours.
	#[serde(default = "true_fn")]
	pub log_colors: bool,

	/// Optional path to a file the deadlock detector and broker write
	/// periodic statistics to; purely diagnostic.
	pub stats_path: Option<PathBuf>,
}

impl Config {
	/// Pre-initialize config
	pub fn load<'a, I>(paths: I) -> Result<Figment>
	where
		I: Iterator<Item = &'a std::path::Path>,
	{
		let config = paths
			.map(Toml::file)
			.fold(Figment::new(), |config, file| config.merge(file.nested()))
			.merge(Env::prefixed("TRANSERV_").global().split("__"));

		Ok(config)
	}

	/// Finalize config
	pub fn new(raw_config: &Figment) -> Result<Self> {
		raw_config
			.extract::<Self>()
			.map_err(|e| err!("There was a problem with your configuration file: {e}"))
	}

	pub fn check(&self) -> Result<(), Error> { check(self) }
}

fn true_fn() -> bool { true }

fn default_server_name() -> String { "transerv".to_owned() }

fn default_bind_addr() -> SocketAddr { "127.0.0.1:1523".parse().expect("valid default") }

fn default_lk_escalation_at() -> u32 { 100 }

fn default_lk_run_deadlock_interval() -> f64 { 1.0 }

fn default_response_broker_bucket_count() -> usize { 64 }

fn default_channel_poll_timeout_ms() -> u64 { 10 }

/// do debug logging by default for debug builds
#[must_use]
pub fn default_log() -> String {
	cfg!(debug_assertions)
		.then_some("debug")
		.unwrap_or("info")
		.to_owned()
}
