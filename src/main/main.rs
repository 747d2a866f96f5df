#![type_length_limit = "49152"] //TODO: reduce me

pub(crate) mod clap;
mod restart;
mod runtime;
mod server;
mod signal;

use std::{
	net::TcpListener,
	sync::{atomic::Ordering, Arc},
};

use transerv_core::{debug_info, error, info, rustc_flags_capture, warn, Error, Result};
use transerv_lock::LockTable;
use transerv_transport::TranServer;
use server::Server;

rustc_flags_capture! {}

fn main() -> Result {
	let args = clap::parse();
	let runtime = runtime::new(&args)?;
	let server = Server::build(args, Some(runtime.handle()))?;

	runtime.spawn(signal::signal(server.clone()));
	runtime.block_on(async_main(&server))?;
	runtime::shutdown(&server, runtime);

	#[cfg(unix)]
	if server.server.restarting.load(Ordering::Acquire) {
		restart::restart();
	}

	debug_info!("Exit");
	Ok(())
}

/// Boots the inter-node transport (outbound connections to page servers plus
/// an inbound listener for this node's own role) and the transactional lock
/// manager, then blocks until a shutdown signal arrives.
#[tracing::instrument(name = "main", parent = None, skip_all)]
async fn async_main(server: &Arc<Server>) -> Result<(), Error> {
	let config = &server.server.config;

	let tran_server = TranServer::boot(
		&config.page_server_hosts,
		config.remote_storage,
		std::time::Duration::from_millis(config.channel_poll_timeout_ms),
		config.response_broker_bucket_count,
		config.role,
	)
	.map_err(|e| Error::Err(e.to_string().into()))?;

	let lock_table = Arc::new(LockTable::new(config.lk_escalation_at, config.lk_rollback_on_lock_escalation));

	let daemon_shutdown = Arc::new(std::sync::atomic::AtomicBool::new(false));
	let daemon_table = Arc::clone(&lock_table);
	let daemon_interval = std::time::Duration::from_secs_f64(config.lk_run_deadlock_interval.max(0.01));
	let daemon_shutdown_handle = Arc::clone(&daemon_shutdown);
	let daemon_thread = std::thread::Builder::new()
		.name("transerv:deadlock".into())
		.spawn(move || daemon_table.run_deadlock_daemon(daemon_interval, &daemon_shutdown_handle))
		.expect("failed to spawn deadlock detector thread");

	let listener = TcpListener::bind(config.bind_addr).map_err(|e| Error::Err(format!("failed to bind {}: {e}", config.bind_addr)))?;
	info!(bind_addr = %config.bind_addr, role = ?config.role, "listening for inbound connections");

	let accept_shutdown = Arc::new(std::sync::atomic::AtomicBool::new(false));
	let accept_listener = listener.try_clone().map_err(|e| Error::Err(format!("failed to clone listener: {e}")))?;
	let accept_shutdown_handle = Arc::clone(&accept_shutdown);
	let poll_timeout = std::time::Duration::from_millis(config.channel_poll_timeout_ms);
	let accept_thread = std::thread::Builder::new()
		.name("transerv:accept".into())
		.spawn(move || accept_loop(accept_listener, poll_timeout, &accept_shutdown_handle))
		.expect("failed to spawn accept thread");

	let mut shutdown_rx = server.server.signal.subscribe();
	let _ = shutdown_rx.recv().await;

	accept_shutdown.store(true, Ordering::Release);
	daemon_shutdown.store(true, Ordering::Release);
	// unblocks the accept() call with a harmless local connection
	let _ = std::net::TcpStream::connect(listener.local_addr().expect("listener has a local address"));
	let _ = accept_thread.join();
	let _ = daemon_thread.join();

	tran_server.shutdown();

	debug_info!(resources = lock_table.deadlock_stats().passes_run(), "Exit runtime");
	Ok(())
}

/// Accepts inbound connections and performs the handshake (spec §6.2): read
/// the peer's declared connection-type int, echo it back. Request dispatch
/// for an accepted connection is registered by whatever layer above this
/// one owns the wire protocol for that connection type; this loop only
/// owns bringing the connection up and handing it off.
fn accept_loop(listener: TcpListener, poll_timeout: std::time::Duration, shutdown: &std::sync::atomic::AtomicBool) {
	for stream in listener.incoming() {
		if shutdown.load(Ordering::Acquire) {
			break;
		}

		let Ok(stream) = stream else { continue };
		let peer = stream
			.peer_addr()
			.map(|a| a.to_string())
			.unwrap_or_else(|_| "unknown".into());

		if let Err(e) = stream.set_read_timeout(Some(poll_timeout)) {
			warn!(peer, "failed to set read timeout on accepted connection: {e}");
			continue;
		}
		if let Err(e) = stream.set_nodelay(true) {
			warn!(peer, "failed to set nodelay on accepted connection: {e}");
			continue;
		}

		match transerv_transport::Channel::from_stream(peer.clone(), stream) {
			| Ok(mut channel) => {
				if let Err(e) = handshake(&mut channel) {
					warn!(peer, "handshake failed: {e}");
					continue;
				}
				info!(peer, "accepted connection");
			},
			| Err(e) => error!(peer, "failed to wrap accepted stream: {e}"),
		}
	}
}

fn handshake(channel: &mut transerv_transport::Channel) -> transerv_transport::Result<()> {
	let conn_type = channel.recv_int()?.ok_or(transerv_transport::Error::NetPageserverConnection)?;
	channel.send_int(conn_type)
}
