use std::{
	iter::once,
	sync::{
		atomic::{AtomicUsize, Ordering},
		Arc, OnceLock,
	},
	thread,
	time::Duration,
};

use transerv_core::{
	utils::sys::compute::{nth_core_available, set_affinity},
	Result,
};
use tokio::runtime::Builder;

use crate::{clap::Args, server::Server};

const WORKER_NAME: &str = "transerv:worker";
const WORKER_MIN: usize = 2;
const WORKER_KEEPALIVE: u64 = 36;
const MAX_BLOCKING_THREADS: usize = 1024;
const SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(10000);

static WORKER_AFFINITY: OnceLock<bool> = OnceLock::new();

pub(super) fn new(args: &Args) -> Result<tokio::runtime::Runtime> {
	WORKER_AFFINITY
		.set(args.worker_affinity)
		.expect("set WORKER_AFFINITY from program argument");

	let mut builder = Builder::new_multi_thread();
	builder
		.enable_io()
		.enable_time()
		.thread_name(WORKER_NAME)
		.worker_threads(args.worker_threads.max(WORKER_MIN))
		.max_blocking_threads(MAX_BLOCKING_THREADS)
		.thread_keep_alive(Duration::from_secs(WORKER_KEEPALIVE))
		.on_thread_start(thread_start)
		.on_thread_stop(thread_stop);

	builder.build().map_err(Into::into)
}

#[tracing::instrument(name = "stop", level = "info", skip_all)]
pub(super) fn shutdown(_server: &Arc<Server>, runtime: tokio::runtime::Runtime) {
	transerv_core::debug!(
		timeout = ?SHUTDOWN_TIMEOUT,
		"Waiting for runtime..."
	);

	runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
}

#[tracing::instrument(
	name = "fork",
	level = "debug",
	skip_all,
	fields(
		id = ?thread::current().id(),
		name = %thread::current().name().unwrap_or("None"),
	),
)]
fn thread_start() {
	debug_assert_eq!(
		Some(WORKER_NAME),
		thread::current().name(),
		"tokio worker name mismatch at thread start"
	);

	if WORKER_AFFINITY.get().copied().unwrap_or(false) {
		set_worker_affinity();
	}
}

fn set_worker_affinity() {
	static CORES_OCCUPIED: AtomicUsize = AtomicUsize::new(0);

	let handle = tokio::runtime::Handle::current();
	let num_workers = handle.metrics().num_workers();
	let i = CORES_OCCUPIED.fetch_add(1, Ordering::Relaxed);
	if i >= num_workers {
		return;
	}

	let Some(id) = nth_core_available(i) else {
		return;
	};

	set_affinity(once(id));
}

#[tracing::instrument(
	name = "join",
	level = "debug",
	skip_all,
	fields(
		id = ?thread::current().id(),
		name = %thread::current().name().unwrap_or("None"),
	),
)]
fn thread_stop() {}
