use std::sync::Arc;

use transerv_core::{
	config::Config,
	info,
	log::{self, capture, LogLevelReloadHandles, ReloadHandle},
	utils::maximize_fd_limit,
	Error, Result,
};
use tokio::runtime;
use tracing_subscriber::{prelude::*, reload, EnvFilter, Registry};

use crate::clap::Args;

/// Server runtime state; complete
pub(crate) struct Server {
	/// Server runtime state; public portion
	pub(crate) server: Arc<transerv_core::Server>,
}

impl Server {
	pub(crate) fn build(args: Args, runtime: Option<&runtime::Handle>) -> Result<Arc<Server>, Error> {
		let raw_config = Config::load(args.config.iter().map(std::path::PathBuf::as_path))?;
		let config = Config::new(&raw_config)?;
		let log = init_tracing(&config);

		config.check()?;
		#[cfg(unix)]
		maximize_fd_limit().expect("Unable to increase maximum soft and hard file descriptor limit");
		info!(
			server_name = %config.server_name,
			role = ?config.role,
			bind_addr = %config.bind_addr,
			log_levels = %config.log,
			"{}",
			info::version(),
		);

		Ok(Arc::new(Server {
			server: Arc::new(transerv_core::Server::new(config, runtime.cloned(), log)),
		}))
	}
}

fn init_tracing(config: &Config) -> log::Log {
	let registry = Registry::default();
	let fmt_layer = tracing_subscriber::fmt::Layer::new().with_ansi(config.log_colors);
	let filter_layer = match EnvFilter::try_new(&config.log) {
		Ok(s) => s,
		Err(e) => {
			eprintln!("It looks like your config is invalid. The following error occured while parsing it: {e}");
			EnvFilter::try_new("warn").unwrap()
		},
	};

	let mut reload_handles = Vec::<Box<dyn ReloadHandle<EnvFilter> + Send + Sync>>::new();
	let (fmt_reload_filter, fmt_reload_handle) = reload::Layer::new(filter_layer);
	reload_handles.push(Box::new(fmt_reload_handle));
	let subscriber = registry.with(fmt_layer.with_filter(fmt_reload_filter));

	let cap_state = std::sync::Arc::new(capture::State::new());
	let cap_layer = capture::Layer::new(&cap_state);
	let subscriber = subscriber.with(cap_layer);

	tracing::subscriber::set_global_default(subscriber).unwrap();

	log::Log {
		reload: LogLevelReloadHandles::new(reload_handles),
		capture: cap_state,
	}
}
