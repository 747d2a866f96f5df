use crate::{info, warn, Config, Err, Error};

pub fn check(config: &Config) -> Result<(), Error> {
	#[cfg(debug_assertions)]
	info!("Note: transerv was built without optimisations (i.e. debug build)");

	let parsed_hosts: Vec<_> = config
		.page_server_hosts
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.filter(|entry| {
			let ok = entry.parse::<std::net::SocketAddr>().is_ok();
			if !ok {
				warn!("invalid host:port entry in page_server_hosts: {entry:?}");
			}
			ok
		})
		.collect();

	if config.remote_storage && parsed_hosts.is_empty() {
		return Err!(Config(
			"page_server_hosts",
			"remote_storage is enabled but no page server host could be parsed; at least one reachable \
			 \"host:port\" entry is required."
		));
	}

	if config.lk_escalation_at < 1 {
		return Err!(Config("lk_escalation_at", "lk_escalation_at must be at least 1."));
	}

	if config.lk_run_deadlock_interval < 0.01 {
		return Err!(Config(
			"lk_run_deadlock_interval",
			"lk_run_deadlock_interval must be at least 0.01 seconds."
		));
	}

	if config.response_broker_bucket_count == 0 {
		return Err!(Config(
			"response_broker_bucket_count",
			"response_broker_bucket_count must be at least 1."
		));
	}

	Ok(())
}
