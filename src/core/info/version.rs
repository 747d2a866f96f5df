/// One true function for returning the transerv version, with the
/// `TRANSERV_VERSION_EXTRA` env variable appended if set.
///
/// Set the environment variable `TRANSERV_VERSION_EXTRA` to any UTF-8 string
/// to include it in parenthesis after the SemVer version. A common value is a
/// git commit hash.
#[must_use]
pub fn version() -> String {
	match option_env!("TRANSERV_VERSION_EXTRA") {
		| Some(extra) if !extra.is_empty() => format!("{} ({})", env!("CARGO_PKG_VERSION"), extra),
		| _ => env!("CARGO_PKG_VERSION").to_owned(),
	}
}
