use env_logger::Env;

/// Install the `env_logger` backend for the `log` facade.
///
/// `level` is only the default filter; `RUST_LOG` still wins when set.
/// The first call installs the logger; later calls keep it and do nothing.
pub fn init(level: &str) {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(level)).try_init();
}
