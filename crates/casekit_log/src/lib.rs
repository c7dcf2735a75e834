//! `casekit_log` v1:
//! Logging bootstrap shared by casekit binaries.
//!
//! Libraries only talk to the `log` facade; binaries call [`init_logging`]
//! once at startup.

use std::io::Write;

use log::LevelFilter;

/// Environment variable holding an `env_logger` filter spec.
pub const C_ENV_LOG_FILTER: &str = "CASEKIT_LOG";

/// Map CLI verbosity to a level.
///
/// `quiet` wins over any `-v`; no flags means `warn`.
pub fn derive_level_filter(n_verbose: u8, if_quiet: bool) -> LevelFilter {
    if if_quiet {
        return LevelFilter::Error;
    }
    match n_verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Build a stderr logger at `level`, overridable through [`C_ENV_LOG_FILTER`].
pub fn build_logger(level: LevelFilter) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] {}: {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(env_logger::Target::Stderr);

    if let Ok(c_filter) = std::env::var(C_ENV_LOG_FILTER) {
        builder.parse_filters(&c_filter);
    }
    builder
}

/// Install the global logger. Safe to call more than once.
pub fn init_logging(n_verbose: u8, if_quiet: bool) {
    let level = derive_level_filter(n_verbose, if_quiet);
    if build_logger(level).try_init().is_err() {
        log::debug!("Logger already initialised; keeping existing one.");
    }
}
