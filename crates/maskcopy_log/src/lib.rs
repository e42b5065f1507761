//! `maskcopy_log`: stderr tracing setup shared by maskcopy binaries.
//!
//! Stdout is reserved for matched paths, so every event goes to stderr.

use tracing::Level;

/// Map CLI verbosity onto a maximum tracing level.
///
/// `quiet` wins over any `-v`. Zero `-v` keeps warnings and errors only.
pub fn level_from_verbosity(n_verbose: u8, if_quiet: bool) -> Level {
    if if_quiet {
        return Level::ERROR;
    }
    match n_verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global stderr subscriber.
///
/// Safe to call more than once; later calls keep the first subscriber.
pub fn init_logging(level: Level) {
    let res_init = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
    if let Err(e) = res_init {
        tracing::debug!("Logging already initialized: {e}");
    }
}
