//! Logging initialization

/// Initialize env_logger with millisecond timestamps.
///
/// Default filter level is `info`; override with the RUST_LOG environment
/// variable. Calling it again after a logger is installed does nothing.
///
/// # Example
/// ```
/// worldtree::core::logging::init();
/// log::info!("Partition build started");
/// ```
pub fn init() {
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .try_init();
}
