use log::LevelFilter;

/// Initializes `env_logger` at the given level.
///
/// Only the first call installs a logger; later calls are ignored, so tests and demos can both
/// call this freely.
///
/// # Arguments
///
/// * `level` - The most verbose level that is printed.
pub fn init_logger(level: LevelFilter) {
    if env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp_millis()
        .try_init()
        .is_err()
    {
        log::debug!("Logger already initialized");
    }
}
