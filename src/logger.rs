/// Initializes the global logger.
///
/// Generation progress is logged at info level; `verbose` adds the debug
/// output of scanning, variable loading and includes.
pub fn init_logger(verbose: bool) {
    env_logger::Builder::new()
        .filter_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .init();
}
