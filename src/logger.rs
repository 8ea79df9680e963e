/// Initializes the global logger; `debug` raises the level from info to debug.
pub fn init_logger(debug: bool) {
    env_logger::Builder::new()
        .filter_level(if debug { log::LevelFilter::Debug } else { log::LevelFilter::Info })
        .format_timestamp(None)
        .format_target(false)
        .init();
}
