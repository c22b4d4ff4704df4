// Wed Aug 05 2026 - Alex

use log::LevelFilter;

pub fn level_from_verbosity(verbosity: usize) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init(verbosity: usize) {
    let _ = env_logger::Builder::new()
        .filter_level(level_from_verbosity(verbosity))
        .format_timestamp(None)
        .try_init();
}

pub fn init_from_env() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
