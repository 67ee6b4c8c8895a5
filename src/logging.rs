use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Logs go to stderr so JSON on stdout stays parseable. `RUST_LOG` wins
/// over the flags when set.
pub fn init(verbose: u8, quiet: bool) {
    let level = level_for(verbose, quiet);
    Builder::from_env(Env::default().default_filter_or(level.as_str()))
        .format_target(false)
        .try_init()
        .ok();
}
