//! Stderr logger for the `log` facade.

use std::io::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

//

/// Install the logger. Later calls only change the level.
pub fn init(level: LevelFilter) {
    _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// `-q` and `-v` counts to a level filter; `info` when both are zero.
pub fn level_for(verbose: u8, quiet: u8) -> LevelFilter {
    const LEVELS: [LevelFilter; 6] = [
        LevelFilter::Off,
        LevelFilter::Error,
        LevelFilter::Warn,
        LevelFilter::Info,
        LevelFilter::Debug,
        LevelFilter::Trace,
    ];
    let idx = (3 + verbose as i32 - quiet as i32).clamp(0, LEVELS.len() as i32 - 1);
    LEVELS[idx as usize]
}

//

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "error",
            Level::Warn => "warn",
            Level::Info => "info",
            Level::Debug => "debug",
            Level::Trace => "trace",
        };
        let mut err = std::io::stderr().lock();
        if record.level() >= Level::Debug {
            _ = writeln!(err, "[{tag} {}] {}", record.target(), record.args());
        } else {
            _ = writeln!(err, "[{tag}] {}", record.args());
        }
    }

    fn flush(&self) {
        _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0, 0), LevelFilter::Info);
        assert_eq!(level_for(1, 0), LevelFilter::Debug);
        assert_eq!(level_for(5, 0), LevelFilter::Trace);
        assert_eq!(level_for(0, 1), LevelFilter::Warn);
        assert_eq!(level_for(0, 9), LevelFilter::Off);
        assert_eq!(level_for(2, 2), LevelFilter::Info);
    }
}
