use env_logger::Builder;
use log::LevelFilter;
use std::io::Write;

/// Installs a logger that prints `c LEVEL - message` lines, so that log output can
/// be told apart from results on the same stream.
pub fn build_logger_for_level(level: LevelFilter) {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .filter(None, level)
        .init();
}

/// Same format, with the level taken from `RUST_LOG`.
pub fn build_logger() {
    let mut builder = Builder::from_default_env();
    builder
        .format(|buf, record| writeln!(buf, "c {} - {}", record.level(), record.args()))
        .init();
}
