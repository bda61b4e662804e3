use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::fs;
use std::path::Path;

const LOG_FILE: &str = "cluster_pool.log";

/// Initializes the global logger.
///
/// Call once, before any operation runs. The level comes from `RUST_LOG` when set,
/// otherwise from `default_level` (`info` if that does not parse either).
/// Records go to stderr with colored levels and, uncolored, to `<log_dir>/cluster_pool.log`.
pub fn init(log_dir: &Path, default_level: &str) {
    if let Err(e) = fs::create_dir_all(log_dir) {
        eprintln!("Failed to create log directory at '{}': {}", log_dir.display(), e);
    }

    let log_file_path = log_dir.join(LOG_FILE);

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());
    let log_level_filter = log_level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);

    let base_config = Dispatch::new().level(log_level_filter).level_for("serde", LevelFilter::Warn).level_for("regex", LevelFilter::Warn);

    let console_config = Dispatch::new()
        .format(|out, message, record| {
            let colors = fern::colors::ColoredLevelConfig::new()
                .error(fern::colors::Color::Red)
                .warn(fern::colors::Color::Yellow)
                .info(fern::colors::Color::Green)
                .debug(fern::colors::Color::Blue)
                .trace(fern::colors::Color::BrightBlack);

            out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), colors.color(record.level()), record.target(), message))
        })
        .chain(std::io::stderr());

    let mut dispatch = base_config.chain(console_config);

    match fern::log_file(&log_file_path) {
        Ok(file) => {
            let file_config = Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!("[{} {} {}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), record.level(), record.target(), message))
                })
                .chain(file);
            dispatch = dispatch.chain(file_config);
        }
        Err(e) => eprintln!("Failed to open log file '{}': {}", log_file_path.display(), e),
    }

    if let Err(e) = dispatch.apply() {
        eprintln!("Failed to apply logger configuration: {}", e);
        return;
    }

    log::debug!("Logger initialized. Logging to console and '{}'.", log_file_path.display());
}
