use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

pub const LOG_FILE_NAME: &str = "setup-node-debug.log";

fn trim_log_file_if_oversized(log_path: &Path, max_log_size: u64) {
    if let Ok(metadata) = std::fs::metadata(log_path)
        && metadata.len() > max_log_size
        && let Ok(contents) = std::fs::read(log_path)
    {
        let half = contents.len() / 2;
        let keep_from = contents[half..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(half, |pos| half + pos + 1);
        let _ = std::fs::write(log_path, &contents[keep_from..]);
    }
}

#[must_use]
pub fn log_file_path(temp_dir: Option<&Path>) -> Option<PathBuf> {
    temp_dir.map(|dir| dir.join(LOG_FILE_NAME))
}

/// Diagnostics go to stderr and, when the runner provides a temp dir, to a
/// log file there. Stdout stays reserved for workflow commands.
pub fn init_logging(debug_enabled: bool, temp_dir: Option<&Path>, max_log_size: u64) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("setup_node")
        .build();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Debug,
        config.clone(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    )];

    let log_path = log_file_path(temp_dir);
    if let Some(path) = &log_path {
        trim_log_file_if_oversized(path, max_log_size);
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
            loggers.push(WriteLogger::new(LevelFilter::Debug, config, file));
        }
    }

    let _ = CombinedLogger::init(loggers);

    set_logging_enabled(debug_enabled);

    if debug_enabled && let Some(path) = log_path {
        log::info!("Debug logging initialized, log file: {}", path.display());
    }
}

pub fn set_logging_enabled(enabled: bool) {
    if enabled {
        log::set_max_level(log::LevelFilter::Debug);
    } else {
        log::set_max_level(log::LevelFilter::Off);
    }
}
