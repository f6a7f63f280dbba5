//! Logging infrastructure using `log` + `log4rs`.

mod consts;

pub use consts::*;

use log::LevelFilter;
use log4rs::{
    append::{
        console::{ConsoleAppender, Target},
        rolling_file::{
            policy::compound::{roll::fixed_window::FixedWindowRoller, trigger::size::SizeTrigger, CompoundPolicy},
            RollingFileAppender,
        },
    },
    config::{Appender, Logger, Root},
    encode::pattern::PatternEncoder,
    Config,
};
use std::io::IsTerminal;
use std::path::PathBuf;

const CONSOLE_APPENDER: &str = "stderr";
const LOG_FILE_APPENDER: &str = "log_file";

struct FilterConfig {
    app_level: LevelFilter,
    root_level: LevelFilter,
    modules: Vec<(String, LevelFilter)>,
}

/// Initialize the quorum logger with optional file output.
///
/// # Arguments
/// - `log_dir`: Optional directory for log files. If `None`, only console output is used.
/// - `filters`: Filter expression (e.g. `"info"` for quorum crates, `"quorum_core=debug"`, `"root=info"`).
///
/// # Filtering Strategy (Whitelist)
/// - Root level defaults to OFF (suppresses all external crates completely)
/// - `quorum_core` is whitelisted at the requested app level (default INFO)
/// - Specific 3rd party crates are opted in via `<crate>=<level>`
/// - All 3rd party logs are opted in by explicitly setting `root=<level>`
///
/// The logger is global; repeated calls are ignored. Console output goes to stderr.
pub fn init_logger(log_dir: Option<&str>, filters: &str) {
    let filter = parse_filters(filters);

    let use_ansi = std::io::stderr().is_terminal();
    let console_pattern = if use_ansi { LOG_LINE_PATTERN_COLORED } else { LOG_LINE_PATTERN };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(console_pattern)))
        .build();

    let mut config_builder = Config::builder().appender(Appender::builder().build(CONSOLE_APPENDER, Box::new(console)));
    let mut root_appenders: Vec<&str> = vec![CONSOLE_APPENDER];

    if let Some(dir) = log_dir.filter(|s| !s.trim().is_empty()) {
        let dir = dir.trim();
        let log_path = PathBuf::from(dir).join(LOG_FILE_NAME);
        let archive_pattern = PathBuf::from(dir).join(format!("{LOG_FILE_NAME}.{{}}.gz"));

        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(archive_pattern.to_str().unwrap_or("quorum.log.{}.gz"), LOG_FILE_MAX_ROLLS);
        if let Ok(roller) = roller {
            let policy = CompoundPolicy::new(Box::new(SizeTrigger::new(LOG_FILE_MAX_SIZE)), Box::new(roller));
            if let Ok(file_appender) =
                RollingFileAppender::builder().encoder(Box::new(PatternEncoder::new(LOG_LINE_PATTERN))).build(log_path, Box::new(policy))
            {
                config_builder = config_builder.appender(Appender::builder().build(LOG_FILE_APPENDER, Box::new(file_appender)));
                root_appenders.push(LOG_FILE_APPENDER);
            }
        }
    }

    let appender_names: Vec<String> = root_appenders.iter().map(|name| (*name).to_string()).collect();

    // Whitelist our crates at the requested app level unless explicitly overridden.
    for crate_name in WHITELISTED_CRATES {
        if !filter.modules.iter().any(|(m, _)| m == *crate_name) {
            config_builder = config_builder
                .logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(*crate_name, filter.app_level));
        }
    }
    for (module, level) in &filter.modules {
        config_builder =
            config_builder.logger(Logger::builder().appenders(appender_names.clone()).additive(false).build(module, *level));
    }

    if let Ok(config) = config_builder.build(Root::builder().appenders(root_appenders).build(filter.root_level)) {
        let _ = log4rs::init_config(config);
    }
}

fn parse_filters(filters: &str) -> FilterConfig {
    let mut filter = FilterConfig { app_level: LevelFilter::Info, root_level: LevelFilter::Off, modules: Vec::new() };
    for part in filters.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        match part.split_once('=') {
            None => {
                if let Ok(level) = part.parse() {
                    filter.app_level = level;
                }
            }
            Some((module, level_str)) => {
                let module = module.trim();
                let Ok(level) = level_str.trim().parse() else {
                    continue;
                };
                if module == "root" {
                    filter.root_level = level;
                } else if !module.is_empty() {
                    filter.modules.push((module.to_string(), level));
                }
            }
        }
    }
    filter
}
