//! Logger bootstrap for binaries embedding the board.
//!
//! The library itself only emits through the `log` facade. [`init_logging`]
//! starts a `flexi_logger` backend on stderr once per process.

use crate::error::{BoardError, Result};
use flexi_logger::{Logger, LoggerHandle};
use log::info;
use once_cell::sync::OnceCell;

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Starts stderr logging at `level`.
///
/// Calling again with the same level is a no-op; a different level is
/// rejected because the backend cannot be restarted.
pub fn init_logging(level: &str) -> Result<()> {
    let level = normalize_level(level)?;

    let state = LOGGING_STATE.get_or_try_init(|| -> Result<LoggingState> {
        let logger = Logger::try_with_str(level)
            .map_err(|err| BoardError::LoggingError(format!("invalid log level `{level}`: {err}")))?
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start()
            .map_err(|err| BoardError::LoggingError(format!("failed to start logger: {err}")))?;

        info!(
            "event=logging_init level={} version={}",
            level,
            env!("CARGO_PKG_VERSION")
        );
        Ok(LoggingState {
            level,
            _logger: logger,
        })
    })?;

    if state.level != level {
        return Err(BoardError::LoggingError(format!(
            "logging already initialized with level `{}`; refusing to switch to `{}`",
            state.level, level
        )));
    }
    Ok(())
}

/// Level currently in effect, if logging was started
pub fn logging_level() -> Option<&'static str> {
    LOGGING_STATE.get().map(|state| state.level)
}

/// `debug` for debug builds, `info` otherwise
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => Err(BoardError::LoggingError(format!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
        ))),
    }
}
