//! File logging bootstrap.
//!
//! The binary logs to rotating files, never to stdout or stderr, which the
//! interactive menu owns. The returned handle must stay alive for the
//! duration of the program; dropping it shuts the logger down.

use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming};

const LOG_BASENAME: &str = "carnet";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

pub fn init(log_dir: &Path, verbose: bool) -> Result<LoggerHandle, FlexiLoggerError> {
    let level = if verbose { "debug" } else { "info" };
    Logger::try_with_str(level)?
        .log_to_file(
            FileSpec::default()
                .directory(log_dir)
                .basename(LOG_BASENAME),
        )
        .rotate(
            Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(MAX_LOG_FILES),
        )
        .append()
        .start()
}
