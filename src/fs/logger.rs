//! Mission logger implementing the [`log`] crate's facade.
//!
//! Writes every record to the console and, when the storage is writable,
//! to `mission.log` in the working directory. The file is truncated on
//! init so each power cycle starts a fresh record: one run, one file.
//!
//! # Log output
//!
//! Each entry carries the level, the time since the logger came up, the
//! module that emitted it, and the message:
//!
//! ```text
//! INFO [12s 350ms] talos::mission - box-run: FOLLOW_LINE -> AVOID_OBSTACLE
//! WARN [15s 100ms] talos::mission - box-run: APPROACH_BOX exceeded its 3s budget
//! ```
//!
//! # Usage
//!
//! Initialize once, before the mission starts:
//!
//! ```ignore
//! use talos::fs::logger;
//! use log::LevelFilter;
//!
//! logger::init(LevelFilter::Debug).expect("Logger init failed");
//! ```

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use humantime::format_duration;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// File the mission record is written to.
const LOG_FILE: &str = "mission.log";

/// Dual console/file logger for mission telemetry.
///
/// The file writer is `None` when the log file could not be opened (for
/// instance, read-only storage); logging then degrades to console only
/// rather than failing the run.
pub struct MissionLogger {
    started:     Instant,
    file_writer: Mutex<Option<BufWriter<std::fs::File>>>,
}

impl MissionLogger {
    fn new() -> Self {
        let file_writer = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(LOG_FILE)
            .ok()
            .map(BufWriter::new);

        Self {
            started:     Instant::now(),
            file_writer: Mutex::new(file_writer),
        }
    }
}

impl log::Log for MissionLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = format!(
                "{} [{}] {} - {}\n",
                record.level(),
                format_duration(self.started.elapsed()),
                record.target(),
                record.args()
            );

            print!("{}", line);

            if let Ok(mut writer_guard) = self.file_writer.lock() {
                if let Some(ref mut writer) = *writer_guard {
                    let _ = writer.write_all(line.as_bytes());
                }
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut writer_guard) = self.file_writer.lock() {
            if let Some(ref mut writer) = *writer_guard {
                let _ = writer.flush();
            }
        }
    }
}

static LOGGER: OnceLock<MissionLogger> = OnceLock::new();

/// Initializes the mission logger.
///
/// Call once before any logging macros; the duration timestamps are
/// measured from this moment.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(MissionLogger::new);
    log::set_logger(logger).map(|()| log::set_max_level(level))
}
