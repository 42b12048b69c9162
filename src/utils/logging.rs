// Tue Jan 13 2026 - Alex

use colored::*;
use log::{Level, LevelFilter, Log, Metadata, Record};
use parking_lot::Mutex;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

pub const DISCOVERY_TARGET: &str = "module_discovery::discovery";

pub struct LoggingUtils;

impl LoggingUtils {
    pub fn init_logger(level: LevelFilter, use_color: bool) {
        Self::install(Box::new(ConsoleLogger { level, use_color }), level);
    }

    pub fn init_logger_with_file(level: LevelFilter, file_path: &Path) -> std::io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(file_path)?;
        Self::install(Box::new(FileLogger { level, file: Mutex::new(file) }), level);
        Ok(())
    }

    pub fn level_from_verbosity(verbosity: u8) -> LevelFilter {
        match verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn install(logger: Box<dyn Log>, level: LevelFilter) {
        // a second init in the same process keeps the first logger
        if log::set_boxed_logger(logger).is_ok() {
            log::set_max_level(level);
        }
    }
}

/// Honors RUST_LOG when set, otherwise falls back to the colored stderr logger.
pub fn init_logging(verbosity: u8, use_color: bool) {
    if std::env::var_os("RUST_LOG").is_some() {
        env_logger::try_init().ok();
    } else {
        LoggingUtils::init_logger(LoggingUtils::level_from_verbosity(verbosity), use_color);
    }
}

struct ConsoleLogger {
    level: LevelFilter,
    use_color: bool,
}

impl ConsoleLogger {
    fn label(&self, level: Level) -> String {
        let plain = format!("{:5}", level);
        if !self.use_color {
            return plain;
        }
        match level {
            Level::Error => plain.red().bold().to_string(),
            Level::Warn => plain.yellow().bold().to_string(),
            Level::Info => plain.green().to_string(),
            Level::Debug => plain.blue().to_string(),
            Level::Trace => plain.dimmed().to_string(),
        }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let target = format!("[{}]", record.target());
        let target = if self.use_color { target.dimmed().to_string() } else { target };
        eprintln!("{} {} {}", self.label(record.level()), target, record.args());
    }

    fn flush(&self) {}
}

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
        let _ = writeln!(
            self.file.lock(),
            "{}.{:03} {:5} [{}] {}",
            since_epoch.as_secs(),
            since_epoch.subsec_millis(),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
    }
}

/// Logger handle scoped to one discovery run.
///
/// Records go to the injected sink when there is one, otherwise to the
/// global `log` logger. Every line carries the run id.
#[derive(Clone)]
pub struct DiscoveryLog {
    sink: Option<Arc<dyn Log>>,
    run_id: u64,
}

impl DiscoveryLog {
    pub fn new(sink: Option<Arc<dyn Log>>, run_id: u64) -> Self {
        Self { sink, run_id }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        match &self.sink {
            Some(sink) => self.emit(sink.as_ref(), level, args),
            None => {
                if level <= log::max_level() {
                    self.emit(log::logger(), level, args);
                }
            }
        }
    }

    fn emit(&self, logger: &dyn Log, level: Level, args: fmt::Arguments<'_>) {
        let metadata = Metadata::builder()
            .level(level)
            .target(DISCOVERY_TARGET)
            .build();
        if !logger.enabled(&metadata) {
            return;
        }

        logger.log(
            &Record::builder()
                .metadata(metadata)
                .args(format_args!("[run {}] {}", self.run_id, args))
                .module_path_static(Some(module_path!()))
                .build(),
        );
    }

    pub fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    pub fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    pub fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    pub fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    pub fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args);
    }

    pub fn timer(&self, phase: &'static str) -> ScopedTimer {
        ScopedTimer {
            log: self.clone(),
            phase,
            start: Instant::now(),
        }
    }
}

impl fmt::Debug for DiscoveryLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryLog")
            .field("injected", &self.sink.is_some())
            .field("run_id", &self.run_id)
            .finish()
    }
}

/// Reports how long a phase of a run took, at debug level, when dropped.
pub struct ScopedTimer {
    log: DiscoveryLog,
    phase: &'static str,
    start: Instant,
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        self.log.debug(format_args!(
            "{} took {:.2}ms",
            self.phase,
            self.start.elapsed().as_secs_f64() * 1000.0
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::testing::CapturingLogger;

    #[test]
    fn test_discovery_log_prefixes_run_id() {
        let sink = Arc::new(CapturingLogger::new(LevelFilter::Debug));
        let log = DiscoveryLog::new(Some(sink.clone()), 42);

        log.warn(format_args!("candidate {} faulted", "A.dll"));
        log.trace(format_args!("filtered out"));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Warn);
        assert_eq!(lines[0].1, "[run 42] candidate A.dll faulted");
    }

    #[test]
    fn test_timer_reports_phase_on_drop() {
        let sink = Arc::new(CapturingLogger::new(LevelFilter::Debug));
        let log = DiscoveryLog::new(Some(sink.clone()), 3);

        drop(log.timer("enumeration"));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::Debug);
        assert!(lines[0].1.starts_with("[run 3] enumeration took "));
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LoggingUtils::level_from_verbosity(0), LevelFilter::Warn);
        assert_eq!(LoggingUtils::level_from_verbosity(2), LevelFilter::Debug);
        assert_eq!(LoggingUtils::level_from_verbosity(9), LevelFilter::Trace);
    }
}
