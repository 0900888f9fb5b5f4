//! File logger for editor runs.
//!
//! Each run writes to `{log_dir}/{timestamp}_{uuid}/log` and echoes every line
//! to stderr.

use anyhow::{Context, Result};
use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::fs::{create_dir_all, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

pub struct EditorLogger {
    level: LevelFilter,
    file: Arc<Mutex<File>>,
    run_id: String,
    log_path: PathBuf,
}

impl EditorLogger {
    /// Creates the run directory under `log_dir` and opens its log file
    pub fn new(level: LevelFilter, log_dir: &Path) -> Result<Self> {
        let run_id = Self::new_run_id();

        let run_dir = log_dir.join(&run_id);
        create_dir_all(&run_dir)
            .with_context(|| format!("Failed to create log directory: {}", run_dir.display()))?;

        let log_path = run_dir.join("log");
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

        Ok(Self {
            level,
            file: Arc::new(Mutex::new(file)),
            run_id,
            log_path,
        })
    }

    /// `{YYYYmmdd_HHMMSS}_{first uuid group}`
    fn new_run_id() -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let uuid = Uuid::new_v4().to_string();
        let short = uuid.split('-').next().unwrap_or("unknown");
        format!("{timestamp}_{short}")
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Installs a new logger as the global `log` backend and returns its file path
    pub fn init(level: LevelFilter, log_dir: &Path) -> Result<PathBuf> {
        let logger = Self::new(level, log_dir)?;
        let run_id = logger.run_id.clone();
        let log_path = logger.log_path.clone();

        log::set_boxed_logger(Box::new(logger))
            .map(|()| log::set_max_level(level))
            .map_err(|e| anyhow::anyhow!("Failed to set logger: {}", e))?;

        log::info!("scene editor logger initialized, run {run_id}");
        log::info!("log file: {}", log_path.display());
        Ok(log_path)
    }

    fn format_record(record: &Record) -> String {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        format!(
            "{} {} [{}] {}",
            timestamp,
            record.level(),
            record.target(),
            record.args()
        )
    }
}

impl Log for EditorLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = Self::format_record(record);

        if let Ok(mut file) = self.file.lock() {
            // a failed log write must not take the editor down
            let _ = writeln!(file, "{message}");
            let _ = file.flush();
        }

        eprintln!("{message}");
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Writes a banner line pair around `name` to mark a new phase in the log
pub fn log_section(name: &str) {
    let separator = "=".repeat(50);
    log::info!("{separator}");
    log::info!("SECTION: {name}");
    log::info!("{separator}");
}
