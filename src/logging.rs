use anyhow::Result;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::MakeWriter;

use crate::platform::{NativePlatform, Platform};

pub const LOG_FILE: &str = "nanodash.log";

/// Appends formatted events to the dashboard log file, optionally echoing
/// them to stdout. The TUI owns the terminal, so it runs with the echo off.
#[derive(Clone)]
pub(crate) struct FileMakeWriter {
    file: Arc<Mutex<File>>,
    echo_stdout: bool,
}

impl FileMakeWriter {
    pub fn open(path: &Path, echo_stdout: bool) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Arc::new(Mutex::new(file)),
            echo_stdout,
        })
    }
}

impl<'a> MakeWriter<'a> for FileMakeWriter {
    type Writer = FileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriter {
            file: self.file.clone(),
            echo_stdout: self.echo_stdout,
        }
    }
}

pub(crate) struct FileWriter {
    file: Arc<Mutex<File>>,
    echo_stdout: bool,
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        {
            let mut file = self
                .file
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            file.write_all(buf)?;
        }
        if self.echo_stdout {
            std::io::stdout().write_all(buf)?;
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .flush()?;
        if self.echo_stdout {
            std::io::stdout().flush()?;
        }
        Ok(())
    }
}

/// Unknown level names fall back to `info`.
pub(crate) fn parse_level(level: &str) -> Level {
    level.trim().parse::<Level>().unwrap_or(Level::INFO)
}

/// Install the global subscriber writing to `<data_dir>/logs/nanodash.log`.
/// Returns the log file path.
pub(crate) fn init(data_dir: &Path, level: &str, echo_stdout: bool) -> Result<PathBuf> {
    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir)?;
    NativePlatform::restrict_dir_permissions(data_dir);

    let path = logs_dir.join(LOG_FILE);
    let make_writer = FileMakeWriter::open(&path, echo_stdout)?;
    NativePlatform::restrict_file_permissions(&path);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(level))
        .with_ansi(false)
        .with_writer(make_writer)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
    Ok(path)
}
