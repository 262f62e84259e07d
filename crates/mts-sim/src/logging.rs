//! Terminal and log-file logging.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::LevelFilter;
use mts_core::{ErrorInfo, MtsError};
use simplelog::{
    ColorChoice, CombinedLogger, Config, SharedLogger, TermLogger, TerminalMode, WriteLogger,
};

/// Verbosity selected by `--debug`.
pub fn level_for_debug(debug: u8) -> LevelFilter {
    match debug {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[derive(Debug)]
enum SinkState {
    Buffered(Vec<u8>),
    File(File),
}

/// Log file whose path is only known once the output tag exists. Records written
/// before [`LogSink::attach`] are buffered and replayed into the file.
#[derive(Debug, Clone)]
pub struct LogSink {
    state: Arc<Mutex<SinkState>>,
}

impl Default for LogSink {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(SinkState::Buffered(Vec::new()))),
        }
    }
}

impl LogSink {
    fn lock(&self) -> MutexGuard<'_, SinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Creates the log file and moves buffered records into it.
    pub fn attach(&self, path: &Path) -> Result<(), MtsError> {
        let log_error = |err| MtsError::io(MtsError::Output, "mts_sim.log_file", path, err);
        let mut file = File::create(path).map_err(log_error)?;
        let mut state = self.lock();
        if let SinkState::Buffered(buffer) = &*state {
            file.write_all(buffer).map_err(log_error)?;
        }
        *state = SinkState::File(file);
        Ok(())
    }

    pub fn is_attached(&self) -> bool {
        matches!(*self.lock(), SinkState::File(_))
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut *self.lock() {
            SinkState::Buffered(buffer) => {
                buffer.extend_from_slice(buf);
                Ok(buf.len())
            }
            SinkState::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.lock() {
            SinkState::Buffered(_) => Ok(()),
            SinkState::File(file) => file.flush(),
        }
    }
}

/// Installs the global logger: terminal plus `sink`.
pub fn init(debug: u8, sink: &LogSink) -> Result<(), MtsError> {
    let level = level_for_debug(debug);
    let loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(level, Config::default(), sink.clone()),
    ];
    CombinedLogger::init(loggers).map_err(|err| {
        MtsError::Output(ErrorInfo::new("mts_sim.logging_init", err.to_string()))
    })
}
