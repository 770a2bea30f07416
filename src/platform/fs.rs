// YAM Log Relay - platform/fs.rs
//
// Sinks backed by an `io::Write`: the on-disk log file and stdout.
//
// Files are append-only, so `trim_oldest` only lowers the logical retained
// count the relay uses for its limit; nothing already written is removed.
// Write failures are logged and counted, never propagated (sinks are total).

use crate::core::model::LogKind;
use crate::core::sink::Sink;
use crate::util::error::SinkError;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Sink writing one rendered line per `append` to `W`, flushed immediately
/// so a crash never loses lines that were already shown.
pub struct WriterSink<W: Write> {
    writer: W,
    /// Where the lines go, for diagnostics ("stdout" or a file path).
    label: String,
    retained: usize,
    write_errors: u64,
}

/// Append-mode log file.
pub type FileSink = WriterSink<BufWriter<File>>;

/// Process standard output.
pub type StdoutSink = WriterSink<io::Stdout>;

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W, label: impl Into<String>) -> Self {
        Self {
            writer,
            label: label.into(),
            retained: 0,
            write_errors: 0,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of appends that failed to write.
    pub fn write_errors(&self) -> u64 {
        self.write_errors
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

impl FileSink {
    /// Open `path` for appending, creating it and its parent directories.
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let open_err = |source| SinkError::Open {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(open_err)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(open_err)?;

        tracing::info!(path = %path.display(), "Log file opened");
        Ok(WriterSink::new(
            BufWriter::new(file),
            path.display().to_string(),
        ))
    }
}

/// Sink on process standard output (headless mode).
pub fn stdout_sink() -> StdoutSink {
    WriterSink::new(io::stdout(), "stdout")
}

impl<W: Write> Sink for WriterSink<W> {
    fn append(&mut self, text: &str, _kind: LogKind) {
        match self.write_line(text) {
            Ok(()) => self.retained += 1,
            Err(e) => {
                self.write_errors += 1;
                // Report the first failure only: the report itself may be
                // bridged back into this sink.
                if self.write_errors == 1 {
                    tracing::warn!(sink = %self.label, error = %e, "Log sink write failed");
                }
            }
        }
    }

    fn line_count(&self) -> usize {
        self.retained
    }

    fn trim_oldest(&mut self, n: usize) {
        self.retained -= n.min(self.retained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_writer_sink_writes_one_line_per_append() {
        let mut sink = WriterSink::new(Vec::new(), "memory");
        sink.append("* Checking account work", LogKind::Message);
        sink.append("*** Connection refused", LogKind::Error);
        assert_eq!(sink.line_count(), 2);
        let written = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(written, "* Checking account work\n*** Connection refused\n");
    }

    #[test]
    fn test_trim_lowers_logical_count_only() {
        let mut sink = WriterSink::new(Vec::new(), "memory");
        for i in 0..4 {
            sink.append(&i.to_string(), LogKind::Plain);
        }
        sink.trim_oldest(3);
        assert_eq!(sink.line_count(), 1);
        sink.trim_oldest(10);
        assert_eq!(sink.line_count(), 0);
        assert_eq!(sink.into_inner(), b"0\n1\n2\n3\n");
    }

    #[test]
    fn test_write_failure_is_counted_not_propagated() {
        let mut sink = WriterSink::new(BrokenPipe, "broken");
        sink.append("lost", LogKind::Plain);
        sink.append("lost too", LogKind::Plain);
        assert_eq!(sink.write_errors(), 2);
        assert_eq!(sink.line_count(), 0);
    }

    #[test]
    fn test_file_sink_creates_parent_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("yam.log");

        {
            let mut sink = FileSink::open(&path).unwrap();
            sink.append("first", LogKind::Plain);
        }
        {
            let mut sink = FileSink::open(&path).unwrap();
            sink.append("second", LogKind::Warning);
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nsecond\n");
    }

    #[test]
    fn test_file_sink_open_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        // A directory cannot be opened as an append-mode file.
        let err = match FileSink::open(dir.path()) {
            Err(e) => e,
            Ok(_) => panic!("opening a directory as a log file must fail"),
        };
        assert!(matches!(err, SinkError::Open { .. }));
        assert!(err.to_string().contains(&dir.path().display().to_string()));
        assert!(std::error::Error::source(&err).is_some());
    }
}
