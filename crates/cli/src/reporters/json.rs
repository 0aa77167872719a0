use analyzer_core::{EngineDescriptor, Issue};
use orchestrator::{ReportError, Reporter};
use std::io::Write;

/// Writes every finding as one element of a JSON array.
///
/// The array opens on `started` and is terminated on `finished`, or on
/// `close` when the run aborted, so the output always parses.
pub struct JsonReporter<W: Write> {
    writer: W,
    written: usize,
    open: bool,
    closed: bool,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            open: false,
            closed: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn ensure_open(&self) -> Result<(), ReportError> {
        if self.closed {
            return Err(ReportError::Closed);
        }
        Ok(())
    }

    fn terminate(&mut self) -> Result<(), ReportError> {
        if self.open {
            self.open = false;
            writeln!(self.writer, "]")?;
        }
        Ok(())
    }
}

impl<W: Write + Send> Reporter for JsonReporter<W> {
    fn started(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        write!(self.writer, "[")?;
        self.open = true;
        Ok(())
    }

    fn engine_started(&mut self, _engine: &EngineDescriptor) -> Result<(), ReportError> {
        self.ensure_open()
    }

    fn write(&mut self, issue: Issue) -> Result<(), ReportError> {
        self.ensure_open()?;
        if self.written > 0 {
            write!(self.writer, ",")?;
        }
        serde_json::to_writer(&mut self.writer, &issue)?;
        self.written += 1;
        Ok(())
    }

    fn engine_finished(&mut self, _engine: &EngineDescriptor) -> Result<(), ReportError> {
        self.ensure_open()
    }

    fn finished(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        self.terminate()
    }

    fn close(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        self.closed = true;
        self.terminate()?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::test_support::{descriptor, issue};
    use serde_json::Value;

    fn output(reporter: JsonReporter<Vec<u8>>) -> Value {
        serde_json::from_slice(&reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_writes_array_of_issues() {
        let mut reporter = JsonReporter::new(Vec::new());
        let rubocop = descriptor("rubocop");

        reporter.started().unwrap();
        reporter.engine_started(&rubocop).unwrap();
        reporter.write(issue("Style/A", "a.rb", 1)).unwrap();
        reporter.write(issue("Style/B", "b.rb", 2)).unwrap();
        reporter.engine_finished(&rubocop).unwrap();
        reporter.finished().unwrap();
        reporter.close().unwrap();

        let value = output(reporter);
        let issues = value.as_array().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[1]["check_name"], "Style/B");
    }

    #[test]
    fn test_empty_run_is_empty_array() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.started().unwrap();
        reporter.finished().unwrap();
        reporter.close().unwrap();

        assert_eq!(output(reporter), Value::Array(Vec::new()));
    }

    #[test]
    fn test_aborted_run_still_parses() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.started().unwrap();
        reporter.write(issue("Style/A", "a.rb", 1)).unwrap();
        reporter.close().unwrap();

        assert_eq!(output(reporter).as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_rejects_writes_after_close() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.started().unwrap();
        reporter.close().unwrap();

        assert!(matches!(
            reporter.write(issue("Style/A", "a.rb", 1)),
            Err(ReportError::Closed)
        ));
    }
}
