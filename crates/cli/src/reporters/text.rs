use analyzer_core::{EngineDescriptor, Issue};
use orchestrator::{ReportError, Reporter};
use std::io::Write;

/// Human-readable report: one section per engine and a closing count.
pub struct TextReporter<W: Write> {
    writer: W,
    pending: Vec<Issue>,
    total: usize,
    closed: bool,
}

impl<W: Write> TextReporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending: Vec::new(),
            total: 0,
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

    fn format_issue(issue: &Issue) -> String {
        let path = issue.path().unwrap_or("?");
        let location = match issue.begin_line() {
            Some(line) => format!("{}:{}", path, line),
            None => path.to_string(),
        };
        format!(
            "  {}: {} [{}]",
            location,
            issue.description().unwrap_or_default(),
            issue.check_name().unwrap_or_default()
        )
    }
}

impl<W: Write + Send> Reporter for TextReporter<W> {
    fn started(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        writeln!(self.writer, "Starting analysis")?;
        Ok(())
    }

    fn engine_started(&mut self, _engine: &EngineDescriptor) -> Result<(), ReportError> {
        self.ensure_open()?;
        self.pending.clear();
        Ok(())
    }

    fn write(&mut self, issue: Issue) -> Result<(), ReportError> {
        self.ensure_open()?;
        self.pending.push(issue);
        Ok(())
    }

    fn engine_finished(&mut self, engine: &EngineDescriptor) -> Result<(), ReportError> {
        self.ensure_open()?;
        let issues = std::mem::take(&mut self.pending);

        writeln!(self.writer)?;
        writeln!(self.writer, "== {} ({} found) ==", engine.name(), issues.len())?;
        for issue in &issues {
            writeln!(self.writer, "{}", Self::format_issue(issue))?;
        }

        self.total += issues.len();
        Ok(())
    }

    fn finished(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        writeln!(self.writer)?;
        writeln!(self.writer, "Analysis complete! Found {} issues.", self.total)?;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ReportError> {
        self.ensure_open()?;
        self.closed = true;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::test_support::{descriptor, issue};

    #[test]
    fn test_sections_and_summary() {
        let mut reporter = TextReporter::new(Vec::new());
        let rubocop = descriptor("rubocop");
        let structure = descriptor("structure");

        reporter.started().unwrap();
        reporter.engine_started(&rubocop).unwrap();
        reporter.write(issue("Style/A", "lib/a.rb", 3)).unwrap();
        reporter.engine_finished(&rubocop).unwrap();
        reporter.engine_started(&structure).unwrap();
        reporter.engine_finished(&structure).unwrap();
        reporter.finished().unwrap();
        reporter.close().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(text.contains("== rubocop (1 found) =="));
        assert!(text.contains("  lib/a.rb:3: Style/A triggered [Style/A]"));
        assert!(text.contains("== structure (0 found) =="));
        assert!(text.ends_with("Analysis complete! Found 1 issues.\n"));
    }

    #[test]
    fn test_aborted_run_has_no_summary() {
        let mut reporter = TextReporter::new(Vec::new());
        let rubocop = descriptor("rubocop");

        reporter.started().unwrap();
        reporter.engine_started(&rubocop).unwrap();
        reporter.engine_finished(&rubocop).unwrap();
        reporter.close().unwrap();

        let text = String::from_utf8(reporter.into_inner()).unwrap();
        assert!(!text.contains("Analysis complete"));
    }

    #[test]
    fn test_rejects_writes_after_close() {
        let mut reporter = TextReporter::new(Vec::new());
        reporter.close().unwrap();

        assert!(matches!(
            reporter.write(issue("Style/A", "a.rb", 1)),
            Err(ReportError::Closed)
        ));
    }
}
