use anyhow::anyhow;
use formatx::formatx;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::fs::File;
use std::io;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// A destination for the reports of an analysis run, each report identified by a key.
pub trait Output: Debug {
    fn writer_for_report(&self, report_key: &str) -> anyhow::Result<impl Write>;
    /// Whether this output can be considered a no-op and therefore that any code that only writes to the output can be skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// Writes each report to a file in a directory, named by filling the report key into a template
/// such as `site__{}.csv`.
#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }

    fn file_name(&self, report_key: &str) -> anyhow::Result<String> {
        formatx!(&self.file_template, report_key).map_err(|err| {
            anyhow!(
                "Output file template '{}' could not be filled: {err:?}",
                self.file_template
            )
        })
    }
}

impl Output for FileOutput {
    fn writer_for_report(&self, report_key: &str) -> anyhow::Result<impl Write> {
        let path = self.directory_path.join(self.file_name(report_key)?);
        Ok(BufWriter::new(File::create(path)?))
    }
}

impl Output for &FileOutput {
    fn writer_for_report(&self, report_key: &str) -> anyhow::Result<impl Write> {
        <FileOutput as Output>::writer_for_report(self, report_key)
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_report(&self, _report_key: &str) -> anyhow::Result<impl Write> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

/// Keeps every report in memory, keyed by report key in the order they were first written.
#[derive(Clone, Debug, Default)]
pub struct StringOutput(Arc<Mutex<IndexMap<String, String>>>);

impl StringOutput {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn report(&self, report_key: &str) -> Option<String> {
        self.0.lock().get(report_key).cloned()
    }

    pub fn report_keys(&self) -> Vec<String> {
        self.0.lock().keys().cloned().collect()
    }
}

impl Output for StringOutput {
    fn writer_for_report(&self, report_key: &str) -> anyhow::Result<impl Write> {
        self.0.lock().insert(report_key.to_string(), String::new());
        Ok(ReportStringWriter {
            reports: self.0.clone(),
            report_key: report_key.to_string(),
        })
    }
}

impl Output for &StringOutput {
    fn writer_for_report(&self, report_key: &str) -> anyhow::Result<impl Write> {
        <StringOutput as Output>::writer_for_report(self, report_key)
    }
}

/// Appends everything written to one report of a [`StringOutput`].
struct ReportStringWriter {
    reports: Arc<Mutex<IndexMap<String, String>>>,
    report_key: String,
}

impl Write for ReportStringWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let utf8 = std::str::from_utf8(buf)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        self.reports
            .lock()
            .entry(self.report_key.clone())
            .or_default()
            .push_str(utf8);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn should_collect_reports_in_memory() {
        let output = StringOutput::new();
        write!(output.writer_for_report("summary").unwrap(), "a,b\n1,2\n").unwrap();
        write!(output.writer_for_report("balance").unwrap(), "c\n3\n").unwrap();

        assert_eq!(output.report_keys(), vec!["summary", "balance"]);
        assert_eq!(output.report("summary").unwrap(), "a,b\n1,2\n");
        assert_eq!(output.report("balance").unwrap(), "c\n3\n");
        assert_eq!(output.report("missing"), None);
    }

    #[rstest]
    fn should_fill_file_template() {
        let output = FileOutput::new(PathBuf::from("."), "site__{}.csv".to_string());
        assert_eq!(output.file_name("summary").unwrap(), "site__summary.csv");
    }

    #[rstest]
    fn should_write_report_file() {
        let directory = std::env::temp_dir();
        let template = format!("solar_tradeoff_output_test_{}__{{}}.csv", std::process::id());
        let output = FileOutput::new(directory.clone(), template.clone());
        {
            let mut writer = output.writer_for_report("summary").unwrap();
            writeln!(writer, "Panel size").unwrap();
        }

        let path = directory.join(template.replace("{}", "summary"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Panel size\n");
        std::fs::remove_file(path).unwrap();
    }

    #[rstest]
    fn sink_should_be_noop() {
        assert!(SinkOutput.is_noop());
        assert!(!StringOutput::new().is_noop());
    }
}
