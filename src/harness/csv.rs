//! Append-only CSV result log.

use std::borrow::Cow;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::session::RunRecord;
use crate::error::Result;

/// Column names, in row order.
pub const CSV_HEADER: [&str; 9] = [
    "run_at",
    "instance",
    "algo",
    "n",
    "threads",
    "time_ms",
    "sumC",
    "speedup",
    "efficiency",
];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A CSV file that benchmark rows are appended to.
///
/// New (or empty) files start with a UTF-8 byte order mark and the header
/// row, so spreadsheet tools pick up the encoding and the `;` separator
/// without an import dialog.
#[derive(Debug, Clone)]
pub struct CsvLog {
    path: PathBuf,
    separator: char,
}

impl CsvLog {
    /// A log at `path` using `;` as separator.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            separator: ';',
        }
    }

    /// Sets the field separator.
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record, creating the file and its parent directories
    /// when needed.
    pub fn append(&self, record: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let is_new = fs::metadata(&self.path).map_or(true, |m| m.len() == 0);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut out = Vec::new();
        if is_new {
            out.extend_from_slice(UTF8_BOM);
            out.extend_from_slice(self.join(CSV_HEADER.iter().map(|h| Cow::Borrowed(*h))).as_bytes());
        }
        out.extend_from_slice(self.format_row(record).as_bytes());
        file.write_all(&out)?;

        tracing::debug!(
            path = %self.path.display(),
            algorithm = record.algorithm.name(),
            speedup = record.speedup,
            efficiency = record.efficiency,
            "row appended"
        );
        Ok(())
    }

    /// Formats `record` as one terminated CSV line.
    pub fn format_row(&self, record: &RunRecord) -> String {
        let fields = [
            record.run_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            record.instance.clone(),
            record.algorithm.name().to_string(),
            record.n.to_string(),
            record.threads.to_string(),
            record.time_ms.to_string(),
            record.objective.to_string(),
            format!("{:.3}", record.speedup),
            format!("{:.3}", record.efficiency),
        ];
        self.join(fields.into_iter().map(Cow::Owned))
    }

    fn join<'a>(&self, fields: impl Iterator<Item = Cow<'a, str>>) -> String {
        let mut line = String::new();
        for (k, field) in fields.enumerate() {
            if k > 0 {
                line.push(self.separator);
            }
            line.push_str(&escape(&field, self.separator));
        }
        line.push('\n');
        line
    }
}

/// Quotes a field that contains the separator, a quote or a line break,
/// doubling embedded quotes.
fn escape(field: &str, separator: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == separator || c == '"' || c == '\n' || c == '\r');
    if !needs_quotes {
        return Cow::Borrowed(field);
    }
    let mut quoted = String::with_capacity(field.len() + 2);
    quoted.push('"');
    for c in field.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Cow::Owned(quoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::Algorithm;
    use chrono::NaiveDate;

    fn record(instance: &str) -> RunRecord {
        RunRecord {
            run_at: NaiveDate::from_ymd_opt(2025, 3, 14)
                .and_then(|d| d.and_hms_opt(9, 26, 53))
                .unwrap(),
            instance: instance.to_string(),
            algorithm: Algorithm::CheapestInsertion,
            n: 200,
            threads: 4,
            time_ms: 35,
            objective: 123_456,
            speedup: 2.5,
            efficiency: 0.625,
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain", ';'), "plain");
        assert_eq!(escape("a;b", ';'), "\"a;b\"");
        assert_eq!(escape("say \"hi\"", ';'), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("a,b", ';'), "a,b");
        assert_eq!(escape("a,b", ','), "\"a,b\"");
        assert_eq!(escape("line\nbreak", ';'), "\"line\nbreak\"");
    }

    #[test]
    fn test_format_row() {
        let log = CsvLog::new("unused.csv");
        assert_eq!(
            log.format_row(&record("data/input_200.txt")),
            "2025-03-14 09:26:53;data/input_200.txt;CheapestInsertion;200;4;35;123456;2.500;0.625\n"
        );
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");
        let log = CsvLog::new(&path);
        log.append(&record("a")).unwrap();
        log.append(&record("b;c")).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = String::from_utf8(bytes[UTF8_BOM.len()..].to_vec()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER.join(";"));
        assert!(lines[1].contains(";a;"));
        assert!(lines[2].contains(";\"b;c\";"));
    }

    #[test]
    fn test_append_to_empty_file_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(&path, b"").unwrap();
        CsvLog::new(&path).append(&record("x")).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.trim_start_matches('\u{feff}').starts_with("run_at;instance;algo"));
    }

    #[test]
    fn test_custom_separator() {
        let log = CsvLog::new("unused.csv").with_separator(',');
        let row = log.format_row(&record("x"));
        assert_eq!(row.matches(',').count(), 8);
    }
}
