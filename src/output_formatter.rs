use crate::errors::Result;
use crate::events::{Level, ProgressEvent};
use crate::rewriter::RewriteSummary;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;

/// Line printed once a run has ended, whatever the outcome.
pub const COMPLETION_MESSAGE: &str = "Replacement completed!";

/// Defines the possible output formats for the event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line, suitable for machine processing.
    Json,
    /// Comma-Separated Values format.
    Csv,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            _ => OutputFormat::Text,
        }
    }
}

enum Sink<W: Write> {
    Text(W),
    Json(W),
    Csv(csv::Writer<W>),
}

/// Renders progress events as they arrive.
///
/// Change events (content rewrites and renames) are only shown in the text
/// format when `verbose` is set; structured formats always carry them.
pub struct EventWriter<W: Write> {
    sink: Sink<W>,
    verbose: bool,
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    at: DateTime<Utc>,
    level: Level,
    message: String,
    #[serde(flatten)]
    event: &'a ProgressEvent,
}

#[derive(Serialize)]
struct JsonCompletion<'a> {
    at: DateTime<Utc>,
    kind: &'static str,
    ok: bool,
    message: &'static str,
    summary: Option<&'a RewriteSummary>,
}

impl<W: Write> EventWriter<W> {
    /// Creates a new `EventWriter`, writing the CSV header if needed.
    pub fn new(writer: W, format: OutputFormat, verbose: bool) -> Result<Self> {
        let sink = match format {
            OutputFormat::Text => Sink::Text(writer),
            OutputFormat::Json => Sink::Json(writer),
            OutputFormat::Csv => {
                let mut wtr = csv::Writer::from_writer(writer);
                wtr.write_record(["at", "level", "kind", "message"])?;
                wtr.flush()?;
                Sink::Csv(wtr)
            }
        };
        Ok(Self { sink, verbose })
    }

    /// Writes a single event and flushes it.
    pub fn write_event(&mut self, event: &ProgressEvent) -> Result<()> {
        match &mut self.sink {
            Sink::Text(w) => {
                if self.verbose || !event.is_change() {
                    writeln!(w, "{event}")?;
                    w.flush()?;
                }
            }
            Sink::Json(w) => {
                let record = JsonEvent {
                    at: Utc::now(),
                    level: event.level(),
                    message: event.to_string(),
                    event,
                };
                serde_json::to_writer(&mut *w, &record)?;
                writeln!(w)?;
                w.flush()?;
            }
            Sink::Csv(wtr) => {
                wtr.write_record([
                    Utc::now().to_rfc3339().as_str(),
                    level_name(event.level()),
                    event.kind(),
                    event.to_string().as_str(),
                ])?;
                wtr.flush()?;
            }
        }
        Ok(())
    }

    /// Writes the closing record of a run.
    ///
    /// The text format prints the summary of a successful run followed by
    /// the completion line; a failed run only gets the completion line, its
    /// cause having already been reported as an event.
    pub fn write_completion(&mut self, outcome: &Result<RewriteSummary>) -> Result<()> {
        let summary = outcome.as_ref().ok();
        match &mut self.sink {
            Sink::Text(w) => {
                if let Some(s) = summary {
                    writeln!(w, "\n{}", "-".repeat(50))?;
                    writeln!(w, "Files scanned   : {}", s.files_scanned)?;
                    writeln!(w, "Files changed   : {}", s.files_rewritten)?;
                    writeln!(w, "Total edits     : {}", s.replacements)?;
                    writeln!(w, "Paths renamed   : {}", s.paths_renamed)?;
                    writeln!(w, "Folders skipped : {}", s.folders_skipped)?;
                    writeln!(w, "Failed files    : {}", s.content_failures)?;
                }
                writeln!(w, "{COMPLETION_MESSAGE}")?;
                w.flush()?;
            }
            Sink::Json(w) => {
                let record = JsonCompletion {
                    at: Utc::now(),
                    kind: "completed",
                    ok: outcome.is_ok(),
                    message: COMPLETION_MESSAGE,
                    summary,
                };
                serde_json::to_writer(&mut *w, &record)?;
                writeln!(w)?;
                w.flush()?;
            }
            Sink::Csv(wtr) => {
                let level = if outcome.is_ok() { Level::Info } else { Level::Error };
                wtr.write_record([
                    Utc::now().to_rfc3339().as_str(),
                    level_name(level),
                    "completed",
                    COMPLETION_MESSAGE,
                ])?;
                wtr.flush()?;
            }
        }
        Ok(())
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Info => "info",
        Level::Skip => "skip",
        Level::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use std::path::PathBuf;

    fn sample_events() -> Vec<ProgressEvent> {
        vec![
            ProgressEvent::Started {
                root: PathBuf::from("/proj"),
                search: "Foo".into(),
                replace: "Bar".into(),
            },
            ProgressEvent::Renamed {
                from: PathBuf::from("/proj/Foo.cs"),
                to: PathBuf::from("/proj/Bar.cs"),
            },
            ProgressEvent::SkippedFolder {
                path: PathBuf::from("/proj/bin"),
            },
        ]
    }

    fn render(format: OutputFormat, verbose: bool, outcome: &Result<RewriteSummary>) -> String {
        let mut buf = Vec::new();
        let mut writer = EventWriter::new(&mut buf, format, verbose).unwrap();
        for event in sample_events() {
            writer.write_event(&event).unwrap();
        }
        writer.write_completion(outcome).unwrap();
        drop(writer);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::from("csv"), OutputFormat::Csv);
        assert_eq!(OutputFormat::from("anything"), OutputFormat::Text);
    }

    #[test]
    fn test_text_hides_changes_unless_verbose() {
        let quiet = render(OutputFormat::Text, false, &Ok(RewriteSummary::default()));
        assert!(quiet.starts_with("Renaming all files and directories containing 'Foo'"));
        assert!(quiet.contains("Skipping folder: /proj/bin\n"));
        assert!(!quiet.contains("Renamed /proj/Foo.cs"));
        assert!(quiet.contains("Paths renamed   : 0"));
        assert!(quiet.ends_with("Replacement completed!\n"));

        let verbose = render(OutputFormat::Text, true, &Ok(RewriteSummary::default()));
        assert!(verbose.contains("Renamed /proj/Foo.cs -> /proj/Bar.cs\n"));
    }

    #[test]
    fn test_text_failure_prints_completion_only() {
        let out = render(
            OutputFormat::Text,
            false,
            &Err(Error::InvalidRoot(PathBuf::from("/proj"))),
        );
        assert!(!out.contains("Files scanned"));
        assert!(out.ends_with("Replacement completed!\n"));
    }

    #[test]
    fn test_json_lines() {
        let out = render(OutputFormat::Json, false, &Ok(RewriteSummary::default()));
        let records: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0]["kind"], "started");
        assert_eq!(records[0]["level"], "info");
        assert_eq!(records[0]["search"], "Foo");
        assert_eq!(records[1]["kind"], "renamed");
        assert_eq!(records[1]["to"], "/proj/Bar.cs");
        assert_eq!(records[2]["level"], "skip");
        assert_eq!(records[2]["message"], "Skipping folder: /proj/bin");
        assert_eq!(records[3]["kind"], "completed");
        assert_eq!(records[3]["ok"], true);
        assert_eq!(records[3]["summary"]["paths_renamed"], 0);
    }

    #[test]
    fn test_csv_rows() {
        let out = render(
            OutputFormat::Csv,
            false,
            &Err(Error::InvalidRoot(PathBuf::from("/proj"))),
        );
        let mut reader = csv::Reader::from_reader(out.as_bytes());
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["at", "level", "kind", "message"]);
        assert_eq!(rows.len(), 4);
        assert_eq!(&rows[2][2], "skipped_folder");
        assert_eq!(&rows[3][1], "error");
        assert_eq!(&rows[3][3], COMPLETION_MESSAGE);
    }

    #[cfg(unix)]
    #[test]
    fn test_json_tolerates_non_utf8_paths() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = PathBuf::from(OsStr::from_bytes(b"/proj/\xffbin"));
        let mut buf = Vec::new();
        let mut writer = EventWriter::new(&mut buf, OutputFormat::Json, false).unwrap();
        writer
            .write_event(&ProgressEvent::SkippedFolder { path })
            .unwrap();
        writer.write_completion(&Ok(RewriteSummary::default())).unwrap();
        drop(writer);

        let out = String::from_utf8(buf).unwrap();
        let records: Vec<serde_json::Value> = out
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["path"], "/proj/\u{FFFD}bin");
        assert_eq!(records[1]["kind"], "completed");
    }
}
