//! Report rendering.
//!
//! Three writers share one trait: human-readable terminal output, JSON for
//! tooling, and GitHub Actions workflow annotations. Paths are shown
//! relative to the scanned base directory when one is known.

use colored::*;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::core::{IssueKind, Report};

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Github,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()>;
}

pub fn create_writer<'a>(
    writer: Box<dyn Write + 'a>,
    format: OutputFormat,
    base_path: Option<PathBuf>,
) -> Box<dyn OutputWriter + 'a> {
    match format {
        OutputFormat::Pretty => Box::new(PrettyWriter::new(writer, base_path)),
        OutputFormat::Json => Box::new(JsonWriter::new(writer, base_path)),
        OutputFormat::Github => Box::new(GithubWriter::new(writer, base_path)),
    }
}

/// Strip the base directory prefix from a path for display.
fn display_path(path: &Path, base_path: Option<&Path>) -> String {
    let relative = base_path
        .and_then(|base| path.strip_prefix(base).ok())
        .unwrap_or(path);
    relative.display().to_string()
}

fn issue_icon(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::ExtraParam => "[X]",
        IssueKind::TypeMismatch | IssueKind::ReturnMismatch => "[!]",
        IssueKind::MissingParam | IssueKind::MissingReturn => "[?]",
        IssueKind::ParamOrder => "[-]",
    }
}

fn paint(text: String, kind: IssueKind) -> ColoredString {
    match kind {
        IssueKind::ExtraParam => text.red(),
        IssueKind::TypeMismatch | IssueKind::ReturnMismatch => text.yellow(),
        IssueKind::MissingParam | IssueKind::MissingReturn => text.blue(),
        IssueKind::ParamOrder => text.normal(),
    }
}

pub struct PrettyWriter<W: Write> {
    writer: W,
    base_path: Option<PathBuf>,
}

impl<W: Write> PrettyWriter<W> {
    pub fn new(writer: W, base_path: Option<PathBuf>) -> Self {
        Self { writer, base_path }
    }

    fn write_header(&mut self) -> anyhow::Result<()> {
        let title = "PHPDoc Parameter Validation Report";
        writeln!(self.writer, "{}", title.bold())?;
        writeln!(self.writer, "{}", "=".repeat(title.len()))?;
        writeln!(self.writer)?;
        Ok(())
    }

    fn write_summary(&mut self, report: &Report) -> anyhow::Result<()> {
        writeln!(self.writer, "{}", "Summary:".bold())?;
        writeln!(self.writer, "  Files scanned: {}", report.files_scanned())?;

        if report.has_issues() {
            writeln!(
                self.writer,
                "{}",
                format!("  Files with issues: {}", report.files_with_issues()).yellow()
            )?;
            writeln!(
                self.writer,
                "{}",
                format!("  Total issues: {}", report.total_issues()).red()
            )?;
            if report.parse_error_count() > 0 {
                writeln!(
                    self.writer,
                    "{}",
                    format!("  Parse errors: {}", report.parse_error_count()).yellow()
                )?;
            }
        } else {
            writeln!(self.writer, "{}", "  All files passed validation!".green())?;
        }

        Ok(())
    }
}

impl<W: Write> OutputWriter for PrettyWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        self.write_header()?;

        if report.is_clean() {
            writeln!(self.writer, "{}", "No issues found!".green())?;
            writeln!(self.writer)?;
            return self.write_summary(report);
        }

        for file_report in report.file_reports() {
            let path = display_path(&file_report.path, self.base_path.as_deref());

            if let Some(error) = &file_report.parse_error {
                writeln!(self.writer, "{}", path.yellow())?;
                writeln!(
                    self.writer,
                    "{}",
                    format!("   [!] Parse error: {error}").yellow()
                )?;
                writeln!(self.writer)?;
                continue;
            }

            for method in &file_report.methods {
                writeln!(
                    self.writer,
                    "{}",
                    format!("{path}:{}", method.line).cyan()
                )?;
                writeln!(self.writer, "   Method: {}()", method.full_name())?;

                for issue in &method.issues {
                    let line = format!("   {}  {}", issue_icon(issue.kind), issue.message);
                    writeln!(self.writer, "{}", paint(line, issue.kind))?;
                }

                writeln!(self.writer)?;
            }
        }

        self.write_summary(report)
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
    base_path: Option<PathBuf>,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W, base_path: Option<PathBuf>) -> Self {
        Self { writer, base_path }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        let files: Vec<_> = report
            .file_reports()
            .iter()
            .map(|file_report| {
                let methods: Vec<_> = file_report
                    .methods
                    .iter()
                    .map(|method| {
                        json!({
                            "name": method.full_name(),
                            "line": method.line,
                            "issues": method.issues,
                        })
                    })
                    .collect();

                json!({
                    "path": display_path(&file_report.path, self.base_path.as_deref()),
                    "parse_error": file_report.parse_error,
                    "methods": methods,
                })
            })
            .collect();

        let data = json!({
            "summary": {
                "files_scanned": report.files_scanned(),
                "files_with_issues": report.files_with_issues(),
                "total_issues": report.total_issues(),
                "parse_errors": report.parse_error_count(),
                "passed": report.is_clean(),
            },
            "files": files,
        });

        let json = serde_json::to_string_pretty(&data)?;
        writeln!(self.writer, "{json}")?;
        Ok(())
    }
}

pub struct GithubWriter<W: Write> {
    writer: W,
    base_path: Option<PathBuf>,
}

impl<W: Write> GithubWriter<W> {
    pub fn new(writer: W, base_path: Option<PathBuf>) -> Self {
        Self { writer, base_path }
    }
}

fn annotation_level(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::ExtraParam | IssueKind::TypeMismatch | IssueKind::ReturnMismatch => "error",
        IssueKind::MissingParam | IssueKind::MissingReturn => "warning",
        IssueKind::ParamOrder => "notice",
    }
}

fn annotation_title(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::ExtraParam => "Extra @param",
        IssueKind::TypeMismatch => "Type mismatch",
        IssueKind::ReturnMismatch => "Return type mismatch",
        IssueKind::MissingParam => "Missing @param",
        IssueKind::MissingReturn => "Missing @return",
        IssueKind::ParamOrder => "Parameter order",
    }
}

/// Escape the characters the workflow-command syntax reserves.
fn escape_annotation(text: &str) -> String {
    text.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl<W: Write> OutputWriter for GithubWriter<W> {
    fn write_report(&mut self, report: &Report) -> anyhow::Result<()> {
        for file_report in report.file_reports() {
            let path = display_path(&file_report.path, self.base_path.as_deref());

            if let Some(error) = &file_report.parse_error {
                writeln!(
                    self.writer,
                    "::warning file={path},line=1,title=Parse error::{}",
                    escape_annotation(error)
                )?;
                continue;
            }

            for method in &file_report.methods {
                for issue in &method.issues {
                    writeln!(
                        self.writer,
                        "::{} file={path},line={},title={}::{}",
                        annotation_level(issue.kind),
                        method.line,
                        annotation_title(issue.kind),
                        escape_annotation(&issue.message)
                    )?;
                }
            }
        }

        if report.has_issues() {
            writeln!(
                self.writer,
                "::error::PHPDoc validation failed: {} issue(s) in {} file(s)",
                report.total_issues(),
                report.files_with_issues()
            )?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FileReport, Issue, MethodIssues};

    fn sample_report() -> Report {
        let mut report = Report::new();
        let mut file_report = FileReport::new("/project/src/Widget.php");
        file_report.methods.push(MethodIssues {
            name: "render".to_string(),
            line: 14,
            class_name: Some("Widget".to_string()),
            issues: vec![
                Issue::new(
                    IssueKind::TypeMismatch,
                    "id",
                    "Type mismatch for $id: signature has 'int', doc has 'string'",
                )
                .with_types("int", "string"),
                Issue::new(
                    IssueKind::MissingParam,
                    "label",
                    "Missing @param documentation for $label",
                ),
            ],
        });
        report.add_file_report(file_report);
        report.add_file_report(FileReport::new("/project/src/Clean.php"));
        report
    }

    fn render(format: OutputFormat, report: &Report) -> String {
        colored::control::set_override(false);
        let mut buffer = Vec::new();
        {
            let mut writer = create_writer(Box::new(&mut buffer), format, Some("/project".into()));
            writer.write_report(report).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn pretty_output_lists_issues_and_summary() {
        let output = render(OutputFormat::Pretty, &sample_report());

        assert!(output.contains("src/Widget.php:14"));
        assert!(output.contains("Method: Widget::render()"));
        assert!(output.contains("[!]  Type mismatch for $id"));
        assert!(output.contains("[?]  Missing @param documentation for $label"));
        assert!(output.contains("Files scanned: 2"));
        assert!(output.contains("Total issues: 2"));
    }

    #[test]
    fn pretty_output_for_clean_report() {
        let mut report = Report::new();
        report.add_file_report(FileReport::new("/project/src/Clean.php"));

        let output = render(OutputFormat::Pretty, &report);
        assert!(output.contains("No issues found!"));
        assert!(output.contains("All files passed validation!"));
    }

    #[test]
    fn pretty_output_shows_parse_errors() {
        let mut report = Report::new();
        report.add_file_report(FileReport::with_parse_error(
            "/project/src/Broken.php",
            "Parse error near line 3",
        ));

        let output = render(OutputFormat::Pretty, &report);
        assert!(output.contains("[!] Parse error: Parse error near line 3"));
        assert!(output.contains("Parse errors: 1"));
    }

    #[test]
    fn json_output_has_summary_and_files() {
        let output = render(OutputFormat::Json, &sample_report());
        let data: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(data["summary"]["files_scanned"], 2);
        assert_eq!(data["summary"]["total_issues"], 2);
        assert_eq!(data["summary"]["passed"], false);
        assert_eq!(data["files"][0]["path"], "src/Widget.php");
        assert_eq!(data["files"][0]["methods"][0]["name"], "Widget::render");
        assert_eq!(
            data["files"][0]["methods"][0]["issues"][0]["kind"],
            "type_mismatch"
        );
    }

    #[test]
    fn github_output_emits_annotations() {
        let output = render(OutputFormat::Github, &sample_report());

        assert!(output.contains(
            "::error file=src/Widget.php,line=14,title=Type mismatch::Type mismatch for $id"
        ));
        assert!(output.contains("::warning file=src/Widget.php,line=14,title=Missing @param::"));
        assert!(output.contains("::error::PHPDoc validation failed: 2 issue(s) in 1 file(s)"));
    }

    #[test]
    fn github_annotations_escape_newlines() {
        assert_eq!(escape_annotation("a\nb%c"), "a%0Ab%25c");
    }
}
