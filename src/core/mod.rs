pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// The kinds of discrepancy the validator can detect.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    ExtraParam,
    TypeMismatch,
    MissingParam,
    ReturnMismatch,
    MissingReturn,
    ParamOrder,
}

impl IssueKind {
    pub fn is_param_issue(&self) -> bool {
        matches!(
            self,
            IssueKind::ExtraParam
                | IssueKind::TypeMismatch
                | IssueKind::MissingParam
                | IssueKind::ParamOrder
        )
    }

    pub fn is_return_issue(&self) -> bool {
        matches!(self, IssueKind::ReturnMismatch | IssueKind::MissingReturn)
    }

    pub fn is_mismatch(&self) -> bool {
        matches!(self, IssueKind::TypeMismatch | IssueKind::ReturnMismatch)
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, IssueKind::MissingParam | IssueKind::MissingReturn)
    }

    /// Whether the fixer knows how to rewrite this kind of issue.
    pub fn is_fixable(&self) -> bool {
        matches!(
            self,
            IssueKind::ParamOrder | IssueKind::MissingParam | IssueKind::MissingReturn
        )
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IssueKind::ExtraParam => "extra_param",
            IssueKind::TypeMismatch => "type_mismatch",
            IssueKind::MissingParam => "missing_param",
            IssueKind::ReturnMismatch => "return_mismatch",
            IssueKind::MissingReturn => "missing_return",
            IssueKind::ParamOrder => "param_order",
        };
        write!(f, "{name}")
    }
}

/// One detected discrepancy between a docblock and a signature.
///
/// `subject` is the parameter name, or the `@return` / `@params` sentinel
/// for return and ordering issues. For a [`IssueKind::ParamOrder`] issue the
/// expected/actual fields carry the two orderings as comma-joined names.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Issue {
    pub kind: IssueKind,
    pub subject: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_type: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
            expected_type: None,
            actual_type: None,
        }
    }

    pub fn with_types(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected_type = Some(expected.into());
        self.actual_type = Some(actual.into());
        self
    }
}

/// A function or method extracted from PHP source.
///
/// Types are carried as raw source text (`?Foo`, `A|B`) and `None` means
/// untyped. Parameters keep declaration order.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MethodInfo {
    pub name: String,
    /// 1-based source line of the declaration.
    pub line: usize,
    pub parameters: Vec<(String, Option<String>)>,
    pub return_type: Option<String>,
    pub doc_comment: Option<String>,
    /// Enclosing class, interface, or trait; `None` for free functions.
    pub class_name: Option<String>,
}

impl MethodInfo {
    pub fn full_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{class}::{}", self.name),
            None => self.name.clone(),
        }
    }

    pub fn has_doc_comment(&self) -> bool {
        self.doc_comment
            .as_deref()
            .is_some_and(|doc| !doc.trim().is_empty())
    }

    pub fn param_type(&self, name: &str) -> Option<&str> {
        self.parameters
            .iter()
            .find(|(param, _)| param == name)
            .and_then(|(_, ty)| ty.as_deref())
    }

    pub fn has_param(&self, name: &str) -> bool {
        self.parameters.iter().any(|(param, _)| param == name)
    }
}

/// Validation results for all methods of one file.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
    pub methods: Vec<MethodIssues>,
}

/// Issues attached to one method, keyed by its location and full name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodIssues {
    pub name: String,
    pub line: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub issues: Vec<Issue>,
}

impl MethodIssues {
    pub fn full_name(&self) -> String {
        match &self.class_name {
            Some(class) => format!("{class}::{}", self.name),
            None => self.name.clone(),
        }
    }
}

impl FileReport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            parse_error: None,
            methods: Vec::new(),
        }
    }

    pub fn with_parse_error(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            parse_error: Some(error.into()),
            methods: Vec::new(),
        }
    }

    /// Record a method's issues; methods without issues are not kept.
    pub fn add_method_issues(&mut self, method: &MethodInfo, issues: Vec<Issue>) {
        if issues.is_empty() {
            return;
        }

        self.methods.push(MethodIssues {
            name: method.name.clone(),
            line: method.line,
            class_name: method.class_name.clone(),
            issues,
        });
    }

    pub fn has_issues(&self) -> bool {
        !self.methods.is_empty() || self.parse_error.is_some()
    }

    pub fn has_parse_error(&self) -> bool {
        self.parse_error.is_some()
    }

    pub fn issue_count(&self) -> usize {
        self.methods.iter().map(|m| m.issues.len()).sum()
    }
}

/// Aggregated validation results across a whole run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Report {
    file_reports: Vec<FileReport>,
    files_scanned: usize,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the file as scanned; keep its report only if it found anything.
    pub fn add_file_report(&mut self, report: FileReport) {
        self.files_scanned += 1;

        if report.has_issues() {
            self.file_reports.push(report);
        }
    }

    pub fn file_reports(&self) -> &[FileReport] {
        &self.file_reports
    }

    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    pub fn files_with_issues(&self) -> usize {
        self.file_reports.len()
    }

    pub fn total_issues(&self) -> usize {
        self.file_reports.iter().map(FileReport::issue_count).sum()
    }

    pub fn parse_error_count(&self) -> usize {
        self.file_reports
            .iter()
            .filter(|r| r.has_parse_error())
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.file_reports.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_issues()
    }
}
