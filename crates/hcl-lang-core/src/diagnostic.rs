//! Validation diagnostics.

use hcl_lang_pos::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    pub subject_range: Range,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            subject_range: range,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            subject_range: range,
        }
    }
}
