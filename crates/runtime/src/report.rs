//! Aggregated load-session diagnostics.

use pack_core::{PackLoadError, ValidationIssue};

/// One fatal diagnostic, with the pack it concerns when known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackDiagnostic {
    /// Absent when the failure is not attributable to a single pack
    /// (e.g. an unreadable packs directory).
    pub pack_id: Option<String>,
    pub error: PackLoadError,
}

/// Everything a load session wants to tell the caller: fatal errors and
/// non-fatal validation findings.
///
/// A session that returns a frozen registry may still carry warnings here;
/// a failed session carries every diagnostic gathered before the abort.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub errors: Vec<PackDiagnostic>,
    pub issues: Vec<ValidationIssue>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_error(&mut self, pack_id: Option<String>, error: PackLoadError) {
        tracing::error!(pack_id = pack_id.as_deref(), %error, "pack load error");
        self.errors.push(PackDiagnostic { pack_id, error });
    }

    pub fn push_issues(&mut self, issues: impl IntoIterator<Item = ValidationIssue>) {
        for issue in issues {
            if issue.is_fatal() {
                tracing::error!(
                    pack_id = %issue.pack_id,
                    message = %issue.message,
                    "manifest validation failed"
                );
            } else {
                tracing::warn!(
                    pack_id = %issue.pack_id,
                    message = %issue.message,
                    "manifest validation warning"
                );
            }
            self.issues.push(issue);
        }
    }

    /// True if any error or error-severity issue was recorded.
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty() || self.issues.iter().any(ValidationIssue::is_fatal)
    }

    /// Warnings only, for callers that surface them separately.
    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|issue| !issue.is_fatal())
    }
}
