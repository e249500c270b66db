use serde::Serialize;

/// What one reconciliation run did. Only keys are recorded, never values, so
/// the report can be printed without leaking client secrets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// `wtmp.ignoreSChannel` was missing and is present after writing the default.
    pub bootstrapped: bool,
    /// `http.sslBackend` was left alone because of the operator opt-out.
    pub ssl_backend_skipped: bool,
    /// Keys written successfully, in write order.
    pub applied: Vec<String>,
    /// Keys whose write exited non-zero.
    pub failed: Vec<String>,
    /// URLs of hosted servers skipped because of their per-host opt-out.
    pub skipped_hosts: Vec<String>,
}

impl ReconcileReport {
    /// True when the run did not need to change anything.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty() && self.failed.is_empty()
    }
}

pub fn format_report_json(report: &ReconcileReport, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(report)
    } else {
        serde_json::to_string(report)
    }
}
