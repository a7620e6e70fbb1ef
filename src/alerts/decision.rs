//! Aggregate evaluation result

use serde::Serialize;

/// Overall check status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    /// Evaluation could not be performed at all
    Unknown,
}

impl Status {
    /// Nagios/Sensu plugin exit code
    pub fn exit_code(&self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Upper-case status label
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable verdict over every series of one evaluation run.
///
/// `warning_count` counts series at or above warning, so it includes every
/// critical series once. Downstream node thresholds rely on this tally.
/// `warning_messages` only lists series that stopped at warning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    status: Status,
    critical_count: usize,
    warning_count: usize,
    ok_count: usize,
    critical_messages: Vec<String>,
    warning_messages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unknown_reason: Option<String>,
}

impl Decision {
    pub(crate) fn new(
        status: Status,
        critical_count: usize,
        warning_count: usize,
        ok_count: usize,
        critical_messages: Vec<String>,
        warning_messages: Vec<String>,
    ) -> Self {
        Self {
            status,
            critical_count,
            warning_count,
            ok_count,
            critical_messages,
            warning_messages,
            unknown_reason: None,
        }
    }

    /// Decision for a run where nothing could be evaluated
    pub fn unknown(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Unknown,
            critical_count: 0,
            warning_count: 0,
            ok_count: 0,
            critical_messages: Vec::new(),
            warning_messages: Vec::new(),
            unknown_reason: Some(reason.into()),
        }
    }

    /// Overall status
    pub fn status(&self) -> Status {
        self.status
    }

    /// Series breaching the critical bound
    pub fn critical_count(&self) -> usize {
        self.critical_count
    }

    /// Series breaching at or above warning
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    /// Series breaching neither bound
    pub fn ok_count(&self) -> usize {
        self.ok_count
    }

    /// Critical breach messages in evaluation order
    pub fn critical_messages(&self) -> &[String] {
        &self.critical_messages
    }

    /// Warning-only breach messages in evaluation order
    pub fn warning_messages(&self) -> &[String] {
        &self.warning_messages
    }

    /// Why nothing could be evaluated, for `Unknown` decisions
    pub fn unknown_reason(&self) -> Option<&str> {
        self.unknown_reason.as_deref()
    }

    /// Node tally line: "critical: C, warning: W, ok: K"
    ///
    /// The warning figure excludes the critical series included in
    /// `warning_count`.
    pub fn summary(&self) -> String {
        format!(
            "critical: {}, warning: {}, ok: {}",
            self.critical_count,
            self.warning_count - self.critical_count,
            self.ok_count
        )
    }
}
