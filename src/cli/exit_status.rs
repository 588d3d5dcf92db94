use std::process::ExitCode;

/// Exit status of a glean invocation.
///
/// - `Success` (0): the build finished without error-severity issues
/// - `Failure` (1): the build finished but reported errors (conflicts, invalid files, ...)
/// - `Error` (2): the build could not run (bad config, missing source root, ...)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    Error,
}

impl ExitStatus {
    /// Status for a finished command; warnings never fail a build.
    pub fn from_error_count(error_count: usize) -> Self {
        if error_count > 0 {
            ExitStatus::Failure
        } else {
            ExitStatus::Success
        }
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
