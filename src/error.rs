use thiserror::Error;

/// Everything that stops the launcher from handing off to the script.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// The OS could not report the running executable's path, or truncated it.
    #[error("could not resolve the launcher path: {reason}")]
    PathResolution { reason: String },
    #[error("no directory separator in [{path}]")]
    PathParse { path: String },
    #[error("Python executable in [{command}] cannot be found")]
    InterpreterNotFound { command: String },
    #[error("CreateProcess for [{command}] failed with error code: {code}")]
    ProcessCreation { command: String, code: u32 },
    /// Waiting on the child or reading its exit code failed.
    #[error("could not collect the child exit code (error code: {code})")]
    Wait { code: u32 },
}

/// Exit status reserved for failures of the launcher itself.
pub const LAUNCHER_FAILURE: u32 = 1;
