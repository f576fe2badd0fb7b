use crate::error::LaunchError;

/// Marker that names an interpreter on the first line of a script.
pub const SHEBANG: &str = "#!";

/// Companion script expected beside the launcher.
pub const DEFAULT_SCRIPT_NAME: &str = "mover.py";

/// Interpreter used when the script does not name an existing one.
/// Resolved through the regular executable search of `CreateProcessW`.
pub const DEFAULT_INTERPRETER: &str = "python.exe";

/// Directory portion of `path` plus the separator that ended it.
///
/// Accepts both `\` and `/`. A path without any separator is an error rather
/// than an implicit current directory.
pub fn split_dir(path: &str) -> Result<(&str, char), LaunchError> {
    match path.rfind(['\\', '/']) {
        Some(pos) => {
            let sep = if path.as_bytes()[pos] == b'/' { '/' } else { '\\' };
            Ok((&path[..pos], sep))
        }
        None => Err(LaunchError::PathParse {
            path: path.to_string(),
        }),
    }
}

/// `<dir of exe_path><sep><script_name>`.
pub fn companion_script_path(exe_path: &str, script_name: &str) -> Result<String, LaunchError> {
    let (dir, sep) = split_dir(exe_path)?;
    Ok(format!("{dir}{sep}{script_name}"))
}

/// Interpreter candidate named by a `#!` line, marker removed and spaces/tabs
/// trimmed. `None` when the line has no marker or nothing follows it.
pub fn shebang_candidate(first_line: &str) -> Option<&str> {
    let rest = first_line.strip_prefix(SHEBANG)?;
    let candidate = rest.trim_matches([' ', '\t']);
    (!candidate.is_empty()).then_some(candidate)
}

/// Picks the interpreter for a script.
///
/// `first_line` is `None` when the script could not be read. The candidate is
/// only honored when `exists` confirms it is on disk.
pub fn select_interpreter(
    first_line: Option<&str>,
    default_interpreter: &str,
    exists: impl Fn(&str) -> bool,
) -> String {
    match first_line.and_then(shebang_candidate) {
        Some(candidate) if exists(candidate) => candidate.to_string(),
        _ => default_interpreter.to_string(),
    }
}
