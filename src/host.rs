use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::LaunchError;

/// Operating-system services the launcher needs.
pub trait Host {
    /// Full path of the running launcher executable.
    fn current_exe(&self) -> Result<String, LaunchError>;

    /// Runs `command_line` as a child process, blocks until it exits and
    /// returns its exit code.
    fn spawn_and_wait(&self, command_line: &str) -> Result<u32, LaunchError>;

    fn exists(&self, path: &str) -> bool {
        Path::new(path).exists()
    }

    /// First line of the file at `path`, without its line terminator.
    /// `None` when the file cannot be opened or read as UTF-8.
    fn first_line(&self, path: &str) -> Option<String> {
        read_first_line(path)
    }
}

pub fn read_first_line(path: &str) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut raw = Vec::new();
    BufReader::new(file).read_until(b'\n', &mut raw).ok()?;
    if raw.last() == Some(&b'\n') {
        raw.pop();
    }
    if raw.last() == Some(&b'\r') {
        raw.pop();
    }
    String::from_utf8(raw).ok()
}
