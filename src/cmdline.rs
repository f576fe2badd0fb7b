/// Wraps `input` in double quotes.
///
/// Always quotes so paths and arguments with spaces survive. Embedded `"` is
/// passed through untouched; callers rely on the exact text.
pub fn quoted(input: &str) -> String {
    format!("\"{input}\"")
}

/// `"<interpreter>" "<script>" "<arg>"...`, single-space separated.
pub fn build_command_line<S: AsRef<str>>(interpreter: &str, script: &str, args: &[S]) -> String {
    let mut command = quoted(interpreter);
    command.push(' ');
    command.push_str(&quoted(script));
    for arg in args {
        command.push(' ');
        command.push_str(&quoted(arg.as_ref()));
    }
    command
}
