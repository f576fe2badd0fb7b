#![cfg(windows)]

use mover_launcher::Launcher;
use mover_launcher::config;
use mover_launcher::host::Host;
use mover_launcher::logging;
use mover_launcher::win32::WindowsHost;

/// Runs the companion script and returns the exit code for this process.
pub fn main() -> u32 {
    let host = WindowsHost;
    let log_to_file = host
        .current_exe()
        .and_then(|exe| config::load_beside(&exe))
        .map(|cfg| cfg.log_to_file)
        .unwrap_or(false);
    let _guard = logging::init(log_to_file);

    let args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    tracing::debug!(?args, "argv");

    Launcher::new(host).run(&args, &mut std::io::stderr())
}
