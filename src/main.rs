#[cfg(not(windows))]
compile_error!("mover is Windows-only. Build it on Windows.");

// Windows-only implementation lives in src/windows_main.rs
#[cfg(windows)]
mod windows_main;

#[cfg(windows)]
fn main() {
    std::process::exit(windows_main::main() as i32);
}
