pub mod cmdline;
pub mod config;
pub mod error;
pub mod host;
pub mod launcher;
pub mod logging;
pub mod script;
pub mod utils;
#[cfg(windows)]
pub mod win32;

pub use error::LaunchError;
pub use launcher::{Launcher, Plan};
