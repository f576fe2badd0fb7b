use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::LaunchError;
use crate::script::{DEFAULT_INTERPRETER, DEFAULT_SCRIPT_NAME, split_dir};

/// Optional sidecar read from the launcher's directory.
pub const CONFIG_FILE_NAME: &str = "mover.launcher.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Companion script file name, relative to the launcher directory.
    pub script_name: String,
    /// Interpreter used when the script has no usable `#!` line.
    pub default_interpreter: String,
    /// Send `MOVER_LOG` output to a rolling file instead of stderr.
    pub log_to_file: bool,
}

#[derive(Debug, Clone)]
pub struct Paths {
    pub log_dir: PathBuf,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            script_name: DEFAULT_SCRIPT_NAME.into(),
            default_interpreter: DEFAULT_INTERPRETER.into(),
            log_to_file: false,
        }
    }
}

pub fn project_paths() -> Result<Paths> {
    let dirs = ProjectDirs::from("org", "ros", "MoverLauncher")
        .context("Failed to determine project directories")?;
    Ok(Paths {
        log_dir: dirs.data_local_dir().join("logs"),
    })
}

pub fn sidecar_path(dir: &str, sep: char) -> String {
    format!("{dir}{sep}{CONFIG_FILE_NAME}")
}

/// Config for the launcher at `exe_path`, read from the sidecar beside it.
pub fn load_beside(exe_path: &str) -> Result<LauncherConfig, LaunchError> {
    let (dir, sep) = split_dir(exe_path)?;
    Ok(load_or_default(&sidecar_path(dir, sep)))
}

pub fn parse(s: &str) -> Result<LauncherConfig> {
    let cfg: LauncherConfig = serde_json::from_str(s).context("parse launcher config")?;
    Ok(cfg)
}

/// Reads the sidecar at `path`. A missing file yields the defaults; so does a
/// file that fails to parse, after a warning.
pub fn load_or_default(path: &str) -> LauncherConfig {
    let s = match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return LauncherConfig::default(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}, using defaults", path, e);
            return LauncherConfig::default();
        }
    };
    match parse(&s) {
        Ok(mut cfg) => {
            if cfg.script_name.trim().is_empty() {
                tracing::warn!("Empty script_name in {}, using {}", path, DEFAULT_SCRIPT_NAME);
                cfg.script_name = DEFAULT_SCRIPT_NAME.into();
            }
            if cfg.default_interpreter.trim().is_empty() {
                cfg.default_interpreter = DEFAULT_INTERPRETER.into();
            }
            cfg
        }
        Err(e) => {
            tracing::warn!("Failed to parse config JSON: {:#}, using defaults", e);
            LauncherConfig::default()
        }
    }
}
