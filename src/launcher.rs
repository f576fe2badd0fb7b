use std::io::Write;

use crate::cmdline::build_command_line;
use crate::config::{self, LauncherConfig};
use crate::error::{LAUNCHER_FAILURE, LaunchError};
use crate::host::Host;
use crate::script::{companion_script_path, select_interpreter};

/// Everything resolved before the child is spawned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub exe_path: String,
    pub script_path: String,
    pub interpreter: String,
    pub command_line: String,
}

/// Runs the companion script of the current executable.
pub struct Launcher<H> {
    host: H,
}

impl<H: Host> Launcher<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    #[cfg(test)]
    fn host(&self) -> &H {
        &self.host
    }

    /// Resolves paths, interpreter and command line without spawning.
    pub fn plan<S: AsRef<str>>(&self, args: &[S]) -> Result<Plan, LaunchError> {
        let exe_path = self.host.current_exe()?;
        tracing::debug!(exe = %exe_path, "current module name");

        let cfg = config::load_beside(&exe_path)?;
        self.plan_with(exe_path, &cfg, args)
    }

    fn plan_with<S: AsRef<str>>(
        &self,
        exe_path: String,
        cfg: &LauncherConfig,
        args: &[S],
    ) -> Result<Plan, LaunchError> {
        let script_path = companion_script_path(&exe_path, &cfg.script_name)?;
        tracing::debug!(script = %script_path, "companion script");

        let first_line = self.host.first_line(&script_path);
        if first_line.is_none() {
            tracing::debug!(script = %script_path, "script not readable, using default interpreter");
        }
        let interpreter = select_interpreter(first_line.as_deref(), &cfg.default_interpreter, |p| {
            self.host.exists(p)
        });
        tracing::debug!(interpreter = %interpreter, "interpreter");

        let command_line = build_command_line(&interpreter, &script_path, args);
        Ok(Plan {
            exe_path,
            script_path,
            interpreter,
            command_line,
        })
    }

    /// Spawns the planned command and returns the child's exit code.
    pub fn launch<S: AsRef<str>>(&self, args: &[S]) -> Result<u32, LaunchError> {
        let plan = self.plan(args)?;
        tracing::debug!(command = %plan.command_line, "spawning");
        let exit_code = self.host.spawn_and_wait(&plan.command_line)?;
        tracing::debug!(exit_code, "process exit code");
        Ok(exit_code)
    }

    /// Single failure handler: the child's exit code on success, otherwise one
    /// line on `diag` and [`LAUNCHER_FAILURE`].
    pub fn run<S: AsRef<str>>(&self, args: &[S], diag: &mut impl Write) -> u32 {
        match self.launch(args) {
            Ok(code) => code,
            Err(e) => {
                tracing::debug!("launch failed: {}", e);
                // Forwarded arguments may carry line breaks.
                let cause = e.to_string().replace(['\r', '\n'], " ");
                let _ = writeln!(diag, "Failed to execute the Python script: {cause}");
                LAUNCHER_FAILURE
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::DEFAULT_INTERPRETER;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::fs;
    use std::path::Path;

    /// Fake OS: fixed module path, real filesystem reads, scripted spawn.
    struct FakeHost {
        exe: Option<String>,
        spawn: Box<dyn Fn(&str) -> Result<u32, LaunchError>>,
        spawned: RefCell<Vec<String>>,
    }

    impl FakeHost {
        fn new(exe: &str, exit_code: u32) -> Self {
            Self {
                exe: Some(exe.to_string()),
                spawn: Box::new(move |_| Ok(exit_code)),
                spawned: RefCell::new(Vec::new()),
            }
        }
    }

    impl Host for FakeHost {
        fn current_exe(&self) -> Result<String, LaunchError> {
            self.exe.clone().ok_or_else(|| LaunchError::PathResolution {
                reason: "truncated".into(),
            })
        }

        fn spawn_and_wait(&self, command_line: &str) -> Result<u32, LaunchError> {
            self.spawned.borrow_mut().push(command_line.to_string());
            (self.spawn)(command_line)
        }
    }

    fn exe_in(dir: &Path) -> String {
        dir.join("mover.exe").to_string_lossy().into_owned()
    }

    fn script_in(dir: &Path) -> String {
        dir.join("mover.py").to_string_lossy().into_owned()
    }

    const NO_ARGS: [&str; 0] = [];

    #[test]
    fn plan_without_shebang_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mover.py"), "print(1)\n").unwrap();
        let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), 0));

        let plan = launcher.plan(&NO_ARGS).unwrap();
        assert_eq!(plan.script_path, script_in(dir.path()));
        assert_eq!(plan.interpreter, DEFAULT_INTERPRETER);
        assert_eq!(
            plan.command_line,
            format!("\"python.exe\" \"{}\"", script_in(dir.path()))
        );
    }

    #[test]
    fn plan_honors_existing_shebang() {
        let dir = tempfile::tempdir().unwrap();
        let interp = dir.path().join("python.exe");
        fs::write(&interp, b"").unwrap();
        fs::write(
            dir.path().join("mover.py"),
            format!("#!  {}\t\nprint(1)\n", interp.display()),
        )
        .unwrap();
        let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), 0));

        let plan = launcher.plan(&NO_ARGS).unwrap();
        assert_eq!(plan.interpreter, interp.to_string_lossy());
    }

    #[test]
    fn plan_ignores_missing_shebang_target() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("mover.py"), "#!  /does/not/exist  \n").unwrap();
        let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), 0));

        assert_eq!(launcher.plan(&NO_ARGS).unwrap().interpreter, DEFAULT_INTERPRETER);
    }

    #[test]
    fn missing_script_still_launches_default() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), 0));

        assert_eq!(launcher.plan(&NO_ARGS).unwrap().interpreter, DEFAULT_INTERPRETER);
    }

    #[test]
    fn sidecar_overrides_script_and_default() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(config::CONFIG_FILE_NAME),
            r#"{ "script_name": "other.py", "default_interpreter": "py.exe" }"#,
        )
        .unwrap();
        let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), 0));

        let plan = launcher.plan(&NO_ARGS).unwrap();
        assert_eq!(
            plan.script_path,
            dir.path().join("other.py").to_string_lossy()
        );
        assert_eq!(plan.interpreter, "py.exe");
    }

    #[test]
    fn args_forwarded_quoted_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let host = FakeHost::new(&exe_in(dir.path()), 0);
        let launcher = Launcher::new(host);

        let mut diag = Vec::new();
        assert_eq!(launcher.run(&["a b", "c"], &mut diag), 0);
        assert!(diag.is_empty());
        assert_eq!(
            launcher.host().spawned.borrow().as_slice(),
            [format!(
                "\"python.exe\" \"{}\" \"a b\" \"c\"",
                script_in(dir.path())
            )]
        );
    }

    #[test]
    fn child_exit_code_is_relayed() {
        let dir = tempfile::tempdir().unwrap();
        for code in [0u32, 1, 42] {
            let launcher = Launcher::new(FakeHost::new(&exe_in(dir.path()), code));
            let mut diag = Vec::new();
            assert_eq!(launcher.run(&NO_ARGS, &mut diag), code);
            assert!(diag.is_empty());
        }
    }

    #[test]
    fn creation_failure_is_one_line_and_exit_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = FakeHost::new(&exe_in(dir.path()), 0);
        host.spawn = Box::new(|cmd| {
            Err(LaunchError::InterpreterNotFound {
                command: cmd.to_string(),
            })
        });
        let launcher = Launcher::new(host);

        let mut diag = Vec::new();
        assert_eq!(launcher.run(&NO_ARGS, &mut diag), LAUNCHER_FAILURE);
        let text = String::from_utf8(diag).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("cannot be found"), "{text}");
    }

    #[test]
    fn multiline_argument_keeps_diagnostic_on_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = FakeHost::new(&exe_in(dir.path()), 0);
        host.spawn = Box::new(|cmd| {
            Err(LaunchError::InterpreterNotFound {
                command: cmd.to_string(),
            })
        });
        let launcher = Launcher::new(host);

        let mut diag = Vec::new();
        assert_eq!(launcher.run(&["a\nb", "c\r\nd"], &mut diag), LAUNCHER_FAILURE);
        let text = String::from_utf8(diag).unwrap();
        assert_eq!(text.lines().count(), 1, "{text:?}");
        assert!(text.contains("\"a b\" \"c  d\""), "{text:?}");
        assert!(launcher.host().spawned.borrow()[0].contains("a\nb"));
    }

    #[test]
    fn other_creation_failure_reports_code() {
        let dir = tempfile::tempdir().unwrap();
        let mut host = FakeHost::new(&exe_in(dir.path()), 0);
        host.spawn = Box::new(|cmd| {
            Err(LaunchError::ProcessCreation {
                command: cmd.to_string(),
                code: 5,
            })
        });
        let launcher = Launcher::new(host);

        let mut diag = Vec::new();
        assert_eq!(launcher.run(&NO_ARGS, &mut diag), LAUNCHER_FAILURE);
        let text = String::from_utf8(diag).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.contains("error code: 5"), "{text}");
    }

    #[test]
    fn unresolved_exe_fails_before_spawn() {
        let mut host = FakeHost::new("unused", 0);
        host.exe = None;
        let launcher = Launcher::new(host);

        let mut diag = Vec::new();
        assert_eq!(launcher.run(&NO_ARGS, &mut diag), LAUNCHER_FAILURE);
        assert_eq!(String::from_utf8(diag).unwrap().lines().count(), 1);
        assert!(launcher.host().spawned.borrow().is_empty());
    }

    #[test]
    fn exe_without_separator_fails() {
        let launcher = Launcher::new(FakeHost::new("mover.exe", 0));

        let err = launcher.plan(&NO_ARGS).unwrap_err();
        assert!(matches!(err, LaunchError::PathParse { .. }));
        let mut diag = Vec::new();
        assert_eq!(launcher.run(&NO_ARGS, &mut diag), LAUNCHER_FAILURE);
        assert!(launcher.host().spawned.borrow().is_empty());
    }
}
