use crate::error::{Error, Result};

/// Absolute path avoids PATH-search hijacking when running elevated.
pub const POWERSHELL_EXE: &str = r"C:\Windows\System32\WindowsPowerShell\v1.0\powershell.exe";

/// Runs an external program and returns its trimmed stdout.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).run(program, args)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        tracing::debug!(program, ?args, "running command");
        let output = std::process::Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::Command {
                program: program.to_string(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command {
                program: program.to_string(),
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Runs PowerShell scripts through a [`CommandRunner`].
pub struct PowerShell<R> {
    runner: R,
}

impl<R: CommandRunner> PowerShell<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn script(&self, script: &str) -> Result<String> {
        self.runner.run(
            POWERSHELL_EXE,
            &[
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
                script,
            ],
        )
    }
}

/// Quote a value as a PowerShell single-quoted string literal.
pub fn ps_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ps_quote_escapes_single_quotes() {
        assert_eq!(ps_quote("Wake On LAN"), "'Wake On LAN'");
        assert_eq!(ps_quote("it's"), "'it''s'");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_stdout() {
        let out = SystemRunner.run("sh", &["-c", "echo '  LanOnly  '"]).unwrap();
        assert_eq!(out, "LanOnly");
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_reports_failure() {
        let err = SystemRunner.run("sh", &["-c", "echo nope >&2; exit 3"]).unwrap_err();
        match err {
            Error::Command { program, detail } => {
                assert_eq!(program, "sh");
                assert!(detail.contains("nope"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
