//! External process dispatch: runs an invocation's executable as a
//! subprocess and reports whether it succeeded.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

/// Runs an external command to completion. `false` (either a spawn error or
/// a non-zero exit code) indicates failure; the core treats both identically
/// per spec, it does not distinguish "couldn't start" from "ran and failed".
pub trait SubprocessRunner {
    fn execute(
        &self,
        path: &Path,
        arguments: &[String],
        environment: &BTreeMap<String, String>,
        working_directory: &Path,
    ) -> bool;
}

/// Runs the subprocess with `std::process::Command`, inheriting stdio so
/// output reaches the user directly (the formatter only ever sees begin/end
/// markers, never the invocation's own output).
#[derive(Debug, Default, Clone, Copy)]
pub struct RealSubprocessRunner;

impl SubprocessRunner for RealSubprocessRunner {
    fn execute(
        &self,
        path: &Path,
        arguments: &[String],
        environment: &BTreeMap<String, String>,
        working_directory: &Path,
    ) -> bool {
        let mut command = Command::new(path);
        command.args(arguments).current_dir(working_directory).env_clear().envs(environment);

        match command.status() {
            Ok(status) => status.success(),
            Err(err) => {
                log::error!("couldn't spawn {}: {}", path.display(), err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successful_process_reports_success() {
        let runner = RealSubprocessRunner;
        let ok = runner.execute(
            Path::new("/usr/bin/true"),
            &[],
            &BTreeMap::new(),
            &std::env::temp_dir(),
        );
        assert!(ok);
    }

    #[test]
    fn failing_process_reports_failure() {
        let runner = RealSubprocessRunner;
        let ok = runner.execute(
            Path::new("/usr/bin/false"),
            &[],
            &BTreeMap::new(),
            &std::env::temp_dir(),
        );
        assert!(!ok);
    }

    #[test]
    fn missing_executable_reports_failure() {
        let runner = RealSubprocessRunner;
        let ok = runner.execute(
            Path::new("/no/such/executable-xcbuild-exec-test"),
            &[],
            &BTreeMap::new(),
            &std::env::temp_dir(),
        );
        assert!(!ok);
    }
}
