//! Dispatches each invocation either to an in-process built-in driver or to
//! an external subprocess, preparing output directories first.

use crate::builtin::BuiltinRegistry;
use crate::formatter::{print_event, Formatter};
use crate::fs_ops::{self, Filesystem};
use crate::model::{Invocation, Phase, Work};
use crate::subprocess::SubprocessRunner;

/// Runs every invocation in `invocations` that belongs to `phase`, in order.
///
/// Returns `(true, [])` if every invocation in the phase ran (or was
/// skipped) successfully, or `(false, [failing])` on the first failure,
/// which aborts the remaining invocations in this phase and the target's
/// other phase.
#[allow(clippy::too_many_arguments)]
pub fn run_invocations(
    invocations: &[Invocation],
    phase: Phase,
    fs: &dyn Filesystem,
    registry: &dyn BuiltinRegistry,
    subprocess: &dyn SubprocessRunner,
    formatter: &mut dyn Formatter,
    dry_run: bool,
) -> (bool, Vec<Invocation>) {
    for invocation in invocations {
        if invocation.is_phony() || !invocation.runs_in(phase) {
            continue;
        }

        let display_name = invocation.work.display_name().to_owned();
        let environment = invocation.sorted_environment();
        print_event(formatter.begin_invocation(invocation, &display_name, phase, &environment));

        let succeeded = run_one(invocation, fs, registry, subprocess, dry_run);

        print_event(formatter.finish_invocation(invocation, &display_name, phase));

        if !succeeded {
            return (false, vec![invocation.clone()]);
        }
    }

    (true, Vec::new())
}

fn run_one(
    invocation: &Invocation,
    fs: &dyn Filesystem,
    registry: &dyn BuiltinRegistry,
    subprocess: &dyn SubprocessRunner,
    dry_run: bool,
) -> bool {
    if !dry_run {
        for output in &invocation.outputs {
            if let Err(err) = fs_ops::ensure_parent_directory(fs, output, dry_run, None) {
                log::error!("couldn't create output directory for {}: {}", output.display(), err);
                return false;
            }
        }
    }

    if dry_run {
        return true;
    }

    match &invocation.work {
        Work::Builtin { name } => match registry.driver(name) {
            Some(driver) => {
                let code =
                    driver.run(&invocation.arguments, &invocation.environment, &invocation.working_directory);
                if code != 0 {
                    log::error!("built-in tool `{}` exited with code {}", name, code);
                }
                code == 0
            }
            None => {
                log::error!("unknown built-in tool `{}`", name);
                false
            }
        },
        Work::External { path, .. } => subprocess.execute(
            path,
            &invocation.arguments,
            &invocation.environment,
            &invocation.working_directory,
        ),
        Work::Phony => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::{BuiltinDriver, MapBuiltinRegistry};
    use crate::fs_ops::RealFilesystem;
    use crate::model::InvocationBuilder;
    use crate::recording::RecordingFormatter;
    use std::collections::BTreeMap;
    use std::path::Path;

    struct AlwaysFails;
    impl BuiltinDriver for AlwaysFails {
        fn run(&self, _arguments: &[String], _environment: &BTreeMap<String, String>, _cwd: &Path) -> i32 {
            1
        }
    }

    struct AlwaysSucceeds;
    impl BuiltinDriver for AlwaysSucceeds {
        fn run(&self, _arguments: &[String], _environment: &BTreeMap<String, String>, _cwd: &Path) -> i32 {
            0
        }
    }

    #[test]
    fn phony_invocations_are_skipped_without_events() {
        let invocation = InvocationBuilder::phony().build();
        let registry = MapBuiltinRegistry::new();
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, failing) = run_invocations(
            &[invocation],
            Phase::Content,
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            false,
        );
        assert!(ok);
        assert!(failing.is_empty());
        assert!(formatter.events().is_empty());
    }

    #[test]
    fn invocations_in_the_wrong_phase_are_skipped() {
        let invocation = InvocationBuilder::builtin("noop").creates_product_structure(true).build();
        let registry = MapBuiltinRegistry::new().register("noop", Box::new(AlwaysSucceeds));
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, _) = run_invocations(
            &[invocation],
            Phase::Content,
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            false,
        );
        assert!(ok);
        assert!(formatter.events().is_empty());
    }

    #[test]
    fn unknown_builtin_fails_the_invocation() {
        let invocation = InvocationBuilder::builtin("does-not-exist").build();
        let registry = MapBuiltinRegistry::new();
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, failing) = run_invocations(
            &[invocation],
            Phase::Content,
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            false,
        );
        assert!(!ok);
        assert_eq!(failing.len(), 1);
        assert_eq!(
            formatter.events(),
            &["beginInvocation(does-not-exist)".to_owned(), "finishInvocation(does-not-exist)".to_owned()]
        );
    }

    #[test]
    fn failure_short_circuits_remaining_invocations() {
        let failing_invocation = InvocationBuilder::builtin("fails").build();
        let never_run = InvocationBuilder::builtin("succeeds").build();
        let registry = MapBuiltinRegistry::new()
            .register("fails", Box::new(AlwaysFails))
            .register("succeeds", Box::new(AlwaysSucceeds));
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, failing) = run_invocations(
            &[failing_invocation, never_run],
            Phase::Content,
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            false,
        );
        assert!(!ok);
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].work.display_name(), "fails");
        assert_eq!(formatter.events().len(), 2);
    }

    #[test]
    fn dry_run_skips_dispatch_but_still_emits_begin_and_finish() {
        let invocation = InvocationBuilder::builtin("fails").build();
        let registry = MapBuiltinRegistry::new().register("fails", Box::new(AlwaysFails));
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, failing) = run_invocations(
            &[invocation],
            Phase::Content,
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            true,
        );
        assert!(ok);
        assert!(failing.is_empty());
        assert_eq!(formatter.events().len(), 2);
    }
}
