//! Top-level entry point: orders targets, runs each through the target
//! builder, and streams start/finish/success/failure events to the
//! formatter.

use crate::builtin::BuiltinRegistry;
use crate::formatter::{print_event, BuildContext, Formatter};
use crate::fs_ops::{Filesystem, RealFilesystem};
use crate::model::Invocation;
use crate::source::TargetEnvironmentSource;
use crate::subprocess::{RealSubprocessRunner, SubprocessRunner};
use crate::target_builder::build_target;
use crate::target_graph::TargetGraph;

/// Owns the three long-lived collaborators a build needs: the formatter, the
/// built-in registry, and the dry-run flag. Everything else (the filesystem
/// and subprocess runner) defaults to the real implementation but can be
/// swapped for tests via [`Executor::with_collaborators`].
pub struct Executor<'a> {
    formatter: &'a mut dyn Formatter,
    registry: &'a dyn BuiltinRegistry,
    dry_run: bool,
    fs: Box<dyn Filesystem + 'a>,
    subprocess: Box<dyn SubprocessRunner + 'a>,
}

impl<'a> Executor<'a> {
    pub fn new(
        formatter: &'a mut dyn Formatter,
        registry: &'a dyn BuiltinRegistry,
        dry_run: bool,
    ) -> Self {
        Executor {
            formatter,
            registry,
            dry_run,
            fs: Box::new(RealFilesystem),
            subprocess: Box::new(RealSubprocessRunner),
        }
    }

    /// Overrides the filesystem and subprocess collaborators, for tests that
    /// need to observe or fake process execution without a real one.
    pub fn with_collaborators(
        formatter: &'a mut dyn Formatter,
        registry: &'a dyn BuiltinRegistry,
        dry_run: bool,
        fs: Box<dyn Filesystem + 'a>,
        subprocess: Box<dyn SubprocessRunner + 'a>,
    ) -> Self {
        Executor { formatter, registry, dry_run, fs, subprocess }
    }

    /// Runs every target in `targets` in dependency order, deriving each
    /// target's invocations through `source`. Returns `true` iff every
    /// target built successfully.
    pub fn build<S: TargetEnvironmentSource>(
        &mut self,
        context: &dyn BuildContext,
        targets: &TargetGraph,
        source: &S,
    ) -> bool {
        print_event(self.formatter.begin(context));

        let (ok, ordered_targets) = targets.ordered();
        if !ok {
            log::error!("cycle detected in target dependencies");
            return false;
        }

        for target in &ordered_targets {
            print_event(self.formatter.begin_target(context, target));

            let environment = match source.target_environment(target) {
                Some(environment) => environment,
                None => {
                    log::error!("couldn't create target environment for {}", target.name());
                    print_event(self.formatter.finish_target(context, target));
                    continue;
                }
            };

            print_event(self.formatter.begin_check_dependencies(target));
            let invocations: Vec<Invocation> = source.invocations(target, &environment);
            print_event(self.formatter.finish_check_dependencies(target));

            let (built, failing_invocations) = build_target(
                target,
                invocations,
                self.fs.as_ref(),
                self.registry,
                self.subprocess.as_ref(),
                &mut *self.formatter,
                self.dry_run,
            );

            print_event(self.formatter.finish_target(context, target));

            if !built {
                print_event(self.formatter.failure(context, &failing_invocations));
                return false;
            }
        }

        print_event(self.formatter.success(context));
        true
    }
}
