//! Per-target pipeline: write auxiliary files, sort invocations by data
//! dependency, then run the product-structure pass and the content pass.

use crate::aux_files::write_auxiliary_files;
use crate::builtin::BuiltinRegistry;
use crate::formatter::{print_event, Formatter};
use crate::fs_ops::Filesystem;
use crate::model::{Invocation, Phase, Target};
use crate::runner::run_invocations;
use crate::sorter::sort_invocations;
use crate::subprocess::SubprocessRunner;

/// Builds a single target. Returns `(true, [])` on success, or `(false,
/// failing_invocations)` - the latter empty unless the failure happened
/// during invocation execution (as opposed to auxiliary-file writing or
/// invocation-graph sorting, which carry no specific failing invocation).
#[allow(clippy::too_many_arguments)]
pub fn build_target(
    target: &Target,
    invocations: Vec<Invocation>,
    fs: &dyn Filesystem,
    registry: &dyn BuiltinRegistry,
    subprocess: &dyn SubprocessRunner,
    formatter: &mut dyn Formatter,
    dry_run: bool,
) -> (bool, Vec<Invocation>) {
    if !write_auxiliary_files(target, &invocations, fs, formatter, dry_run) {
        return (false, Vec::new());
    }

    let (sorted_ok, invocations) = sort_invocations(invocations);
    if !sorted_ok {
        log::error!("cycle detected building invocation graph for target `{}`", target.name());
        return (false, Vec::new());
    }

    print_event(formatter.begin_create_product_structure(target));
    let (structure_ok, failing) = run_invocations(
        &invocations,
        Phase::CreateProductStructure,
        fs,
        registry,
        subprocess,
        formatter,
        dry_run,
    );
    print_event(formatter.finish_create_product_structure(target));
    if !structure_ok {
        return (false, failing);
    }

    run_invocations(&invocations, Phase::Content, fs, registry, subprocess, formatter, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::MapBuiltinRegistry;
    use crate::fs_ops::RealFilesystem;
    use crate::model::InvocationBuilder;
    use crate::recording::RecordingFormatter;

    #[test]
    fn runs_structure_pass_before_content_pass() {
        let structure = InvocationBuilder::phony().creates_product_structure(true).build();
        let content = InvocationBuilder::phony().creates_product_structure(false).build();

        let target = Target::new("t", "t");
        let registry = MapBuiltinRegistry::new();
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, _) = build_target(
            &target,
            vec![content, structure],
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            true,
        );
        assert!(ok);
        // Phony invocations never emit begin/finishInvocation; only the
        // bracketing structure-pass events should appear here.
        assert_eq!(
            formatter.events(),
            &[
                "beginWriteAuxiliaryFiles".to_owned(),
                "finishWriteAuxiliaryFiles".to_owned(),
                "beginCreateProductStructure".to_owned(),
                "finishCreateProductStructure".to_owned(),
            ]
        );
    }

    #[test]
    fn invocation_cycle_fails_target_before_any_invocation_runs() {
        let a = InvocationBuilder::builtin("a").inputs(["/y"]).outputs(["/x"]).build();
        let b = InvocationBuilder::builtin("b").inputs(["/x"]).outputs(["/y"]).build();

        let target = Target::new("t", "t");
        let registry = MapBuiltinRegistry::new();
        let fs = RealFilesystem;
        let subprocess = crate::subprocess::RealSubprocessRunner;
        let mut formatter = RecordingFormatter::new();

        let (ok, failing) = build_target(
            &target,
            vec![a, b],
            &fs,
            &registry,
            &subprocess,
            &mut formatter,
            true,
        );
        assert!(!ok);
        assert!(failing.is_empty());
        assert!(!formatter.events().iter().any(|e| e.starts_with("beginInvocation")));
    }
}
