//! Materialises every invocation's declared auxiliary files: binary-exact
//! contents, directory creation, and an optional executable bit.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::formatter::{print_event, Formatter};
use crate::fs_ops::{self, Filesystem};
use crate::model::{Invocation, Target};

/// Writes every auxiliary file of every invocation in `invocations`, in
/// order, bracketed by `beginWriteAuxiliaryFiles` / `finishWriteAuxiliaryFiles`
/// formatter events.
///
/// Returns `false` on the first I/O error, which fails the enclosing target
/// immediately; unlike invocation failures this carries no specific failing
/// invocation (per spec §7, error kind 4).
///
/// Dry-run performs no real I/O, so whether a directory "still needs
/// creating" or a file "is already executable" is tracked in `simulated_dirs`
/// / `simulated_executable` across the whole pass instead of being asked of
/// the real filesystem: two auxiliary files sharing a not-yet-existent
/// parent, or the same path written twice, must reproduce exactly the event
/// sequence a real run would produce (spec.md §3 invariant 5, §8 universal
/// property 3), and a real run only creates that parent / sets that bit
/// once.
pub fn write_auxiliary_files(
    target: &Target,
    invocations: &[Invocation],
    fs: &dyn Filesystem,
    formatter: &mut dyn Formatter,
    dry_run: bool,
) -> bool {
    print_event(formatter.begin_write_auxiliary_files(target));

    let mut simulated_dirs: HashSet<PathBuf> = HashSet::new();
    let mut simulated_executable: HashSet<PathBuf> = HashSet::new();

    for invocation in invocations {
        for aux in &invocation.auxiliary_files {
            match fs_ops::ensure_parent_directory(fs, &aux.path, dry_run, Some(&mut simulated_dirs))
            {
                Ok(true) => {
                    let parent = aux.path.parent().unwrap();
                    print_event(formatter.create_auxiliary_directory(parent));
                }
                Ok(false) => {}
                Err(err) => {
                    log::error!("couldn't create directory for {}: {}", aux.path.display(), err);
                    return false;
                }
            }

            print_event(formatter.write_auxiliary_file(&aux.path));
            if !dry_run {
                if let Err(err) = fs.write_file(&aux.path, &aux.contents) {
                    log::error!("couldn't write {}: {}", aux.path.display(), err);
                    return false;
                }
            }

            let already_executable = if dry_run {
                simulated_executable.contains(&aux.path)
            } else {
                fs.is_executable(&aux.path)
            };

            if aux.executable && !already_executable {
                print_event(formatter.set_auxiliary_executable(&aux.path));
                if dry_run {
                    simulated_executable.insert(aux.path.clone());
                } else if let Err(err) = fs.set_executable(&aux.path) {
                    log::error!("couldn't set executable bit on {}: {}", aux.path.display(), err);
                    return false;
                }
            }
        }
    }

    print_event(formatter.finish_write_auxiliary_files(target));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs_ops::RealFilesystem;
    use crate::model::{AuxiliaryFile, InvocationBuilder};
    use crate::recording::RecordingFormatter;

    #[test]
    fn writes_contents_byte_exact_and_sets_executable_bit() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("aux/script.sh");
        let contents = b"#!/bin/sh\necho hi\n".to_vec();

        let invocation = InvocationBuilder::phony()
            .auxiliary_file(AuxiliaryFile::new(&script_path, contents.clone(), true))
            .build();

        let target = Target::new("t1", "t1");
        let fs = RealFilesystem;
        let mut formatter = RecordingFormatter::new();

        let ok =
            write_auxiliary_files(&target, &[invocation], &fs, &mut formatter, false);
        assert!(ok);
        assert_eq!(std::fs::read(&script_path).unwrap(), contents);
        assert!(fs.is_executable(&script_path));

        assert_eq!(
            formatter.events(),
            &[
                "beginWriteAuxiliaryFiles".to_owned(),
                "createAuxiliaryDirectory".to_owned(),
                "writeAuxiliaryFile".to_owned(),
                "setAuxiliaryExecutable".to_owned(),
                "finishWriteAuxiliaryFiles".to_owned(),
            ]
        );
    }

    #[test]
    fn dry_run_performs_no_io_but_emits_events() {
        let dir = tempfile::tempdir().unwrap();
        let script_path = dir.path().join("aux/script.sh");

        let invocation = InvocationBuilder::phony()
            .auxiliary_file(AuxiliaryFile::new(&script_path, b"data".to_vec(), true))
            .build();

        let target = Target::new("t1", "t1");
        let fs = RealFilesystem;
        let mut formatter = RecordingFormatter::new();

        let ok = write_auxiliary_files(&target, &[invocation], &fs, &mut formatter, true);
        assert!(ok);
        assert!(!script_path.exists());
        assert_eq!(formatter.events().len(), 5);
    }

    #[test]
    fn dry_run_event_sequence_matches_a_real_run_for_a_shared_directory_and_repeated_path() {
        let dir = tempfile::tempdir().unwrap();
        let a_path = dir.path().join("aux/a.sh");
        let b_path = dir.path().join("aux/b.sh");

        let invocations = |path_a: &std::path::Path, path_b: &std::path::Path| {
            vec![
                InvocationBuilder::phony()
                    .auxiliary_file(AuxiliaryFile::new(path_a, b"one".to_vec(), true))
                    .build(),
                InvocationBuilder::phony()
                    .auxiliary_file(AuxiliaryFile::new(path_b, b"two".to_vec(), true))
                    .build(),
                // Writing `path_a` again: a real run finds it already executable
                // and emits no second `setAuxiliaryExecutable`.
                InvocationBuilder::phony()
                    .auxiliary_file(AuxiliaryFile::new(path_a, b"three".to_vec(), true))
                    .build(),
            ]
        };

        let target = Target::new("t1", "t1");
        let fs = RealFilesystem;

        let real_dir = tempfile::tempdir().unwrap();
        let real_a = real_dir.path().join("aux/a.sh");
        let real_b = real_dir.path().join("aux/b.sh");
        let mut real_formatter = RecordingFormatter::new();
        let real_ok = write_auxiliary_files(
            &target,
            &invocations(&real_a, &real_b),
            &fs,
            &mut real_formatter,
            false,
        );
        assert!(real_ok);

        let mut dry_formatter = RecordingFormatter::new();
        let dry_ok =
            write_auxiliary_files(&target, &invocations(&a_path, &b_path), &fs, &mut dry_formatter, true);
        assert!(dry_ok);

        assert_eq!(dry_formatter.events(), real_formatter.events());
        assert_eq!(
            real_formatter.events(),
            &[
                "beginWriteAuxiliaryFiles".to_owned(),
                "createAuxiliaryDirectory".to_owned(),
                "writeAuxiliaryFile".to_owned(),
                "setAuxiliaryExecutable".to_owned(),
                "writeAuxiliaryFile".to_owned(),
                "setAuxiliaryExecutable".to_owned(),
                "writeAuxiliaryFile".to_owned(),
                "finishWriteAuxiliaryFiles".to_owned(),
            ]
        );
    }
}
