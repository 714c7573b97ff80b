//! Filesystem collaborator: the handful of syscalls the core needs
//! (directory creation, executable-bit testing/setting) behind a trait so
//! dry-run mode and tests don't have to special-case every call site.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem operations the core depends on.
///
/// [`RealFilesystem`] is the only production implementation; the trait
/// exists so components never reach for `std::fs` directly and so dry-run
/// handling stays centralised in the executor rather than scattered through
/// every component.
pub trait Filesystem {
    fn directory_exists(&self, path: &Path) -> bool;
    fn create_directory(&self, path: &Path) -> io::Result<()>;
    fn is_executable(&self, path: &Path) -> bool;
    fn set_executable(&self, path: &Path) -> io::Result<()>;
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// Creates directories recursively, grants owner rwx / group+other rx on
/// `set_executable`, and writes files truncating and byte-exact.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_directory(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn is_executable(&self, path: &Path) -> bool {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            match std::fs::metadata(path) {
                Ok(meta) => meta.permissions().mode() & 0o111 != 0,
                Err(_) => false,
            }
        }
        #[cfg(not(unix))]
        {
            path.is_file()
        }
    }

    fn set_executable(&self, path: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Ok(())
        }
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }
}

/// Ensures `path`'s parent directory exists, returning whether a directory
/// actually had to be created (so callers can decide whether to emit a
/// "create directory" event).
///
/// In dry-run mode no directory is actually created, so a caller that
/// writes more than one path under the same not-yet-existent parent must
/// pass the same `simulated` set across those calls: it tracks the parents
/// a real run would already have created, so the second call reports
/// "already exists" instead of "needs creating" again, keeping the dry-run
/// event sequence identical to a real run (spec.md §3 invariant 5).
/// Callers that never repeat a parent across a single dry-run pass (or that
/// never run in dry-run mode at all) can pass `None`.
pub fn ensure_parent_directory(
    fs: &dyn Filesystem,
    path: &Path,
    dry_run: bool,
    simulated: Option<&mut HashSet<PathBuf>>,
) -> io::Result<bool> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(false),
    };

    if dry_run {
        if fs.directory_exists(parent) {
            return Ok(false);
        }
        return Ok(match simulated {
            Some(simulated) => simulated.insert(parent.to_path_buf()),
            None => true,
        });
    }

    if fs.directory_exists(parent) {
        return Ok(false);
    }
    fs.create_directory(parent)?;
    Ok(true)
}
