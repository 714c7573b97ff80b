//! The built-in tool registry: in-process tools dispatched by name rather
//! than spawned as subprocesses.

use std::collections::BTreeMap;
use std::path::Path;

/// A single in-process tool. Implementations should treat a non-zero return
/// as failure, the same contract as a subprocess exit code.
pub trait BuiltinDriver {
    fn run(&self, arguments: &[String], environment: &BTreeMap<String, String>, working_directory: &Path) -> i32;
}

/// Looks up built-in drivers by name. The core treats the registry as
/// immutable and shared for the lifetime of a build.
pub trait BuiltinRegistry {
    fn driver(&self, name: &str) -> Option<&dyn BuiltinDriver>;
}

/// A registry backed by a simple name -> driver map, sufficient for the
/// handful of built-ins a driver typically ships.
#[derive(Default)]
pub struct MapBuiltinRegistry {
    drivers: BTreeMap<String, Box<dyn BuiltinDriver + Send + Sync>>,
}

impl MapBuiltinRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, name: impl Into<String>, driver: Box<dyn BuiltinDriver + Send + Sync>) -> Self {
        self.drivers.insert(name.into(), driver);
        self
    }
}

impl BuiltinRegistry for MapBuiltinRegistry {
    fn driver(&self, name: &str) -> Option<&dyn BuiltinDriver> {
        self.drivers.get(name).map(|d| d.as_ref() as &dyn BuiltinDriver)
    }
}

/// Creates every directory named in its arguments. Illustrative of the kind
/// of trivial structure-pass tool a real build system ships (e.g. creating a
/// bundle's directory layout before any content is copied into it).
#[derive(Debug, Default)]
pub struct MkdirBuiltin;

impl BuiltinDriver for MkdirBuiltin {
    fn run(&self, arguments: &[String], _environment: &BTreeMap<String, String>, working_directory: &Path) -> i32 {
        for arg in arguments {
            let path = working_directory.join(arg);
            if std::fs::create_dir_all(&path).is_err() {
                return 1;
            }
        }
        0
    }
}

/// Writes its first argument's contents (its remaining arguments, joined by
/// spaces) to the path given as its first argument. Illustrative only; real
/// content-producing built-ins are provided by the surrounding driver, not
/// this core.
#[derive(Debug, Default)]
pub struct WriteFileBuiltin;

impl BuiltinDriver for WriteFileBuiltin {
    fn run(&self, arguments: &[String], _environment: &BTreeMap<String, String>, working_directory: &Path) -> i32 {
        let path = match arguments.first() {
            Some(path) => working_directory.join(path),
            None => return 1,
        };
        let contents = arguments[1..].join(" ");
        match std::fs::write(&path, contents) {
            Ok(()) => 0,
            Err(_) => 1,
        }
    }
}
