//! Demonstration driver: wires together a formatter, a built-in registry,
//! and a tiny two-target example graph, then calls into the library.
//!
//! This is reference wiring for consumers of the library, not a product
//! surface in its own right (see spec.md §6, "CLI surface").

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use xcbuild_exec::builtin::{MapBuiltinRegistry, MkdirBuiltin, WriteFileBuiltin};
use xcbuild_exec::formatter::{BuildContext, HumanFormatter};
use xcbuild_exec::{Executor, Invocation, InvocationBuilder, Target, TargetEnvironmentSource, TargetGraph};

struct DemoContext;

impl BuildContext for DemoContext {
    fn describe(&self) -> String {
        "demo".to_owned()
    }
}

/// A source that always succeeds in deriving a target's environment and
/// returns whatever invocations were baked into it ahead of time. A real
/// driver would parse project files and resolve build settings here.
struct StaticSource {
    invocations_by_target: BTreeMap<String, Vec<Invocation>>,
}

impl TargetEnvironmentSource for StaticSource {
    type Environment = ();

    fn target_environment(&self, target: &Target) -> Option<()> {
        if self.invocations_by_target.contains_key(target.id().as_str()) {
            Some(())
        } else {
            None
        }
    }

    fn invocations(&self, target: &Target, _environment: &()) -> Vec<Invocation> {
        self.invocations_by_target.get(target.id().as_str()).cloned().unwrap_or_default()
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let dry_run = env::args().any(|arg| arg == "--dry-run");
    let out_dir = env::temp_dir().join("xcbuild-exec-demo");
    if !dry_run {
        std::fs::create_dir_all(&out_dir)
            .with_context(|| format!("couldn't create demo output directory {}", out_dir.display()))?;
    }

    let mut targets = TargetGraph::new();
    let library = Target::new("lib", "DemoLibrary");
    let app = Target::new("app", "DemoApp");
    targets.insert(library.clone(), vec![]);
    targets.insert(app.clone(), vec![library.clone()]);

    let mut invocations_by_target = BTreeMap::new();
    invocations_by_target.insert(
        library.id().as_str().to_owned(),
        vec![structure_invocation(&out_dir, "lib"), write_invocation(&out_dir, "lib", "hello from the library")],
    );
    invocations_by_target.insert(
        app.id().as_str().to_owned(),
        vec![structure_invocation(&out_dir, "app"), write_invocation(&out_dir, "app", "hello from the app")],
    );
    let source = StaticSource { invocations_by_target };

    let registry = MapBuiltinRegistry::new()
        .register("mkdir", Box::new(MkdirBuiltin))
        .register("write-file", Box::new(WriteFileBuiltin));

    let mut formatter = HumanFormatter;
    let mut executor = Executor::new(&mut formatter, &registry, dry_run);

    let ok = executor.build(&DemoContext, &targets, &source);
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

fn structure_invocation(out_dir: &PathBuf, target_id: &str) -> Invocation {
    InvocationBuilder::builtin("mkdir")
        .arguments([target_id.to_owned()])
        .working_directory(out_dir)
        .creates_product_structure(true)
        .build()
}

fn write_invocation(out_dir: &PathBuf, target_id: &str, message: &str) -> Invocation {
    let output = out_dir.join(target_id).join("output.txt");
    InvocationBuilder::builtin("write-file")
        .arguments([format!("{}/output.txt", target_id), message.to_owned()])
        .working_directory(out_dir)
        .outputs([output])
        .creates_product_structure(false)
        .build()
}
