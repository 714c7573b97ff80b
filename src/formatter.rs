//! The pluggable sink that turns lifecycle events into human- or
//! machine-readable output.
//!
//! Every event method returns a `String` (possibly empty) that the core
//! writes to standard output verbatim; the core performs no batching and the
//! formatter is free to be stateful.

use crate::model::{Invocation, Phase, Target};

/// Writes a formatter event's return value to stdout verbatim, skipping
/// empty strings (a formatter that has nothing to say for an event returns
/// `""`, not a blank line).
pub fn print_event(line: String) {
    if !line.is_empty() {
        println!("{}", line);
    }
}

/// Context threaded through an entire build; opaque to the core beyond being
/// handed back to the formatter on every top-level event.
pub trait BuildContext {
    fn describe(&self) -> String;
}

impl BuildContext for () {
    fn describe(&self) -> String {
        String::new()
    }
}

/// Event sink consumed by the executor. See module docs.
pub trait Formatter {
    fn begin(&mut self, context: &dyn BuildContext) -> String;
    fn success(&mut self, context: &dyn BuildContext) -> String;
    fn failure(&mut self, context: &dyn BuildContext, failing_invocations: &[Invocation])
        -> String;

    fn begin_target(&mut self, context: &dyn BuildContext, target: &Target) -> String;
    fn finish_target(&mut self, context: &dyn BuildContext, target: &Target) -> String;

    fn begin_check_dependencies(&mut self, target: &Target) -> String;
    fn finish_check_dependencies(&mut self, target: &Target) -> String;

    fn begin_write_auxiliary_files(&mut self, target: &Target) -> String;
    fn finish_write_auxiliary_files(&mut self, target: &Target) -> String;

    fn create_auxiliary_directory(&mut self, path: &std::path::Path) -> String;
    fn write_auxiliary_file(&mut self, path: &std::path::Path) -> String;
    fn set_auxiliary_executable(&mut self, path: &std::path::Path) -> String;

    fn begin_create_product_structure(&mut self, target: &Target) -> String;
    fn finish_create_product_structure(&mut self, target: &Target) -> String;

    /// `environment` is the invocation's environment sorted by key (spec.md
    /// §4.D: "the runner internally sorts by key before presenting [the
    /// environment] to the formatter"); implementations should use this
    /// rather than `invocation.environment` if they want a deterministic
    /// log.
    fn begin_invocation(
        &mut self,
        invocation: &Invocation,
        display_name: &str,
        phase: Phase,
        environment: &[(&str, &str)],
    ) -> String;
    fn finish_invocation(
        &mut self,
        invocation: &Invocation,
        display_name: &str,
        phase: Phase,
    ) -> String;
}

/// Reference human-readable formatter: one line per event, the way a plain
/// build log reads.
#[derive(Debug, Default)]
pub struct HumanFormatter;

impl Formatter for HumanFormatter {
    fn begin(&mut self, context: &dyn BuildContext) -> String {
        format!("=== build started: {} ===", context.describe())
    }

    fn success(&mut self, _context: &dyn BuildContext) -> String {
        "=== build succeeded ===".to_owned()
    }

    fn failure(
        &mut self,
        _context: &dyn BuildContext,
        failing_invocations: &[Invocation],
    ) -> String {
        match failing_invocations.first() {
            Some(invocation) => {
                format!("=== build failed: {} ===", invocation.work.display_name())
            }
            None => "=== build failed ===".to_owned(),
        }
    }

    fn begin_target(&mut self, _context: &dyn BuildContext, target: &Target) -> String {
        format!("--- building target {} ---", target.name())
    }

    fn finish_target(&mut self, _context: &dyn BuildContext, target: &Target) -> String {
        format!("--- finished target {} ---", target.name())
    }

    fn begin_check_dependencies(&mut self, target: &Target) -> String {
        format!("checking dependencies for {}", target.name())
    }

    fn finish_check_dependencies(&mut self, _target: &Target) -> String {
        String::new()
    }

    fn begin_write_auxiliary_files(&mut self, target: &Target) -> String {
        format!("writing auxiliary files for {}", target.name())
    }

    fn finish_write_auxiliary_files(&mut self, _target: &Target) -> String {
        String::new()
    }

    fn create_auxiliary_directory(&mut self, path: &std::path::Path) -> String {
        format!("mkdir -p {}", path.display())
    }

    fn write_auxiliary_file(&mut self, path: &std::path::Path) -> String {
        format!("write {}", path.display())
    }

    fn set_auxiliary_executable(&mut self, path: &std::path::Path) -> String {
        format!("chmod +x {}", path.display())
    }

    fn begin_create_product_structure(&mut self, target: &Target) -> String {
        format!("creating product structure for {}", target.name())
    }

    fn finish_create_product_structure(&mut self, _target: &Target) -> String {
        String::new()
    }

    fn begin_invocation(
        &mut self,
        _invocation: &Invocation,
        display_name: &str,
        _phase: Phase,
        environment: &[(&str, &str)],
    ) -> String {
        if environment.is_empty() {
            format!("> {}", display_name)
        } else {
            let env = environment.iter().map(|(k, v)| format!("{}={}", k, v)).collect::<Vec<_>>().join(" ");
            format!("> {} {}", env, display_name)
        }
    }

    fn finish_invocation(
        &mut self,
        _invocation: &Invocation,
        display_name: &str,
        _phase: Phase,
    ) -> String {
        format!("< {}", display_name)
    }
}
