//! Data model for targets and invocations.
//!
//! Everything in this module is an immutable, externally-constructed record:
//! the core never mutates a `Target` or `Invocation` once it has been handed
//! one, and never retains it past the run that consumes it.

use std::collections::BTreeMap;
use std::path::PathBuf;

/// Stable handle identifying a target within a single build.
///
/// The core only ever compares and clones this id; all target semantics live
/// in the associated target environment, which is supplied by the
/// surrounding driver through [`crate::source::TargetEnvironmentSource`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TargetId(String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> TargetId {
        TargetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A node in the target dependency graph.
///
/// Distinct from [`TargetId`] only in that it additionally carries the
/// human-readable name the formatter and logs should use; the id is what
/// participates in graph identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    id: TargetId,
    name: String,
}

impl Target {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Target {
        let id = TargetId::new(id);
        Target { id, name: name.into() }
    }

    pub fn id(&self) -> &TargetId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Which of the two passes over a target's invocations we're in.
///
/// The structure pass runs every invocation with `createsProductStructure ==
/// true` (directory scaffolding, placeholder files); the content pass runs
/// everything else. Every invocation in a target runs in exactly one of the
/// two passes, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    CreateProductStructure,
    Content,
}

impl Phase {
    fn matches(self, creates_product_structure: bool) -> bool {
        match self {
            Phase::CreateProductStructure => creates_product_structure,
            Phase::Content => !creates_product_structure,
        }
    }
}

/// What an invocation actually does when it runs.
///
/// Modelled as an explicit three-way enum rather than the sentinel encoding
/// (empty path *and* empty builtin name) some build descriptions use on the
/// wire: a `Phony` invocation carries no executable at all, it only
/// participates in dependency ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Work {
    /// Run in-process, dispatched through the built-in registry by name.
    Builtin { name: String },
    /// Run as a subprocess.
    External { path: PathBuf, display_name: String },
    /// Performs no work; exists purely to order its dependents correctly.
    Phony,
}

impl Work {
    pub fn display_name(&self) -> &str {
        match self {
            Work::Builtin { name } => name,
            Work::External { display_name, .. } => display_name,
            Work::Phony => "<phony>",
        }
    }
}

/// A single auxiliary file an invocation expects to find on disk before it
/// runs, generated by the executor rather than by another invocation (for
/// example a response file or a link file list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryFile {
    pub path: PathBuf,
    pub contents: Vec<u8>,
    pub executable: bool,
}

impl AuxiliaryFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>, executable: bool) -> Self {
        AuxiliaryFile { path: path.into(), contents: contents.into(), executable }
    }
}

/// A single command to run, external or in-process, with its declared inputs
/// and outputs.
///
/// `Invocation` is immutable and cheap to clone (paths and strings only); the
/// core never mutates one after it has been handed it by the phase
/// collaborator.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub work: Work,
    pub arguments: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub working_directory: PathBuf,
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    /// Paths that must match an output of another invocation in the same
    /// target to induce an ordering edge; never stat'd as real files.
    pub phony_inputs: Vec<PathBuf>,
    /// Same contract as `phony_inputs`; kept distinct because callers derive
    /// the two sets from different sources (explicit deps vs. phase linkage).
    pub input_dependencies: Vec<PathBuf>,
    pub auxiliary_files: Vec<AuxiliaryFile>,
    pub creates_product_structure: bool,
}

impl Invocation {
    pub fn phase(&self) -> Phase {
        if self.creates_product_structure {
            Phase::CreateProductStructure
        } else {
            Phase::Content
        }
    }

    pub fn runs_in(&self, phase: Phase) -> bool {
        phase.matches(self.creates_product_structure)
    }

    pub fn is_phony(&self) -> bool {
        matches!(self.work, Work::Phony)
    }

    /// Every path that can match against another invocation's output and
    /// thereby induce a dependency edge.
    pub fn dependency_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.inputs.iter().chain(self.phony_inputs.iter()).chain(self.input_dependencies.iter())
    }

    /// Environment presented to the formatter: sorted by key for
    /// deterministic logs, regardless of the order callers inserted entries.
    pub fn sorted_environment(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<_> =
            self.environment.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        entries.sort_unstable_by_key(|(k, _)| *k);
        entries
    }
}

/// Minimal builder to keep test and demo call sites readable; not required by
/// the spec, just ergonomics around the otherwise-wide `Invocation` literal.
#[derive(Debug, Clone, Default)]
pub struct InvocationBuilder {
    work: Option<Work>,
    arguments: Vec<String>,
    environment: BTreeMap<String, String>,
    working_directory: PathBuf,
    inputs: Vec<PathBuf>,
    outputs: Vec<PathBuf>,
    phony_inputs: Vec<PathBuf>,
    input_dependencies: Vec<PathBuf>,
    auxiliary_files: Vec<AuxiliaryFile>,
    creates_product_structure: bool,
}

impl InvocationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phony() -> Self {
        Self { work: Some(Work::Phony), ..Self::default() }
    }

    pub fn builtin(name: impl Into<String>) -> Self {
        Self { work: Some(Work::Builtin { name: name.into() }), ..Self::default() }
    }

    pub fn external(path: impl Into<PathBuf>, display_name: impl Into<String>) -> Self {
        Self {
            work: Some(Work::External { path: path.into(), display_name: display_name.into() }),
            ..Self::default()
        }
    }

    pub fn arguments(mut self, arguments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.arguments = arguments.into_iter().map(Into::into).collect();
        self
    }

    pub fn environment(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn working_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_directory = dir.into();
        self
    }

    pub fn inputs(mut self, inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn outputs(mut self, outputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.outputs = outputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn phony_inputs(mut self, inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        self.phony_inputs = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn input_dependencies(
        mut self,
        inputs: impl IntoIterator<Item = impl Into<PathBuf>>,
    ) -> Self {
        self.input_dependencies = inputs.into_iter().map(Into::into).collect();
        self
    }

    pub fn auxiliary_file(mut self, file: AuxiliaryFile) -> Self {
        self.auxiliary_files.push(file);
        self
    }

    pub fn creates_product_structure(mut self, value: bool) -> Self {
        self.creates_product_structure = value;
        self
    }

    pub fn build(self) -> Invocation {
        Invocation {
            work: self.work.expect("InvocationBuilder requires a work kind"),
            arguments: self.arguments,
            environment: self.environment,
            working_directory: self.working_directory,
            inputs: self.inputs,
            outputs: self.outputs,
            phony_inputs: self.phony_inputs,
            input_dependencies: self.input_dependencies,
            auxiliary_files: self.auxiliary_files,
            creates_product_structure: self.creates_product_structure,
        }
    }
}
