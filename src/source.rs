//! The external collaborator that turns a `Target` into a configured
//! environment and, from that environment, a set of invocations.
//!
//! Everything this trait produces is out of scope for the core proper
//! (spec.md §1, "Out of scope"): project parsing, build-setting evaluation,
//! and the derivation of `Invocation`s from build phases all live on the
//! other side of this boundary.

use crate::model::{Invocation, Target};

/// Derives a target's configured environment and, from it, the invocations
/// that make up the target's build.
pub trait TargetEnvironmentSource {
    /// Opaque to the core: only its presence or absence matters here.
    type Environment;

    /// Returns `None` if the target's environment couldn't be constructed
    /// (e.g. unresolved build settings). This is non-fatal for the overall
    /// build: the executor skips the target and continues (spec.md §4.F.3.b).
    fn target_environment(&self, target: &Target) -> Option<Self::Environment>;

    /// Derives the invocations for `target` given its already-resolved
    /// environment.
    fn invocations(&self, target: &Target, environment: &Self::Environment) -> Vec<Invocation>;
}
