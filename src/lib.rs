//! Build execution core for an Xcode-compatible build driver.
//!
//! This crate takes a set of targets related by a dependency graph, derives
//! from each target a set of tool invocations, orders them by data
//! dependency, materialises their auxiliary files on disk, and runs them in
//! order, streaming structured progress events to a pluggable formatter. It
//! stops at the first failure and surfaces the failing invocation.
//!
//! Project parsing, build-setting evaluation, and the derivation of
//! `Invocation`s from build phases are external collaborators (see
//! [`source::TargetEnvironmentSource`]); this crate only orders and runs
//! what it's handed.

pub mod aux_files;
pub mod builtin;
pub mod executor;
pub mod formatter;
pub mod fs_ops;
pub mod graph;
pub mod model;
pub mod recording;
pub mod runner;
pub mod sorter;
pub mod source;
pub mod subprocess;
pub mod target_builder;
pub mod target_graph;

pub use executor::Executor;
pub use formatter::{BuildContext, Formatter};
pub use model::{AuxiliaryFile, Invocation, InvocationBuilder, Phase, Target, TargetId, Work};
pub use source::TargetEnvironmentSource;
pub use target_graph::TargetGraph;
