//! A [`Formatter`] that records the name of every event it receives, for use
//! in tests asserting exact event sequences (spec §8, universal property 1
//! and the S1–S6 scenarios).

use crate::formatter::{BuildContext, Formatter};
use crate::model::{Invocation, Phase, Target};

#[derive(Debug, Default)]
pub struct RecordingFormatter {
    events: Vec<String>,
}

impl RecordingFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[String] {
        &self.events
    }

    fn record(&mut self, event: &str) -> String {
        self.events.push(event.to_owned());
        event.to_owned()
    }
}

impl Formatter for RecordingFormatter {
    fn begin(&mut self, _context: &dyn BuildContext) -> String {
        self.record("begin")
    }

    fn success(&mut self, _context: &dyn BuildContext) -> String {
        self.record("success")
    }

    fn failure(
        &mut self,
        _context: &dyn BuildContext,
        _failing_invocations: &[Invocation],
    ) -> String {
        self.record("failure")
    }

    fn begin_target(&mut self, _context: &dyn BuildContext, target: &Target) -> String {
        self.record(&format!("beginTarget({})", target.name()))
    }

    fn finish_target(&mut self, _context: &dyn BuildContext, target: &Target) -> String {
        self.record(&format!("finishTarget({})", target.name()))
    }

    fn begin_check_dependencies(&mut self, target: &Target) -> String {
        self.record(&format!("beginCheckDependencies({})", target.name()))
    }

    fn finish_check_dependencies(&mut self, target: &Target) -> String {
        self.record(&format!("finishCheckDependencies({})", target.name()))
    }

    fn begin_write_auxiliary_files(&mut self, _target: &Target) -> String {
        self.record("beginWriteAuxiliaryFiles")
    }

    fn finish_write_auxiliary_files(&mut self, _target: &Target) -> String {
        self.record("finishWriteAuxiliaryFiles")
    }

    fn create_auxiliary_directory(&mut self, _path: &std::path::Path) -> String {
        self.record("createAuxiliaryDirectory")
    }

    fn write_auxiliary_file(&mut self, _path: &std::path::Path) -> String {
        self.record("writeAuxiliaryFile")
    }

    fn set_auxiliary_executable(&mut self, _path: &std::path::Path) -> String {
        self.record("setAuxiliaryExecutable")
    }

    fn begin_create_product_structure(&mut self, _target: &Target) -> String {
        self.record("beginCreateProductStructure")
    }

    fn finish_create_product_structure(&mut self, _target: &Target) -> String {
        self.record("finishCreateProductStructure")
    }

    fn begin_invocation(
        &mut self,
        invocation: &Invocation,
        display_name: &str,
        _phase: Phase,
        environment: &[(&str, &str)],
    ) -> String {
        let _ = (invocation, environment);
        self.record(&format!("beginInvocation({})", display_name))
    }

    fn finish_invocation(
        &mut self,
        invocation: &Invocation,
        display_name: &str,
        _phase: Phase,
    ) -> String {
        let _ = invocation;
        self.record(&format!("finishInvocation({})", display_name))
    }
}
