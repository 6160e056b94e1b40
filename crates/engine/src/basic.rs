// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BasicBuildContext`: the minimal specialization — register an input,
//! ask whether anything needs doing, declare an output. Outputs of a basic
//! build are presumed good once produced, so nothing this build didn't
//! touch is ever deleted at commit.

use ibx_core::{BuildState, Configuration, CoreError, Logger, ResourceId};
use std::path::{Path, PathBuf};

use crate::context::BuildContextCore;
use crate::context::ContextPolicy;
use crate::handles::{Output, Resource};
use crate::workspace_trait::{MessageSink, Workspace};

/// `BasicBuildContext`'s hooks are both constant: an output survives until
/// some other build logic deletes it outright, and every previous output
/// counts as up to date without the engine re-checking it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicPolicy;

impl ContextPolicy for BasicPolicy {
    fn is_output_uptodate(&self, _output: &ResourceId) -> bool {
        true
    }

    fn should_carry_over_output(&self, _output: &ResourceId) -> bool {
        true
    }
}

/// A context whose callers register inputs and produce outputs directly,
/// with no association bookkeeping between them.
pub struct BasicBuildContext<W, L> {
    core: BuildContextCore<W, L, BasicPolicy>,
}

impl<W, L> BasicBuildContext<W, L>
where
    W: Workspace,
    L: Logger,
{
    pub fn new(
        workspace: W,
        previous_state: Option<BuildState>,
        state_file: Option<PathBuf>,
        configuration: Configuration,
        logger: L,
    ) -> Result<Self, CoreError> {
        let core =
            BuildContextCore::new(workspace, previous_state, state_file, configuration, logger, BasicPolicy)?;
        Ok(BasicBuildContext { core })
    }

    pub fn register_input(&mut self, file: &Path) -> Result<Resource, CoreError> {
        self.core.register_input(file)
    }

    pub fn is_processing_required(&self) -> Result<bool, CoreError> {
        self.core.is_processing_required()
    }

    pub fn process_output(&mut self, file: &Path) -> Result<Output, CoreError> {
        self.core.process_output(file)
    }

    /// Not part of the minimal three-operation surface the design calls
    /// for, but needed by any caller that actually wants to know a
    /// resource's status or write through a declared output — every
    /// `BasicBuildContext` user in the scenario tests needs at least these.
    pub fn get_resource_status(&self, id: &ResourceId) -> Result<ibx_core::ResourceStatus, CoreError> {
        self.core.get_resource_status(id)
    }

    pub fn new_output_stream(&self, output: &Output) -> Result<Box<dyn std::io::Write>, CoreError> {
        self.core.new_output_stream(output)
    }

    pub fn mark_skip_execution(&mut self) -> Result<(), CoreError> {
        self.core.mark_skip_execution()
    }

    pub fn commit(self, sink: Option<&mut dyn MessageSink>) -> Result<BuildState, CoreError> {
        self.core.commit(sink)
    }
}

#[cfg(test)]
#[path = "basic_tests.rs"]
mod tests;
