// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `AggregatorBuildContext`: N inputs fold into one output with a
//! "create only if necessary" contract. Unlike the basic context, an
//! output not reasserted this build has no reason to remain, so
//! `should_carry_over_output` is always false — `create_if_necessary`
//! carries an up-to-date output forward itself, explicitly, rather than
//! leaving it to the generic orphan handling in `commit`.

use ibx_core::{BuildState, Configuration, CoreError, Logger, ResourceId, ResourceStatus};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::context::BuildContextCore;
use crate::context::ContextPolicy;
use crate::handles::{AggregateInput, AggregateOutput, Output, Resource};
use crate::workspace_trait::{MessageSink, Workspace};

/// Writes the aggregate file from its current set of inputs.
pub trait AggregateCreator {
    fn create(&self, output: &Output, inputs: &[AggregateInput]) -> Result<(), CoreError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregatorPolicy;

impl ContextPolicy for AggregatorPolicy {
    fn is_output_uptodate(&self, _output: &ResourceId) -> bool {
        false
    }

    fn should_carry_over_output(&self, _output: &ResourceId) -> bool {
        false
    }
}

/// A context that aggregates many inputs into one output per
/// `registerOutput`/`associateInputs`/`createIfNecessary` call.
pub struct AggregatorBuildContext<W, L> {
    core: BuildContextCore<W, L, AggregatorPolicy>,
    input_basedir: HashMap<ResourceId, PathBuf>,
    output_inputs: HashMap<ResourceId, HashSet<ResourceId>>,
}

impl<W, L> AggregatorBuildContext<W, L>
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
        let core = BuildContextCore::new(
            workspace,
            previous_state,
            state_file,
            configuration,
            logger,
            AggregatorPolicy,
        )?;
        Ok(AggregatorBuildContext { core, input_basedir: HashMap::new(), output_inputs: HashMap::new() })
    }

    /// Declare `file` an output without yet binding any inputs to it.
    pub fn register_output(&mut self, file: &Path) -> Result<AggregateOutput, CoreError> {
        let output = self.core.declare_output(file)?;
        Ok(AggregateOutput(output))
    }

    /// Register inputs under `basedir`, process every one whose status
    /// isn't `Unmodified`, run `processors` against each in order so they
    /// can attach attributes, and bind them to `output`.
    pub fn associate_inputs<I, E>(
        &mut self,
        output: &AggregateOutput,
        basedir: &Path,
        includes: I,
        excludes: E,
        processors: &mut [&mut dyn FnMut(&Resource, &mut BuildContextCore<W, L, AggregatorPolicy>) -> Result<(), CoreError>],
    ) -> Result<Vec<AggregateInput>, CoreError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let resources = self.core.register_inputs(basedir, includes, excludes)?;
        let canonical_basedir = basedir.to_path_buf();
        let mut bound = Vec::with_capacity(resources.len());

        for resource in resources {
            let status = self.core.get_resource_status(resource.id())?;
            if status != ResourceStatus::Unmodified {
                self.core.process_resource(&resource)?;
                for processor in processors.iter_mut() {
                    processor(&resource, &mut self.core)?;
                }
            }
            self.input_basedir.insert(resource.id().clone(), canonical_basedir.clone());
            self.output_inputs.entry(output.id().clone()).or_default().insert(resource.id().clone());
            bound.push(AggregateInput { resource, basedir: canonical_basedir.clone() });
        }

        Ok(bound)
    }

    /// Regenerate `output` iff its own status isn't `Unmodified` or any
    /// bound input isn't `Unmodified`. Returns whether it was (re)created.
    pub fn create_if_necessary<C: AggregateCreator>(
        &mut self,
        output: &AggregateOutput,
        creator: &C,
    ) -> Result<bool, CoreError> {
        let output_id = output.id().clone();
        let output_status = self.core.get_resource_status(&output_id)?;
        let input_ids: Vec<ResourceId> =
            self.output_inputs.get(&output_id).map(|ids| ids.iter().cloned().collect()).unwrap_or_default();

        let mut inputs_changed = false;
        for id in &input_ids {
            if self.core.get_resource_status(id)? != ResourceStatus::Unmodified {
                inputs_changed = true;
                break;
            }
        }

        // An input bound to this output in the previous build but not
        // re-associated this build (NORMAL-mode removal routes it into
        // `deleted_resources` instead of returning it from
        // `register_inputs`, so it never reaches `output_inputs` above) is
        // still a reason to regenerate, same as one that changed in place.
        if !inputs_changed {
            for id in self.core.previous_inputs_of(&output_id) {
                if input_ids.contains(&id) {
                    continue;
                }
                if self.core.get_resource_status(&id)? == ResourceStatus::Removed {
                    inputs_changed = true;
                    break;
                }
            }
        }

        if output_status == ResourceStatus::Unmodified && !inputs_changed {
            self.core.carry_over_unchanged(&output_id)?;
            return Ok(false);
        }

        let processed_output = self.core.process_output(output_id.path())?;
        let mut aggregate_inputs = Vec::with_capacity(input_ids.len());
        for id in &input_ids {
            if !self.core.is_processed(id) {
                self.core.mark_processed(id)?;
            }
            self.core.associate_ids(id, &output_id)?;
            let basedir = self.input_basedir.get(id).cloned().unwrap_or_default();
            aggregate_inputs.push(AggregateInput { resource: self.core.resource_handle(id), basedir });
        }

        creator.create(&processed_output, &aggregate_inputs)?;
        Ok(true)
    }

    pub fn get_resource_status(&self, id: &ResourceId) -> Result<ResourceStatus, CoreError> {
        self.core.get_resource_status(id)
    }

    pub fn new_output_stream(&self, output: &Output) -> Result<Box<dyn std::io::Write>, CoreError> {
        self.core.new_output_stream(output)
    }

    pub fn commit(self, sink: Option<&mut dyn MessageSink>) -> Result<BuildState, CoreError> {
        self.core.commit(sink)
    }
}

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;
