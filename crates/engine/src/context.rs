// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `BuildContextCore`: the shared state machine behind both concrete
//! contexts. [`BasicBuildContext`](crate::BasicBuildContext) and
//! [`AggregatorBuildContext`](crate::AggregatorBuildContext) are thin
//! wrappers that plug a [`ContextPolicy`] into this engine rather than
//! reimplementing registration, processing, association, and commit.

use ibx_core::{
    AttributeValue, BuildState, Configuration, CoreError, Logger, Message, MessageBundle,
    ResourceHolder, ResourceId, ResourceStatus, Severity, WorkspaceMode,
};
use ibx_match::FileMatcher;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::handles::{ContextToken, Output, Resource, ResourceMetadata};
use crate::workspace_trait::{MessageSink, Workspace};

/// Which of a context's two state snapshots a lookup reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateRef {
    /// The state being built up by this build.
    Current,
    /// The state left behind by the previous build.
    Previous,
}

/// The "subclass hooks" the design calls for, modeled as injected policy
/// rather than an open class hierarchy.
///
/// Both concrete hooks are constant-valued for both specializations in
/// scope (`BasicBuildContext`: both always true; `AggregatorBuildContext`:
/// `should_carry_over_output` always false), so implementations are
/// zero-field unit structs with no state of their own to manage.
pub trait ContextPolicy {
    /// Whether a previous-build output not touched this build still counts
    /// as up to date, for `isProcessingRequired`.
    fn is_output_uptodate(&self, output: &ResourceId) -> bool;

    /// Whether an orphaned output (declared in a previous build, not
    /// reprocessed this build) should be kept on commit instead of deleted.
    fn should_carry_over_output(&self, output: &ResourceId) -> bool {
        let _ = output;
        true
    }

    /// Give a specialization a chance to veto an `associate` call. `Some`
    /// is the rejection reason.
    fn veto_association(&self, input: &ResourceId, output: &ResourceId) -> Option<String> {
        let _ = (input, output);
        None
    }
}

/// The shared engine behind `BasicBuildContext` and `AggregatorBuildContext`.
pub struct BuildContextCore<W, L, P> {
    token: ContextToken,
    workspace: W,
    logger: L,
    policy: P,
    /// Carried for diagnostics only — persisting the final `BuildState` to
    /// this path is the caller's job (`ibx-fs`'s state-file codec), since
    /// this crate has no filesystem dependency of its own.
    state_file: Option<PathBuf>,
    old_state: BuildState,
    state: BuildState,
    deleted_resources: HashSet<ResourceId>,
    processed_resources: HashSet<ResourceId>,
    skip_execution: bool,
    escalated: bool,
}

impl<W, L, P> BuildContextCore<W, L, P>
where
    W: Workspace,
    L: Logger,
    P: ContextPolicy,
{
    /// Construct a context bound to `workspace`, resuming from
    /// `previous_state` if one was readable (a missing or undecodable state
    /// file is "no previous state," per the source's only stated
    /// compatibility rule — escalation follows).
    pub fn new(
        workspace: W,
        previous_state: Option<BuildState>,
        state_file: Option<PathBuf>,
        configuration: Configuration,
        logger: L,
        policy: P,
    ) -> Result<Self, CoreError> {
        let old_state = previous_state.unwrap_or_default();
        let configuration_changed = old_state.configuration.changed_from(&configuration);

        let (escalated, workspace) = match workspace.mode() {
            WorkspaceMode::Escalated => (true, workspace),
            WorkspaceMode::Suppressed => (false, workspace),
            WorkspaceMode::Normal | WorkspaceMode::Delta => {
                if configuration_changed {
                    (true, workspace.escalate())
                } else {
                    (false, workspace)
                }
            }
        };

        if configuration_changed {
            logger.info("configuration changed, escalating to a full rebuild");
            for diff in old_state.configuration.diff(&configuration) {
                logger.info(&format!(
                    "configuration key {:?} changed: {:?} -> {:?}",
                    diff.key, diff.previous, diff.current
                ));
            }
        }

        Ok(BuildContextCore {
            token: ContextToken::fresh(),
            workspace,
            logger,
            policy,
            state_file,
            old_state,
            state: BuildState::empty(configuration),
            deleted_resources: HashSet::new(),
            processed_resources: HashSet::new(),
            skip_execution: false,
            escalated,
        })
    }

    pub fn is_escalated(&self) -> bool {
        self.escalated
    }

    pub fn state_file(&self) -> Option<&Path> {
        self.state_file.as_deref()
    }

    fn validate_handle(&self, handle: &ResourceMetadata) -> Result<(), CoreError> {
        if handle.token != self.token {
            return Err(CoreError::invalid_argument(
                "handle belongs to a different build context",
            ));
        }
        Ok(())
    }

    /// Walk `basedir` for files matching `includes`/`excludes`, registering
    /// every one as an input of the current build.
    ///
    /// NORMAL/ESCALATED walk every matching file and report `New`; any
    /// matching path known from the previous build but not visited this
    /// time is inferred `Removed` (a full rescan, so absence is conclusive).
    /// DELTA walks only changed files; a previously known matching path not
    /// visited is re-registered from its remembered holder — its true
    /// status (including `Removed`, if it vanished) is resolved lazily by
    /// `get_resource_status`'s live workspace check. SUPPRESSED performs no
    /// walk at all and trusts the previous state unconditionally.
    pub fn register_inputs<I, E>(
        &mut self,
        basedir: &Path,
        includes: I,
        excludes: E,
    ) -> Result<Vec<Resource>, CoreError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
        E: IntoIterator,
        E::Item: AsRef<str>,
    {
        let canonical_basedir = canonicalize_dir(basedir)?;
        let matcher = FileMatcher::new(canonical_basedir.clone(), includes, excludes)
            .map_err(|e| CoreError::invalid_argument(e.to_string()))?;

        let token = self.token;
        let mut results = Vec::new();

        if matches!(self.workspace.mode(), WorkspaceMode::Suppressed) {
            let mut carried = Vec::new();
            for (id, holder) in &self.old_state.resources {
                let Some(file_state) = holder.as_file_state() else { continue };
                if file_state.path.starts_with(&canonical_basedir) && matcher.matches(&file_state.path) {
                    carried.push((id.clone(), holder.clone()));
                }
            }
            for (id, holder) in carried {
                self.state.resources.insert(id.clone(), holder);
                results.push(ResourceMetadata::new(token, id));
            }
            return Ok(results);
        }

        let mut visited: HashSet<ResourceId> = HashSet::new();
        {
            let workspace = &self.workspace;
            let state = &mut self.state;
            let deleted_resources = &mut self.deleted_resources;
            workspace.walk(&canonical_basedir, &mut |entry| {
                if !matcher.matches(&entry.path) {
                    return Ok(());
                }
                let id = ResourceId::canonicalize(&entry.path)?;
                if entry.status == ResourceStatus::Removed {
                    deleted_resources.insert(id);
                    return Ok(());
                }
                let holder = ResourceHolder::file(entry.path, entry.last_modified, entry.length);
                if let Some(existing) = state.resources.get(&id) {
                    if *existing != holder && !state.outputs.contains(&id) {
                        return Err(CoreError::inconsistent_resource(
                            id.to_string(),
                            "re-registered with a different holder",
                        ));
                    }
                }
                visited.insert(id.clone());
                state.resources.insert(id.clone(), holder);
                results.push(ResourceMetadata::new(token, id));
                Ok(())
            })?;
        }

        let mode = self.workspace.mode();
        match mode {
            WorkspaceMode::Delta => {
                let candidates: Vec<(ResourceId, ResourceHolder)> = self
                    .old_state
                    .resources
                    .iter()
                    .filter(|(id, holder)| {
                        !visited.contains(*id)
                            && !self.deleted_resources.contains(*id)
                            && holder
                                .as_file_state()
                                .map(|fs| {
                                    fs.path.starts_with(&canonical_basedir) && matcher.matches(&fs.path)
                                })
                                .unwrap_or(false)
                    })
                    .map(|(id, holder)| (id.clone(), holder.clone()))
                    .collect();
                for (id, holder) in candidates {
                    self.state.resources.insert(id.clone(), holder);
                    results.push(ResourceMetadata::new(token, id));
                }
            }
            _ => {
                let vanished: Vec<ResourceId> = self
                    .old_state
                    .resources
                    .iter()
                    .filter(|(id, holder)| {
                        !visited.contains(*id)
                            && !self.deleted_resources.contains(*id)
                            && holder
                                .as_file_state()
                                .map(|fs| {
                                    fs.path.starts_with(&canonical_basedir) && matcher.matches(&fs.path)
                                })
                                .unwrap_or(false)
                    })
                    .map(|(id, _)| id.clone())
                    .collect();
                for id in vanished {
                    self.deleted_resources.insert(id);
                }
            }
        }

        Ok(results)
    }

    /// Register a single already-known file as an input.
    ///
    /// Implemented as a one-file walk of its parent directory rather than a
    /// dedicated stat, keeping every registration path going through the
    /// same `Workspace::walk` contract.
    pub fn register_input(&mut self, file: &Path) -> Result<Resource, CoreError> {
        let id = ResourceId::canonicalize(file)?;
        if !self.workspace.is_present(file)? {
            return Err(CoreError::invalid_argument(format!(
                "resource not present in workspace: {id}"
            )));
        }
        let parent = file
            .parent()
            .ok_or_else(|| CoreError::invalid_argument("file has no parent directory"))?;
        let filename = file
            .file_name()
            .ok_or_else(|| CoreError::invalid_argument("file has no file name"))?
            .to_string_lossy()
            .into_owned();
        let matcher = FileMatcher::new(parent, [filename], Vec::<String>::new())
            .map_err(|e| CoreError::invalid_argument(e.to_string()))?;

        let mut found: Option<ResourceHolder> = None;
        self.workspace.walk(parent, &mut |entry| {
            if entry.status != ResourceStatus::Removed && matcher.matches(&entry.path) {
                found = Some(ResourceHolder::file(entry.path, entry.last_modified, entry.length));
            }
            Ok(())
        })?;

        let holder = found.ok_or_else(|| {
            CoreError::invalid_argument(format!("resource not present in workspace: {id}"))
        })?;
        self.state.resources.insert(id.clone(), holder);
        Ok(ResourceMetadata::new(self.token, id))
    }

    /// Classify `id` relative to the previous build: `Removed` if this
    /// build already determined it vanished, `New` if the previous build
    /// never knew it, `Modified` unconditionally once the context has
    /// escalated, otherwise delegated to a live workspace check.
    pub fn get_resource_status(&self, id: &ResourceId) -> Result<ResourceStatus, CoreError> {
        if self.deleted_resources.contains(id) {
            return Ok(ResourceStatus::Removed);
        }
        let Some(holder) = self.old_state.resources.get(id) else {
            return Ok(ResourceStatus::New);
        };
        if self.escalated {
            return Ok(ResourceStatus::Modified);
        }
        match holder {
            ResourceHolder::FileState(fs) => {
                self.workspace.resource_status(&fs.path, fs.last_modified, fs.length)
            }
        }
    }

    /// Mark a registered resource processed, clearing any carried-over
    /// attributes, messages, and associations it had — the build is about
    /// to recompute them.
    pub fn process_resource(&mut self, resource: &Resource) -> Result<(), CoreError> {
        self.validate_handle(resource)?;
        self.mark_processed(resource.id())
    }

    /// `process_resource`'s body, for callers (the aggregator
    /// specialization) that only have an id on hand rather than a handle —
    /// e.g. an input recorded in `outputInputs` from a previous
    /// `associateInputs` call.
    pub(crate) fn mark_processed(&mut self, id: &ResourceId) -> Result<(), CoreError> {
        if !self.state.resources.contains_key(id) {
            return Err(CoreError::invalid_argument(format!(
                "{id} is not a current-state resource"
            )));
        }
        self.processed_resources.insert(id.clone());
        self.state.resource_attributes.remove(id);
        self.state.resource_messages.remove(id);
        self.state.resource_outputs.remove(id);
        Ok(())
    }

    pub(crate) fn is_processed(&self, id: &ResourceId) -> bool {
        self.processed_resources.contains(id)
    }

    /// Carry an id's previous-build holder/attributes/messages/
    /// associations into the current state verbatim and mark it processed,
    /// bypassing the generic orphan-or-delete handling `commit` applies to
    /// outputs whose `should_carry_over_output` is false. Used by the
    /// aggregator specialization to keep an output that didn't need
    /// regenerating without `commit` treating it as an abandoned orphan.
    pub(crate) fn carry_over_unchanged(&mut self, id: &ResourceId) -> Result<(), CoreError> {
        if let Some(holder) = self.old_state.resources.get(id).cloned() {
            self.state.resources.insert(id.clone(), holder);
        }
        if self.old_state.outputs.contains(id) {
            self.state.outputs.insert(id.clone());
        }
        if let Some(attrs) = self.old_state.resource_attributes.get(id).cloned() {
            self.state.resource_attributes.entry(id.clone()).or_insert(attrs);
        }
        if let Some(messages) = self.old_state.resource_messages.get(id).cloned() {
            self.state.resource_messages.entry(id.clone()).or_insert(messages);
        }
        if let Some(outputs) = self.old_state.resource_outputs.get(id).cloned() {
            self.state.resource_outputs.entry(id.clone()).or_insert(outputs);
        }
        self.processed_resources.insert(id.clone());
        Ok(())
    }

    /// Whether this build needs to do any work at all: escalated, any
    /// registered resource is not `Unmodified`, or any previous output is
    /// no longer up to date by the specialization's own rule.
    pub fn is_processing_required(&self) -> Result<bool, CoreError> {
        if self.escalated {
            return Ok(true);
        }
        for id in self.state.resources.keys() {
            if self.get_resource_status(id)? != ResourceStatus::Unmodified {
                return Ok(true);
            }
        }
        for id in &self.old_state.outputs {
            if !self.policy.is_output_uptodate(id) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Record `value` for `id`/`key` in the current state, returning
    /// whatever value the previous build had recorded there, if any.
    pub fn set_resource_attribute(
        &mut self,
        id: &ResourceId,
        key: &str,
        value: AttributeValue,
    ) -> Result<Option<AttributeValue>, CoreError> {
        let previous = self
            .old_state
            .resource_attributes
            .get(id)
            .and_then(|attrs| attrs.get(key))
            .cloned();
        self.state
            .resource_attributes
            .entry(id.clone())
            .or_default()
            .insert(key.to_string(), value);
        Ok(previous)
    }

    /// Type-checked lookup against either state.
    pub fn get_resource_attribute<T>(
        &self,
        which: StateRef,
        id: &ResourceId,
        key: &str,
    ) -> Result<Option<T>, CoreError>
    where
        T: for<'a> TryFrom<&'a AttributeValue, Error = CoreError>,
    {
        let state = match which {
            StateRef::Current => &self.state,
            StateRef::Previous => &self.old_state,
        };
        match state.resource_attributes.get(id).and_then(|attrs| attrs.get(key)) {
            Some(value) => Ok(Some(T::try_from(value)?)),
            None => Ok(None),
        }
    }

    /// Attach a diagnostic to `id`, logging it immediately through the host
    /// logger in addition to recording it for commit-time replay/sink
    /// delivery.
    pub fn add_message(
        &mut self,
        id: &ResourceId,
        line: u32,
        column: u32,
        text: impl Into<String>,
        severity: Severity,
        cause: Option<String>,
    ) {
        let message = Message { line, column, text: text.into(), severity, cause };
        self.logger.log(severity, &message.format_with_path(&id.to_string()));
        self.state.resource_messages.entry(id.clone()).or_default().push(message);
    }

    /// Declare `file` an output of the current build, replacing any holder
    /// already on record for the same id — unlike inputs, outputs are
    /// always replace-permitted.
    ///
    /// The recorded holder is a placeholder; real `(lastModified, length)`
    /// is filled in at `commit`, once every output this build touches has
    /// definitely finished being written.
    pub fn process_output(&mut self, file: &Path) -> Result<Output, CoreError> {
        let id = ResourceId::canonicalize(file)?;
        self.state
            .resources
            .insert(id.clone(), ResourceHolder::file(file.to_path_buf(), UNIX_EPOCH, 0));
        self.state.outputs.insert(id.clone());
        self.processed_resources.insert(id.clone());
        Ok(ResourceMetadata::new(self.token, id))
    }

    /// `registerOutput`: declare `file` an output without marking it
    /// processed or binding any inputs to it yet — the aggregator's two-step
    /// declare-then-associate-then-create flow needs a handle before it
    /// knows whether the output will actually be regenerated.
    pub fn declare_output(&mut self, file: &Path) -> Result<Output, CoreError> {
        let id = ResourceId::canonicalize(file)?;
        self.state
            .resources
            .entry(id.clone())
            .or_insert_with(|| ResourceHolder::file(file.to_path_buf(), UNIX_EPOCH, 0));
        self.state.outputs.insert(id.clone());
        Ok(ResourceMetadata::new(self.token, id))
    }

    pub(crate) fn resource_handle(&self, id: &ResourceId) -> Resource {
        ResourceMetadata::new(self.token, id.clone())
    }

    pub fn new_output_stream(&self, output: &Output) -> Result<Box<dyn std::io::Write>, CoreError> {
        self.validate_handle(output)?;
        if !self.state.outputs.contains(output.id()) {
            return Err(CoreError::invalid_argument(format!(
                "{} is not a declared output",
                output.id()
            )));
        }
        self.workspace.new_output_stream(output.id().path())
    }

    /// Record that `output` was produced from `input`.
    pub fn associate(&mut self, input: &Resource, output: &Output) -> Result<(), CoreError> {
        self.validate_handle(input)?;
        self.validate_handle(output)?;
        self.associate_ids(input.id(), output.id())
    }

    pub(crate) fn associate_ids(&mut self, input_id: &ResourceId, output_id: &ResourceId) -> Result<(), CoreError> {
        if !self.state.resources.contains_key(input_id) {
            return Err(CoreError::invalid_argument(format!(
                "{input_id} is not a current-state resource"
            )));
        }
        if !self.state.outputs.contains(output_id) {
            return Err(CoreError::invalid_argument(format!("{output_id} is not a declared output")));
        }
        if let Some(reason) = self.policy.veto_association(input_id, output_id) {
            return Err(CoreError::invalid_argument(reason));
        }
        self.state
            .resource_outputs
            .entry(input_id.clone())
            .or_default()
            .insert(output_id.clone());
        Ok(())
    }

    pub fn get_associated_outputs(&self, input: &Resource) -> Result<Vec<ResourceId>, CoreError> {
        self.validate_handle(input)?;
        Ok(self
            .state
            .resource_outputs
            .get(input.id())
            .map(|outputs| outputs.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Every input id the previous build recorded as feeding `output`,
    /// read back out of `old_state.resource_outputs` (input -> outputs).
    /// Used by the aggregator specialization to notice an input that
    /// vanished entirely rather than merely going unmentioned this build.
    pub(crate) fn previous_inputs_of(&self, output: &ResourceId) -> HashSet<ResourceId> {
        self.old_state
            .resource_outputs
            .iter()
            .filter(|(_, outputs)| outputs.contains(output))
            .map(|(input, _)| input.clone())
            .collect()
    }

    /// Delete a declared output immediately, removing it from the state
    /// that would otherwise be carried forward.
    pub fn delete_output(&mut self, output: &Output) -> Result<(), CoreError> {
        self.validate_handle(output)?;
        let id = output.id().clone();
        if !self.state.outputs.contains(&id) && !self.old_state.outputs.contains(&id) {
            return Err(CoreError::invalid_argument(format!("{id} is not a declared output")));
        }
        self.workspace.delete_file(id.path())?;
        self.state.outputs.remove(&id);
        self.state.resources.remove(&id);
        self.state.resource_attributes.remove(&id);
        self.state.resource_messages.remove(&id);
        for outputs in self.state.resource_outputs.values_mut() {
            outputs.remove(&id);
        }
        self.deleted_resources.insert(id.clone());
        self.processed_resources.insert(id);
        Ok(())
    }

    /// Declare that this build made no changes even though it ran — every
    /// previous-build resource carries forward untouched at commit. Illegal
    /// once any resource has already been processed.
    pub fn mark_skip_execution(&mut self) -> Result<(), CoreError> {
        if !self.processed_resources.is_empty() {
            return Err(CoreError::invalid_state(
                "cannot skip execution after a resource has already been processed",
            ));
        }
        self.skip_execution = true;
        Ok(())
    }

    /// Refresh the recorded holder for every output this build actually
    /// wrote, now that processing has finished and the files are final.
    fn refresh_processed_output_metadata(&mut self) -> Result<(), CoreError> {
        let outputs: Vec<ResourceId> = self.state.outputs.iter().cloned().collect();
        for id in outputs {
            if !self.processed_resources.contains(&id) {
                continue;
            }
            if self.workspace.is_present(id.path())? {
                let (last_modified, length) = self.workspace.stat(id.path())?;
                self.state.resources.insert(
                    id.clone(),
                    ResourceHolder::file(id.path().to_path_buf(), last_modified, length),
                );
            }
        }
        Ok(())
    }

    /// The reconciliation algorithm: carry forward or delete every
    /// previous-build resource not touched this build, refresh
    /// processed-output metadata, replay stale diagnostics, deliver the
    /// final message bundles to `sink` (or raise `BuildFailure` if none is
    /// configured and an error-severity message survives), and return the
    /// reconciled `BuildState` for the caller to persist. A second call
    /// after close is meaningless since `commit` consumes the context by
    /// value — the type system makes idempotence structural rather than a
    /// runtime check.
    pub fn commit(mut self, sink: Option<&mut dyn MessageSink>) -> Result<BuildState, CoreError> {
        if self.skip_execution {
            let final_state = self.old_state.clone();
            for (id, messages) in &final_state.resource_messages {
                for message in messages {
                    self.logger.replay(&id.to_string(), message);
                }
            }
            if let Some(sink) = sink {
                let empty = MessageBundle::new();
                sink.record(&final_state.resource_messages, &empty);
            } else if has_error(&final_state.resource_messages) {
                return Err(CoreError::BuildFailure { summary: summarize_errors(&final_state.resource_messages) });
            }
            return Ok(final_state);
        }

        // Messages already in `state` before carry-over are "new" — added
        // via `addMessage` during this build.
        let new_message_ids: HashSet<ResourceId> = self.state.resource_messages.keys().cloned().collect();

        let old_ids: Vec<ResourceId> = self.old_state.resources.keys().cloned().collect();
        for id in old_ids {
            if self.processed_resources.contains(&id) || self.deleted_resources.contains(&id) {
                continue;
            }

            if !self.state.resources.contains_key(&id) {
                if self.old_state.outputs.contains(&id) {
                    let keep = self.policy.is_output_uptodate(&id) && self.policy.should_carry_over_output(&id);
                    if !keep {
                        self.workspace.delete_file(id.path())?;
                        continue;
                    }
                    if let Some(holder) = self.old_state.resources.get(&id).cloned() {
                        self.state.resources.insert(id.clone(), holder);
                    }
                    self.state.outputs.insert(id.clone());
                } else {
                    // An old input that was not re-registered this build: gone from view.
                    continue;
                }
            }

            if let Some(attrs) = self.old_state.resource_attributes.get(&id) {
                self.state.resource_attributes.entry(id.clone()).or_insert_with(|| attrs.clone());
            }
            if let Some(messages) = self.old_state.resource_messages.get(&id) {
                self.state.resource_messages.entry(id.clone()).or_insert_with(|| messages.clone());
            }
            if let Some(outputs) = self.old_state.resource_outputs.get(&id) {
                self.state.resource_outputs.entry(id.clone()).or_insert_with(|| outputs.clone());
            }
        }

        self.refresh_processed_output_metadata()?;

        let all_messages = self.state.resource_messages.clone();
        let new_messages: MessageBundle = all_messages
            .iter()
            .filter(|(id, _)| new_message_ids.contains(*id))
            .map(|(id, messages)| (id.clone(), messages.clone()))
            .collect();

        for (id, messages) in &all_messages {
            if !new_message_ids.contains(id) {
                for message in messages {
                    self.logger.replay(&id.to_string(), message);
                }
            }
        }

        if let Some(sink) = sink {
            for id in &self.processed_resources {
                sink.clear(id);
            }
            sink.record(&all_messages, &new_messages);
        } else if has_error(&all_messages) {
            return Err(CoreError::BuildFailure { summary: summarize_errors(&all_messages) });
        }

        Ok(self.state)
    }
}

fn has_error(messages: &MessageBundle) -> bool {
    messages.values().any(|ms| ms.iter().any(|m| m.severity >= Severity::Error))
}

fn summarize_errors(messages: &MessageBundle) -> String {
    let mut lines: Vec<String> = Vec::new();
    for (id, ms) in messages {
        for message in ms {
            if message.severity >= Severity::Error {
                lines.push(message.format_with_path(&id.to_string()));
            }
        }
    }
    lines.sort();
    lines.join("\n")
}

fn canonicalize_dir(path: &Path) -> Result<PathBuf, CoreError> {
    if path.is_absolute() {
        Ok(std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf()))
    } else {
        let cwd = std::env::current_dir()?;
        let absolute = cwd.join(path);
        Ok(std::fs::canonicalize(&absolute).unwrap_or(absolute))
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
