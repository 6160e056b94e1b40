// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ibx_core::{AttributeValue, RecordingLogger, ResourceId};
use std::path::Path;

use crate::basic::BasicPolicy;
use crate::test_support::FakeWorkspace;

type TestCore = BuildContextCore<FakeWorkspace, RecordingLogger, BasicPolicy>;

fn fresh(workspace: FakeWorkspace) -> TestCore {
    BuildContextCore::new(
        workspace,
        None,
        None,
        Configuration::default(),
        RecordingLogger::new(),
        BasicPolicy,
    )
    .expect("construct")
}

fn resumed(workspace: FakeWorkspace, old_state: BuildState, config: Configuration) -> TestCore {
    BuildContextCore::new(workspace, Some(old_state), None, config, RecordingLogger::new(), BasicPolicy)
        .expect("construct")
}

fn id(path: &str) -> ResourceId {
    ResourceId::canonicalize(Path::new(path)).expect("canonicalize")
}

#[test]
fn first_build_is_not_escalated_with_empty_previous_configuration() {
    // An empty previous configuration still forces escalation per
    // `Configuration::changed_from`'s "previous is empty" clause, matching
    // `spec.md`'s configurationChanged rule for a brand-new state file.
    let core = fresh(FakeWorkspace::normal());
    assert!(core.is_escalated());
}

#[test]
fn no_configuration_change_does_not_escalate() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/src/a.txt", b"abc".to_vec());
    let config: Configuration = [("v".to_string(), AttributeValue::from("1"))].into_iter().collect();

    let mut first = resumed(workspace.clone(), BuildState::empty(config.clone()), config.clone());
    let inputs = first.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    for r in &inputs {
        first.process_resource(r).expect("process");
    }
    let committed = first.commit(None).expect("commit");

    let second = resumed(workspace, committed, config);
    assert!(!second.is_escalated());
}

#[test]
fn configuration_change_escalates_and_marks_known_inputs_modified() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/src/a.txt", b"abc".to_vec());
    let old_config: Configuration = [("v".to_string(), AttributeValue::from("1"))].into_iter().collect();
    let new_config: Configuration = [("v".to_string(), AttributeValue::from("2"))].into_iter().collect();

    let mut first = resumed(workspace.clone(), BuildState::empty(old_config.clone()), old_config);
    let inputs = first.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    for r in &inputs {
        first.process_resource(r).expect("process");
    }
    let committed = first.commit(None).expect("commit");

    let mut second = resumed(workspace, committed, new_config);
    assert!(second.is_escalated());
    let a = id("/p/src/a.txt");
    assert_eq!(second.get_resource_status(&a).expect("status"), ResourceStatus::Modified);
    let inputs = second.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    assert_eq!(inputs.len(), 1);
}

#[test]
fn new_resource_not_in_previous_state_is_new() {
    let core = fresh(FakeWorkspace::normal());
    assert_eq!(core.get_resource_status(&id("/p/a.txt")).expect("status"), ResourceStatus::New);
}

#[test]
fn deleted_resource_reports_removed_even_if_escalated() {
    let mut core = fresh(FakeWorkspace::normal());
    let a = id("/p/a.txt");
    core.deleted_resources.insert(a.clone());
    assert_eq!(core.get_resource_status(&a).expect("status"), ResourceStatus::Removed);
}

#[test]
fn process_resource_rejects_handle_from_a_different_context() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/a.txt", b"x".to_vec());
    let mut a_ctx = fresh(workspace.clone());
    let mut b_ctx = fresh(workspace);

    let handle_from_a = a_ctx.register_input(Path::new("/p/a.txt")).expect("register");
    let result = b_ctx.process_resource(&handle_from_a);
    assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
}

#[test]
fn process_resource_clears_prior_attributes_messages_and_associations_in_current_state() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/a.txt", b"x".to_vec());
    let mut core = fresh(workspace);
    let input = core.register_input(Path::new("/p/a.txt")).expect("register");
    core.set_resource_attribute(input.id(), "k", AttributeValue::from("v")).expect("set");
    core.add_message(input.id(), 1, 1, "note", Severity::Info, None);

    core.process_resource(&input).expect("process");

    assert!(core.state.resource_attributes.get(input.id()).is_none());
    assert!(core.state.resource_messages.get(input.id()).is_none());
}

#[test]
fn registering_input_not_present_in_workspace_fails() {
    let mut core = fresh(FakeWorkspace::normal());
    let result = core.register_input(Path::new("/p/missing.txt"));
    assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
}

#[test]
fn is_processing_required_false_on_second_build_with_no_changes() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/src/a.txt", b"abc".to_vec());
    let config: Configuration = [("v".to_string(), AttributeValue::from("1"))].into_iter().collect();

    let mut first = resumed(workspace.clone(), BuildState::empty(config.clone()), config.clone());
    let inputs = first.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    for r in &inputs {
        first.process_resource(r).expect("process");
    }
    let committed = first.commit(None).expect("commit");

    let mut second = resumed(workspace, committed, config);
    second.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    assert!(!second.is_processing_required().expect("check"));
}

#[test]
fn set_resource_attribute_returns_previous_value() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/a.txt", b"x".to_vec());
    let a = id("/p/a.txt");

    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(a.clone(), ResourceHolder::file(PathBuf::from("/p/a.txt"), UNIX_EPOCH, 1));
    old_state
        .resource_attributes
        .entry(a.clone())
        .or_default()
        .insert("k".to_string(), AttributeValue::from("old"));

    let mut core = resumed(workspace, old_state, Configuration::default());
    let previous = core.set_resource_attribute(&a, "k", AttributeValue::from("new")).expect("set");
    assert_eq!(previous, Some(AttributeValue::from("old")));

    let fresh_key = core.set_resource_attribute(&a, "other", AttributeValue::from(1i64)).expect("set");
    assert_eq!(fresh_key, None);
}

#[test]
fn add_message_logs_immediately_and_records_for_replay() {
    let mut core = fresh(FakeWorkspace::normal());
    let a = id("/p/a.txt");
    core.add_message(&a, 4, 2, "oops", Severity::Error, None);
    assert!(core.logger.contains("oops"));
    assert_eq!(core.state.resource_messages.get(&a).expect("messages").len(), 1);
}

#[test]
fn process_output_replaces_existing_holder_without_error() {
    let workspace = FakeWorkspace::normal();
    let mut core = fresh(workspace);
    let out1 = core.process_output(Path::new("/p/out.bin")).expect("first");
    let out2 = core.process_output(Path::new("/p/out.bin")).expect("second");
    assert_eq!(out1.id(), out2.id());
}

#[test]
fn associate_requires_both_handles_from_this_context() {
    let workspace_a = FakeWorkspace::normal();
    workspace_a.write_file("/p/a.txt", b"x".to_vec());
    let mut a_ctx = fresh(workspace_a);
    let input = a_ctx.register_input(Path::new("/p/a.txt")).expect("register");
    let output = a_ctx.process_output(Path::new("/p/out.bin")).expect("output");
    assert!(a_ctx.associate(&input, &output).is_ok());

    let other = fresh(FakeWorkspace::normal());
    let foreign_output = ResourceMetadata::new(other.token, id("/p/out2.bin"));
    let result = a_ctx.associate(&input, &foreign_output);
    assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
}

#[test]
fn delete_output_requires_known_output() {
    let mut core = fresh(FakeWorkspace::normal());
    let unrelated = ResourceMetadata::new(core.token, id("/p/not-an-output.bin"));
    let result = core.delete_output(&unrelated);
    assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
}

#[test]
fn delete_output_accepts_an_output_known_only_from_previous_state() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/out.bin", b"stale".to_vec());
    let out = id("/p/out.bin");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(out.clone(), ResourceHolder::file(PathBuf::from("/p/out.bin"), UNIX_EPOCH, 5));
    old_state.outputs.insert(out.clone());

    let mut core = resumed(workspace.clone(), old_state, Configuration::default());
    let handle = ResourceMetadata::new(core.token, out.clone());
    core.delete_output(&handle).expect("delete known only from old_state.outputs");
    assert!(workspace.read_file(Path::new("/p/out.bin")).is_none());
    assert!(core.deleted_resources.contains(&out));
}

#[test]
fn delete_output_removes_file_and_marks_processed_and_deleted() {
    let workspace = FakeWorkspace::normal();
    let mut core = fresh(workspace.clone());
    let output = core.process_output(Path::new("/p/out.bin")).expect("output");
    workspace.write_file("/p/out.bin", b"data".to_vec());

    core.delete_output(&output).expect("delete");
    assert!(workspace.read_file(Path::new("/p/out.bin")).is_none());
    assert!(core.processed_resources.contains(output.id()));
    assert!(core.deleted_resources.contains(output.id()));
    assert!(!core.state.outputs.contains(output.id()));
}

#[test]
fn mark_skip_execution_fails_after_a_resource_was_processed() {
    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/a.txt", b"x".to_vec());
    let mut core = fresh(workspace);
    let input = core.register_input(Path::new("/p/a.txt")).expect("register");
    core.process_resource(&input).expect("process");
    let result = core.mark_skip_execution();
    assert!(matches!(result, Err(CoreError::InvalidState(_))));
}

#[test]
fn mark_skip_execution_carries_everything_forward_verbatim() {
    let workspace = FakeWorkspace::normal();
    let a = id("/p/a.txt");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(a.clone(), ResourceHolder::file(PathBuf::from("/p/a.txt"), UNIX_EPOCH, 1));
    old_state.resource_messages.entry(a.clone()).or_default().push(Message {
        line: 1,
        column: 1,
        text: "stale warning".into(),
        severity: Severity::Warning,
        cause: None,
    });

    let mut core = resumed(workspace, old_state.clone(), Configuration::default());
    core.mark_skip_execution().expect("skip");
    let final_state = core.commit(None).expect("commit");
    assert_eq!(final_state.resources.len(), old_state.resources.len());
    assert_eq!(final_state.resource_messages.len(), old_state.resource_messages.len());
}

#[test]
fn commit_carries_over_unprocessed_previous_resource() {
    let workspace = FakeWorkspace::normal();
    let b = id("/p/src/b.txt");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(b.clone(), ResourceHolder::file(PathBuf::from("/p/src/b.txt"), UNIX_EPOCH, 4));

    let core = resumed(workspace, old_state, Configuration::default());
    let final_state = core.commit(None).expect("commit");
    assert!(final_state.resources.contains_key(&b));
}

#[test]
fn commit_deletes_orphaned_output_whose_policy_refuses_carry_over() {
    struct AlwaysRefuse;
    impl ContextPolicy for AlwaysRefuse {
        fn is_output_uptodate(&self, _output: &ResourceId) -> bool {
            true
        }
        fn should_carry_over_output(&self, _output: &ResourceId) -> bool {
            false
        }
    }

    let workspace = FakeWorkspace::normal();
    workspace.write_file("/p/out.bin", b"stale".to_vec());
    let out = id("/p/out.bin");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(out.clone(), ResourceHolder::file(PathBuf::from("/p/out.bin"), UNIX_EPOCH, 5));
    old_state.outputs.insert(out.clone());

    let core: BuildContextCore<FakeWorkspace, RecordingLogger, AlwaysRefuse> = BuildContextCore::new(
        workspace.clone(),
        Some(old_state),
        None,
        Configuration::default(),
        RecordingLogger::new(),
        AlwaysRefuse,
    )
    .expect("construct");

    let final_state = core.commit(None).expect("commit");
    assert!(!final_state.resources.contains_key(&out));
    assert!(workspace.read_file(Path::new("/p/out.bin")).is_none());
}

#[test]
fn commit_replays_stale_messages_not_touched_this_build() {
    let workspace = FakeWorkspace::normal();
    let a = id("/p/a.txt");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state.resources.insert(a.clone(), ResourceHolder::file(PathBuf::from("/p/a.txt"), UNIX_EPOCH, 1));
    old_state.resource_messages.entry(a.clone()).or_default().push(Message {
        line: 2,
        column: 3,
        text: "carried over warning".into(),
        severity: Severity::Warning,
        cause: None,
    });

    let core = resumed(workspace, old_state, Configuration::default());
    assert!(!core.logger.contains("carried over warning"));
    // SAFETY: RecordingLogger is cloned cheaply (Arc-backed) so we can
    // inspect it after `commit` consumes `core` by value.
    let logger = core.logger.clone();
    core.commit(None).expect("commit");
    assert!(logger.contains("carried over warning"));
}

#[test]
fn commit_raises_build_failure_when_no_sink_and_an_error_message_exists() {
    let mut core = fresh(FakeWorkspace::normal());
    let a = id("/p/a.txt");
    core.add_message(&a, 1, 1, "boom", Severity::Error, None);
    // `add_message` doesn't require `a` to be a tracked resource for
    // logging, but commit's summary only needs the message bundle.
    let result = core.commit(None);
    assert!(matches!(result, Err(CoreError::BuildFailure { .. })));
}

#[test]
fn commit_does_not_fail_when_a_sink_is_configured() {
    struct NullSink;
    impl MessageSink for NullSink {
        fn clear(&mut self, _id: &ResourceId) {}
        fn record(&mut self, _all: &MessageBundle, _new: &MessageBundle) {}
    }

    let mut core = fresh(FakeWorkspace::normal());
    let a = id("/p/a.txt");
    core.add_message(&a, 1, 1, "boom", Severity::Error, None);
    let mut sink = NullSink;
    assert!(core.commit(Some(&mut sink)).is_ok());
}

#[test]
fn suppressed_mode_registers_from_previous_state_without_walking() {
    let workspace = FakeWorkspace::suppressed();
    let a = id("/p/src/a.txt");
    let mut old_state = BuildState::empty(Configuration::default());
    old_state
        .resources
        .insert(a.clone(), ResourceHolder::file(PathBuf::from("/p/src/a.txt"), UNIX_EPOCH, 3));

    let mut core = resumed(workspace, old_state, Configuration::default());
    assert!(!core.is_escalated());
    let inputs = core.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].id(), &a);
}

#[test]
fn delta_mode_reregisters_unvisited_previously_known_inputs() {
    let workspace = FakeWorkspace::delta();
    workspace.write_file("/p/src/a.txt", b"abc".to_vec());
    let config = Configuration::default();

    // First build: NORMAL-equivalent registration happens via the fake's
    // initial dirty set (every written file counts as dirty pre-`begin_build`).
    let mut first = resumed(workspace.clone(), BuildState::empty(config.clone()), config.clone());
    let inputs = first.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    for r in &inputs {
        first.process_resource(r).expect("process");
    }
    let committed = first.commit(None).expect("commit");
    workspace.begin_build();

    // Second build: nothing changed, so DELTA's walk visits no files, but
    // `a.txt` must still appear as a registered candidate for status checks.
    let mut second = resumed(workspace, committed, config);
    let inputs = second.register_inputs(Path::new("/p/src"), ["**/*.txt"], Vec::<&str>::new()).expect("walk");
    assert_eq!(inputs.len(), 1);
    assert_eq!(second.get_resource_status(inputs[0].id()).expect("status"), ResourceStatus::Unmodified);
}
