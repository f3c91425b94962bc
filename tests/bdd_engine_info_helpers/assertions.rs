//! Then-step assertions for engine-info behavioural scenarios.

use engine_info::engine::{EngineFlavor, context_name_args, cpu_count_args};
use rstest_bdd_macros::then;

use super::state::{EngineInfoState, FailureKind, QueryOutcome, StepResult};

#[then("the context name is empty")]
fn context_name_is_empty(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_context_name(engine_info_state, "")
}

#[then("the resolved context name is {expected}")]
fn context_name_is(engine_info_state: &EngineInfoState, expected: String) -> StepResult<()> {
    assert_context_name(engine_info_state, &expected)
}

#[then("the context lookup was not issued")]
fn context_lookup_not_issued(engine_info_state: &EngineInfoState) -> StepResult<()> {
    let follow_ups = issued_follow_ups(engine_info_state)?;
    if follow_ups.contains(&context_name_args()) {
        return Err(String::from(
            "context lookup should not run after a successful probe",
        ));
    }
    Ok(())
}

#[then("the reported cpu count is {expected}")]
fn cpu_count_is(engine_info_state: &EngineInfoState, expected: u32) -> StepResult<()> {
    match outcome(engine_info_state)? {
        QueryOutcome::Cpus(cpus) if cpus == expected => Ok(()),
        other => Err(format!("expected {expected} cpus, got {other:?}")),
    }
}

#[then("the podman cpu format was used")]
fn podman_cpu_format_used(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_only_follow_up(engine_info_state, &cpu_count_args(EngineFlavor::Podman))
}

#[then("the docker cpu format was used")]
fn docker_cpu_format_used(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_only_follow_up(engine_info_state, &cpu_count_args(EngineFlavor::Docker))
}

#[then("the query fails with a probe timeout")]
fn query_fails_with_probe_timeout(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_failure_kind(engine_info_state, FailureKind::ProbeTimeout)
}

#[then("the query fails with a missing context name error")]
fn query_fails_with_missing_context_name(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_failure_kind(engine_info_state, FailureKind::NoContextName)
}

#[then("the query fails with a cpu count parse error")]
fn query_fails_with_cpu_count_parse_error(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_failure_kind(engine_info_state, FailureKind::CpuCountParse)
}

#[then("the query fails with a command error")]
fn query_fails_with_command_error(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_failure_kind(engine_info_state, FailureKind::Command)
}

#[then("the timed-out command is the context lookup")]
fn timed_out_command_is_context_lookup(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_timed_out_args(engine_info_state, &context_name_args())
}

#[then("the timed-out command is the podman cpu query")]
fn timed_out_command_is_podman_cpu_query(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_timed_out_args(engine_info_state, &cpu_count_args(EngineFlavor::Podman))
}

#[then("the timed-out command is the docker cpu query")]
fn timed_out_command_is_docker_cpu_query(engine_info_state: &EngineInfoState) -> StepResult<()> {
    assert_timed_out_args(engine_info_state, &cpu_count_args(EngineFlavor::Docker))
}

fn outcome(engine_info_state: &EngineInfoState) -> StepResult<QueryOutcome> {
    engine_info_state
        .outcome
        .get()
        .ok_or_else(|| String::from("query outcome should be set"))
}

fn issued_follow_ups(engine_info_state: &EngineInfoState) -> StepResult<Vec<Vec<String>>> {
    engine_info_state
        .follow_ups
        .get()
        .ok_or_else(|| String::from("issued follow-ups should be captured"))
}

fn assert_context_name(engine_info_state: &EngineInfoState, expected: &str) -> StepResult<()> {
    match outcome(engine_info_state)? {
        QueryOutcome::Context(name) if name == expected => Ok(()),
        other => Err(format!("expected context name {expected:?}, got {other:?}")),
    }
}

fn assert_only_follow_up(engine_info_state: &EngineInfoState, expected: &[String]) -> StepResult<()> {
    let follow_ups = issued_follow_ups(engine_info_state)?;
    if follow_ups.len() == 1 && follow_ups.first().map(Vec::as_slice) == Some(expected) {
        return Ok(());
    }
    Err(format!("expected only {expected:?} to be issued, got {follow_ups:?}"))
}

fn assert_failure_kind(
    engine_info_state: &EngineInfoState,
    expected_kind: FailureKind,
) -> StepResult<()> {
    match outcome(engine_info_state)? {
        QueryOutcome::Failed { kind, .. } if kind == expected_kind => Ok(()),
        QueryOutcome::Failed { kind, message } => Err(format!(
            "expected failure kind {expected_kind:?}, got {kind:?}: {message}"
        )),
        other => Err(format!("expected failure, got {other:?}")),
    }
}

fn assert_timed_out_args(engine_info_state: &EngineInfoState, expected: &[String]) -> StepResult<()> {
    let args = engine_info_state
        .timed_out_args
        .get()
        .ok_or_else(|| String::from("probe timeout should name the attempted command"))?;
    if args == expected {
        return Ok(());
    }
    Err(format!("expected timeout for {expected:?}, got {args:?}"))
}
