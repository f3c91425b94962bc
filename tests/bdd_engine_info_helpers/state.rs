//! Shared behavioural-test state for engine-info scenarios.

use std::time::Duration;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Step result type for engine-info BDD tests.
pub type StepResult<T> = Result<T, String>;

/// How the scripted engine answers the liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeBehaviour {
    /// The probe exits successfully.
    Succeeds,
    /// The probe exits with a failure status.
    Fails,
    /// The probe never finishes on its own.
    Hangs,
}

/// How the scripted engine answers a follow-up query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowUpBehaviour {
    /// The command succeeds and prints the given text.
    Prints(String),
    /// The command exits with a failure status.
    Fails,
    /// The command never finishes on its own.
    Hangs,
}

/// High-level outcome observed after a query.
#[derive(Debug, Clone)]
pub enum QueryOutcome {
    /// The context query returned a name.
    Context(String),
    /// The CPU query returned a count.
    Cpus(u32),
    /// The query failed.
    Failed {
        /// The failure category.
        kind: FailureKind,
        /// Human-readable error message.
        message: String,
    },
}

/// Categorised failure outcomes for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A follow-up exceeded the probe deadline.
    ProbeTimeout,
    /// The context lookup printed nothing.
    NoContextName,
    /// The CPU output was not an integer.
    CpuCountParse,
    /// A follow-up command failed for another reason.
    Command,
    /// Any other failure kind.
    Other,
}

/// Shared scenario state for engine-info behavioural tests.
#[derive(Default, ScenarioState)]
pub struct EngineInfoState {
    /// Deadline applied to the query.
    pub(crate) timeout: Slot<Duration>,

    /// Scripted liveness probe behaviour.
    pub(crate) probe: Slot<ProbeBehaviour>,

    /// Scripted context lookup behaviour.
    pub(crate) context_lookup: Slot<FollowUpBehaviour>,

    /// Scripted CPU query behaviour.
    pub(crate) cpu_query: Slot<FollowUpBehaviour>,

    /// Outcome of the most recent query.
    pub(crate) outcome: Slot<QueryOutcome>,

    /// Arguments named by a probe timeout error.
    pub(crate) timed_out_args: Slot<Vec<String>>,

    /// Argument vectors of every follow-up command issued.
    pub(crate) follow_ups: Slot<Vec<Vec<String>>>,
}

/// Fixture providing fresh state for each engine-info scenario.
#[fixture]
pub fn engine_info_state() -> EngineInfoState {
    let state = EngineInfoState::default();
    state.timeout.set(Duration::from_secs(5));
    state.probe.set(ProbeBehaviour::Succeeds);
    state.follow_ups.set(Vec::new());
    state
}
