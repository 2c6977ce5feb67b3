//! Shared fixtures for the behavioural scenarios.

use clap::ArgMatches;
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Flags, environment and outcome shared between the steps of a scenario.
#[derive(Debug, Default, ScenarioState)]
pub struct EnvFlagState {
    /// Declared flags as `(name, default)` pairs.
    pub flags: Slot<Vec<(String, String)>>,
    pub prefix: Slot<String>,
    /// Renames as `(original, substitute)` pairs, in declaration order.
    pub renames: Slot<Vec<(String, String)>>,
    pub environment: Slot<Vec<(String, String)>>,
    pub matches: Slot<ArgMatches>,
    /// Keys reported by the variable set for each flag.
    pub keys: Slot<Vec<(String, String)>>,
}

/// Creates an empty scenario state.
#[fixture]
pub fn env_flag_state() -> EnvFlagState {
    EnvFlagState::default()
}
