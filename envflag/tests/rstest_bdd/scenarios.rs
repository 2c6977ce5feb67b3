//! Binds the feature files to the step registry.

use crate::fixtures::{EnvFlagState, env_flag_state};
use rstest_bdd_macros::scenarios;

scenarios!(
    "tests/features/env_override.feature",
    fixtures = [env_flag_state: EnvFlagState]
);
