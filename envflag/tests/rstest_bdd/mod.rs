//! `rstest-bdd` scenarios for environment overrides.
//!
//! The feature files live in `tests/features`; this entrypoint wires their
//! steps and fixtures into the stock `cargo test` harness.

mod fixtures;
mod scenarios;
mod steps;
