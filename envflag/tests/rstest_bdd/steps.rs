//! Step definitions for environment override scenarios.

use crate::fixtures::EnvFlagState;
use anyhow::{Context, Result, anyhow, ensure};
use clap::{Arg, Command};
use envflag::{ClapFlagSet, ErrorHandling, VarSet};
use rstest_bdd_macros::{given, then, when};
use std::collections::BTreeMap;

/// Strips one layer of matching double quotes from a placeholder value.
fn unquote(value: &str) -> String {
    let trimmed = value.trim();
    trimmed
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(trimmed)
        .to_owned()
}

fn push_pair(slot: &rstest_bdd::Slot<Vec<(String, String)>>, first: &str, second: &str) {
    let mut pairs = slot.take().unwrap_or_default();
    pairs.push((unquote(first), unquote(second)));
    slot.set(pairs);
}

#[given("a flag {name} defaulting to {default}")]
fn declare_flag(env_flag_state: &EnvFlagState, name: String, default: String) {
    push_pair(&env_flag_state.flags, &name, &default);
}

#[given("the prefix {prefix}")]
fn set_prefix(env_flag_state: &EnvFlagState, prefix: String) {
    env_flag_state.prefix.set(unquote(&prefix));
}

#[given("the flag {original} is renamed to {substitute}")]
fn rename_flag(env_flag_state: &EnvFlagState, original: String, substitute: String) {
    push_pair(&env_flag_state.renames, &original, &substitute);
}

#[given("the environment variable {key} is {value}")]
fn set_env(env_flag_state: &EnvFlagState, key: String, value: String) {
    push_pair(&env_flag_state.environment, &key, &value);
}

#[when("the command line {args} is parsed")]
fn parse_command_line(env_flag_state: &EnvFlagState, args: String) -> Result<()> {
    let args = unquote(&args);
    let argv: Vec<&str> = args.split_whitespace().collect();
    let name = argv
        .first()
        .copied()
        .ok_or_else(|| anyhow!("command line must name the binary"))?
        .to_owned();

    let declared = env_flag_state.flags.take().unwrap_or_default();
    let command = declared
        .iter()
        .fold(Command::new(name), |command, (flag, default)| {
            command.arg(
                Arg::new(flag.clone())
                    .long(flag.clone())
                    .default_value(default.clone()),
            )
        });
    let mut flags = ClapFlagSet::new(command, ErrorHandling::ContinueOnError);
    flags.parse(argv).context("parse command line")?;

    let environment: BTreeMap<String, String> = env_flag_state
        .environment
        .take()
        .unwrap_or_default()
        .into_iter()
        .collect();
    let mut vars = VarSet::new(&mut flags);
    if let Some(prefix) = env_flag_state.prefix.take() {
        vars.set_prefix(prefix);
    }
    for (original, substitute) in env_flag_state.renames.take().unwrap_or_default() {
        vars.rename_flag(original, substitute);
    }
    vars.set_env_source(environment);
    vars.apply().context("apply environment")?;
    env_flag_state.keys.set(vars.env_keys());

    env_flag_state.matches.set(flags.into_matches());
    Ok(())
}

#[then("the flag {name} is {expected}")]
fn assert_flag(env_flag_state: &EnvFlagState, name: String, expected: String) -> Result<()> {
    let name = unquote(&name);
    let expected = unquote(&expected);
    let actual = env_flag_state
        .matches
        .with_ref(|matches| matches.get_one::<String>(&name).cloned())
        .ok_or_else(|| anyhow!("the command line must be parsed first"))?;
    ensure!(
        actual.as_deref() == Some(expected.as_str()),
        "flag {name} is {actual:?}, want {expected:?}"
    );
    Ok(())
}

#[then("the environment key for {name} is {expected}")]
fn assert_key(env_flag_state: &EnvFlagState, name: String, expected: String) -> Result<()> {
    let name = unquote(&name);
    let expected = unquote(&expected);
    let key = env_flag_state
        .keys
        .with_ref(|keys| {
            keys.iter()
                .find(|(flag, _)| *flag == name)
                .map(|(_, key)| key.clone())
        })
        .flatten()
        .ok_or_else(|| anyhow!("no key recorded for {name}"))?;
    ensure!(key == expected, "key for {name} is {key}, want {expected}");
    Ok(())
}
