//! # Eval Subcommand
//!
//! Evaluates a single rule against attributes taken from a file or from a
//! stored project, and prints `true` or `false`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ppass_core::ProjectId;
use ppass_rules::{AttributeMap, RuleNode};

use crate::config::CliConfig;

/// Arguments for the `ppass eval` subcommand.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Rule source: JSON if it parses, otherwise a string rule.
    #[arg(long)]
    pub rule: String,

    /// JSON or YAML file holding the attribute map.
    #[arg(long, conflicts_with = "project")]
    pub values: Option<PathBuf>,

    /// Evaluate against a stored project's attributes.
    #[arg(long)]
    pub project: Option<String>,
}

/// Execute the eval subcommand.
pub fn run_eval(args: &EvalArgs, config: &CliConfig) -> Result<u8> {
    let attributes = attributes_for(args, config)?;
    let outcome = evaluate_rule_arg(&args.rule, &attributes);
    println!("{outcome}");
    Ok(0)
}

/// Normalize and evaluate a raw `--rule` argument.
pub fn evaluate_rule_arg(raw: &str, attributes: &AttributeMap) -> bool {
    let node = RuleNode::from_source(&crate::parse_rule_arg(raw));
    let outcome = node.evaluate(attributes);
    tracing::debug!(rule = raw, outcome, "evaluated rule");
    outcome
}

fn attributes_for(args: &EvalArgs, config: &CliConfig) -> Result<AttributeMap> {
    if let Some(path) = &args.values {
        return crate::load_attributes(path);
    }
    match &args.project {
        Some(raw) => {
            let project_id = ProjectId::new(raw).context("invalid --project")?;
            let snapshot = crate::load_snapshot(&config.snapshot_path)?;
            Ok(snapshot.attributes_for(&project_id).into_owned())
        }
        None => Ok(AttributeMap::new()),
    }
}
