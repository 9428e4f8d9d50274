//! # Explain Subcommand
//!
//! Prints the normalized form of a rule source, for catalog authors
//! checking how a loosely-written rule will be read.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use serde_json::Value;

use ppass_rules::RuleNode;

/// Arguments for the `ppass explain` subcommand.
#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Rule source: JSON if it parses, otherwise a string rule.
    #[arg(long)]
    pub rule: String,
}

/// A rule source next to its normalized tree.
#[derive(Debug, Serialize)]
pub struct Explanation {
    /// The rule as interpreted from the argument.
    pub source: Value,
    /// The normalized rule.
    pub normalized: RuleNode,
    /// Nesting depth of the normalized rule.
    pub depth: usize,
}

impl Explanation {
    /// Normalize a raw `--rule` argument.
    pub fn of(raw: &str) -> Self {
        let source = crate::parse_rule_arg(raw);
        let normalized = RuleNode::from_source(&source);
        Self {
            depth: normalized.depth(),
            source,
            normalized,
        }
    }
}

/// Execute the explain subcommand.
pub fn run_explain(args: &ExplainArgs) -> Result<u8> {
    let explanation = Explanation::of(&args.rule);
    let output = serde_json::to_string_pretty(&explanation).context("serializing explanation")?;
    println!("{output}");
    Ok(0)
}
