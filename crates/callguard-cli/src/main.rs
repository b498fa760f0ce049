//! Contract checking CLI.
//!
//! Provides the `callguard` binary for checking JSON values against JSON
//! contract declarations (see `callguard_check::decl` for the format):
//!
//! - `check`: one contract against one value
//! - `call`: a whole spec against an argument list and optional result,
//!   run through the same interceptor guarded code uses; honours
//!   `CALLGUARD_DISABLED` and `CALLGUARD_SKIP_RESULTS`
//! - `lint`: build a spec and report declaration errors
//!
//! Every JSON argument may be given inline or as `@path` to read a file.
//! Exit codes: 0 = pass, 1 = contract violation, 2 = malformed input.

use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use callguard_check::{ContractDecl, ContractViolation, GuardConfig, Interceptor, SpecDecl};
use callguard_core::{MethodRef, Value};

/// Runtime contract checking tools.
#[derive(Parser)]
#[command(name = "callguard", about = "Runtime contract checking tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check a single value against a contract.
    Check {
        /// Contract declaration (JSON or @file).
        #[arg(short, long)]
        contract: String,

        /// Value to check (JSON or @file).
        #[arg(short, long)]
        value: String,
    },

    /// Run an argument list (and optional result) through a spec.
    Call {
        /// Spec declaration (JSON or @file).
        #[arg(short, long)]
        spec: String,

        /// JSON array of call arguments (JSON or @file).
        #[arg(short, long, default_value = "[]")]
        args: String,

        /// Value the guarded callable returns (JSON or @file).
        #[arg(short, long)]
        result: Option<String>,
    },

    /// Validate a spec declaration.
    Lint {
        /// Spec declaration (JSON or @file).
        #[arg(short, long)]
        spec: String,
    },
}

/// Machine-readable outcome printed on stdout.
#[derive(Serialize)]
struct Report {
    passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failing_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    bindings: Vec<BindingReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    returned: Option<serde_json::Value>,
}

/// Matching outcome of one bound argument slot.
#[derive(Serialize, Debug, PartialEq)]
struct BindingReport {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    contract: Option<String>,
    matched: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check { contract, value } => run_check(&contract, &value),
        Commands::Call { spec, args, result } => run_call(&spec, &args, result.as_deref()),
        Commands::Lint { spec } => run_lint(&spec),
    };
    process::exit(exit_code);
}

/// Reads an inline JSON argument or the file it names with `@path`.
fn load_json(raw: &str) -> Result<serde_json::Value, String> {
    let text = match raw.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read '{}': {}", path, e))?,
        None => raw.to_string(),
    };
    serde_json::from_str(&text).map_err(|e| format!("invalid JSON: {}", e))
}

fn parse<T: serde::de::DeserializeOwned>(raw: &str, what: &str) -> Result<T, String> {
    let json = load_json(raw)?;
    serde_json::from_value(json).map_err(|e| format!("invalid {}: {}", what, e))
}

fn print_report(report: &Report) -> i32 {
    match serde_json::to_string_pretty(report) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error: failed to render report: {}", e);
            return 2;
        }
    }
    if report.passed {
        0
    } else {
        1
    }
}

/// Execute the check subcommand.
fn run_check(contract: &str, value: &str) -> i32 {
    let contract = match parse::<ContractDecl>(contract, "contract")
        .and_then(|d| d.to_contract().map_err(|e| e.to_string()))
    {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };
    let value = match load_json(value) {
        Ok(json) => Value::from_json(&json),
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let passed = callguard_check::matches_value(&contract, &value);
    tracing::debug!(contract = %contract, value = %value, passed, "checked value");
    print_report(&Report {
        passed,
        target: None,
        failing_index: None,
        message: (!passed).then(|| format!("expected {}, got {}", contract, value)),
        bindings: Vec::new(),
        returned: None,
    })
}

/// Execute the call subcommand.
///
/// The guarded callable ignores its arguments and returns `result` (or
/// `nil`), so the result contract is exercised too.
fn run_call(spec: &str, args: &str, result: Option<&str>) -> i32 {
    let decl = match parse::<SpecDecl>(spec, "spec") {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };
    let spec = match decl.to_spec() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 2;
        }
    };
    let args = match load_json(args) {
        Ok(serde_json::Value::Array(items)) => items.iter().map(Value::from_json).collect::<Vec<_>>(),
        Ok(_) => {
            eprintln!("Error: --args must be a JSON array");
            return 2;
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };
    let returned = match result.map(load_json).transpose() {
        Ok(json) => json.as_ref().map(Value::from_json).unwrap_or(Value::Nil),
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };

    let target = decl
        .target
        .unwrap_or_else(|| MethodRef::instance("Object", "call"));
    let guard = Interceptor::new(target, spec, move |_| returned.clone())
        .with_config(GuardConfig::from_env());
    print_report(&call_report(&guard, &args))
}

/// Runs `args` through `guard` and records the outcome of every bound slot.
fn call_report(guard: &Interceptor, args: &[Value]) -> Report {
    let bindings = guard
        .spec()
        .bind(args)
        .iter()
        .map(|b| BindingReport {
            index: b.position,
            contract: b.contract.map(|c| c.to_string()),
            matched: b.matches(),
        })
        .collect();

    match guard.call(args) {
        Ok(returned) => Report {
            passed: true,
            target: Some(guard.target().to_string()),
            failing_index: None,
            message: None,
            bindings,
            returned: returned.as_ref().and_then(returned_json),
        },
        Err(violation) => violation_report(&violation, bindings),
    }
}

fn returned_json(value: &Value) -> Option<serde_json::Value> {
    match value.to_json() {
        Ok(json) => Some(json),
        Err(e) => {
            tracing::warn!(error = %e, "returned value left out of report");
            None
        }
    }
}

fn violation_report(violation: &ContractViolation, bindings: Vec<BindingReport>) -> Report {
    Report {
        passed: false,
        target: Some(violation.target().to_string()),
        failing_index: violation.index(),
        message: Some(violation.to_string()),
        bindings,
        returned: None,
    }
}

/// Execute the lint subcommand.
fn run_lint(spec: &str) -> i32 {
    let decl = match parse::<SpecDecl>(spec, "spec") {
        Ok(d) => d,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return 2;
        }
    };
    match decl.to_spec() {
        Ok(spec) => {
            println!("ok: {}", spec);
            0
        }
        Err(e) => {
            println!("declaration error: {}", e);
            1
        }
    }
}
