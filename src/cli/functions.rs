//! Compute function commands

use colored::Colorize;
use serde::Serialize;
use tabled::Tabled;

use crate::cache::{ResourceKind, Scope};
use crate::cli::{CommandContext, OutputFormat};
use crate::error::{Error, Result};
use crate::output::{json, table};
use crate::provider::{FunctionSummary, InvocationOutcome, ResourceRecords};

/// Display format for functions in table view
#[derive(Tabled, Serialize)]
struct FunctionDisplay {
    #[tabled(rename = "NAME")]
    name: String,

    #[tabled(rename = "RUNTIME")]
    runtime: String,

    #[tabled(rename = "MEMORY")]
    memory: String,

    #[tabled(rename = "TIMEOUT")]
    timeout: String,

    #[tabled(rename = "STATUS")]
    status: String,
}

impl From<FunctionSummary> for FunctionDisplay {
    fn from(f: FunctionSummary) -> Self {
        Self {
            name: f.name,
            runtime: f.runtime,
            memory: format!("{}MB", f.memory_mb),
            timeout: format!("{}s", f.timeout_secs),
            status: f.status,
        }
    }
}

/// Run the functions list command
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let records = ctx.resolve(ResourceKind::Functions, Scope::list()).await?;
    let functions = match records {
        ResourceRecords::FunctionList(functions) => functions,
        other => return Err(Error::Other(format!("unexpected records: {other:?}"))),
    };

    match ctx.format {
        OutputFormat::Table => {
            let rows: Vec<FunctionDisplay> = functions.into_iter().map(Into::into).collect();
            println!("{}", table::format_table(&rows));
        }
        OutputFormat::Json => {
            println!("{}", json::format_json(&functions)?);
        }
    }

    Ok(())
}

/// Run the functions get command
pub async fn get(ctx: &CommandContext, name: &str) -> Result<()> {
    let records = ctx
        .resolve(ResourceKind::Functions, Scope::named(name))
        .await?;
    let function = match records {
        ResourceRecords::Function(function) => function,
        other => return Err(Error::Other(format!("unexpected records: {other:?}"))),
    };

    match ctx.format {
        OutputFormat::Table => print_function_detail(&function),
        OutputFormat::Json => println!("{}", json::format_json(&function)?),
    }

    Ok(())
}

/// Run the functions invoke command
pub async fn invoke(ctx: &CommandContext, name: &str, payload: &str) -> Result<()> {
    let scope = Scope::invoke(name, payload.as_bytes().to_vec());
    let records = ctx.resolve(ResourceKind::Functions, scope).await?;
    let outcome = match records {
        ResourceRecords::Invocation(outcome) => outcome,
        other => return Err(Error::Other(format!("unexpected records: {other:?}"))),
    };

    match ctx.format {
        OutputFormat::Table => print_invocation(&outcome),
        OutputFormat::Json => println!("{}", json::format_json(&outcome)?),
    }

    Ok(())
}

fn print_function_detail(function: &FunctionSummary) {
    let status = if function.status == "Active" {
        function.status.green().to_string()
    } else {
        function.status.yellow().to_string()
    };

    let mut pairs = vec![
        ("Name", function.name.clone()),
        ("Runtime", function.runtime.clone()),
        ("Handler", function.handler.clone()),
        ("Memory", format!("{} MB", function.memory_mb)),
        ("Timeout", format!("{} seconds", function.timeout_secs)),
        ("Status", status),
    ];
    if !function.description.is_empty() {
        pairs.push(("Description", function.description.clone()));
    }
    if let Some(modified) = function.last_modified {
        pairs.push(("Last Modified", modified.format("%Y-%m-%d %H:%M:%S").to_string()));
    }

    println!("{}", table::format_detail(&pairs));

    if !function.environment.is_empty() {
        println!("\n{}", "Environment Variables:".bold());
        let mut vars: Vec<_> = function.environment.iter().collect();
        vars.sort_by_key(|(k, _)| k.as_str());
        for (key, value) in vars {
            println!("  {key} = {value}");
        }
    }
}

fn print_invocation(outcome: &InvocationOutcome) {
    let status = if outcome.function_error.is_none() && outcome.status_code < 300 {
        outcome.status_code.to_string().green().to_string()
    } else {
        outcome.status_code.to_string().red().to_string()
    };
    println!("Status: {status}");

    if let Some(err) = &outcome.function_error {
        println!("Function error: {}", err.red());
    }

    // Pretty-print the payload when it is JSON, else show it raw
    let body = String::from_utf8_lossy(&outcome.payload);
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(value) => println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default()),
        Err(_) => println!("{body}"),
    }

    if let Some(log_tail) = &outcome.log_tail {
        println!("\n{}", "Log tail:".bold());
        println!("{log_tail}");
    }
}
