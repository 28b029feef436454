//! `saplo` - command-line access to the Saplo API.
//!
//! ```text
//! saplo resource <resource> <operation> [PARAMS_JSON] [--raw]
//! saplo call <rpc.method> [PARAMS_JSON] [--raw]
//! saplo operations [resource]
//! ```
//!
//! Credentials come from `SAPLO_API_KEY`/`SAPLO_SECRET_KEY` or the config
//! file; see `saplo::config`.

use std::process::ExitCode;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saplo::config::{ClientConfig, Credentials};
use saplo::resources::{self, operations_for};
use saplo::{SaploClient, TrimPolicy};

const RESOURCES: [&str; 4] = ["account", "collection", "group", "text"];

#[derive(Parser, Debug)]
#[command(name = "saplo")]
#[command(about = "Command-line access to the Saplo text analysis API")]
#[command(version)]
struct Cli {
    /// Print the full response envelope instead of its result
    #[arg(long, global = true)]
    raw: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// Call a facade operation, e.g. `resource collection create '{"name":"C1"}'`
    Resource {
        /// account, collection, group or text
        resource: String,

        /// Operation name as listed by `saplo operations`
        operation: String,

        /// Named parameters as a JSON object
        #[arg(value_parser = parse_params, default_value = "{}")]
        params: Value,
    },

    /// Call a raw JSON-RPC method, e.g. `call group.listTexts '{"group_id":3}'`
    Call {
        method: String,

        /// Named parameters as a JSON object
        #[arg(value_parser = parse_params, default_value = "{}")]
        params: Value,
    },

    /// List the operations of one or all resources
    Operations {
        resource: Option<String>,
    },
}

fn parse_params(text: &str) -> std::result::Result<Value, String> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON params: {}", e))?;
    if !value.is_object() {
        return Err(format!("params must be a JSON object, got: {}", text));
    }
    Ok(value)
}

fn connect() -> Result<SaploClient> {
    let config = ClientConfig::load().context("Failed to load configuration")?;
    let credentials = Credentials::load().context("Failed to load credentials")?;

    tracing::info!("Authenticating against {}", config.endpoint);
    let client = SaploClient::builder(credentials.api_key(), credentials.secret_key())
        .config(config)
        .connect()?;
    Ok(client)
}

fn print_operations(resource: Option<&str>) -> Result<()> {
    let names = match resource {
        Some(r) => vec![r],
        None => RESOURCES.to_vec(),
    };
    for name in names {
        let ops = operations_for(name).ok_or_else(|| anyhow!("Unknown resource '{}'", name))?;
        for op in ops {
            println!("{:<12} {:<16} {}", name, op.name, op.method);
        }
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let result = match cli.command {
        Command::Operations { resource } => return print_operations(resource.as_deref()),
        Command::Resource {
            resource,
            operation,
            params,
        } => {
            if operations_for(&resource).is_none() {
                bail!(
                    "Unknown resource '{}' (expected one of: {})",
                    resource,
                    RESOURCES.join(", ")
                );
            }
            let client = connect()?;
            resources::invoke(&client, &resource, &operation, params, !cli.raw)?
        }
        Command::Call { method, params } => {
            let client = connect()?;
            let trim = if cli.raw { TrimPolicy::full() } else { TrimPolicy::default() };
            client.call(&method, params, &trim)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging (stderr, so stdout stays pipeable JSON)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "saplo=info".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
