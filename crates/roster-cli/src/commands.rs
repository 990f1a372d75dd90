use anyhow::{bail, Context};
use colored::Colorize;
use roster_api::Procedure;
use roster_protocol::{display_code, ErrorEnvelope};
use roster_server::{RosterServer, ServerConfig};
use serde_json::{json, Value};

use crate::cli::*;
use crate::client::{CallError, RpcClient};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args),
        Command::Procedures => cmd_procedures(cli.format),
        Command::Call(args) => cmd_call(args, cli.format),
    }
}

/// Defaults, then the config file, then `PORT`/`HOST`/`ROSTER_ENV`, then
/// flags.
fn server_config(args: &ServeArgs) -> anyhow::Result<ServerConfig> {
    let base = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServerConfig::default(),
    };
    let mut config = base.with_process_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.dev {
        config.dev_mode = true;
    }
    config.validate()?;
    Ok(config)
}

fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let config = server_config(&args)?;
    println!(
        "{} Roster server on {}{}",
        "▶".green().bold(),
        config.bind_addr().to_string().bold(),
        if config.dev_mode { " (development)".yellow().to_string() } else { String::new() }
    );
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(RosterServer::new(config).serve())?;
    Ok(())
}

fn cmd_procedures(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<Value> = Procedure::ALL
                .iter()
                .map(|p| {
                    json!({
                        "name": p.name(),
                        "kind": p.kind(),
                        "input": p.input_shape(),
                        "output": p.output_shape(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Text => {
            for p in Procedure::ALL {
                println!(
                    "{:<12} {:<9} {:<14} -> {}",
                    p.name().bold(),
                    p.kind().to_string().cyan(),
                    p.input_shape(),
                    p.output_shape()
                );
            }
        }
    }
    Ok(())
}

fn cmd_call(args: CallArgs, format: OutputFormat) -> anyhow::Result<()> {
    let Some(procedure) = Procedure::from_name(&args.procedure) else {
        bail!(
            "unknown procedure {:?}; run `roster procedures` to list them",
            args.procedure
        );
    };
    let input: Option<Value> = args
        .input
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("--input is not valid JSON")?;

    let client = RpcClient::new(args.url);
    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(client.call(procedure, input.as_ref())) {
        Ok(data) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
                OutputFormat::Text => {
                    println!("{} {}", "✓".green().bold(), procedure.name().bold());
                    println!("{}", serde_json::to_string_pretty(&data)?);
                }
            }
            Ok(())
        }
        Err(CallError::Rpc(envelope)) => {
            print_rpc_error(&envelope, format)?;
            bail!("{} failed", procedure.name())
        }
        Err(other) => Err(other.into()),
    }
}

fn print_rpc_error(envelope: &ErrorEnvelope, format: OutputFormat) -> anyhow::Result<()> {
    let display = display_code(&envelope.data.code);
    match format {
        OutputFormat::Json => {
            let mut value = serde_json::to_value(envelope)?;
            value["displayCode"] = json!(display);
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} ({}): {}",
                "✗".red().bold(),
                display.red().bold(),
                envelope.data.code.as_str().dimmed(),
                envelope.message
            );
            for issue in envelope.data.issues.iter().flatten() {
                println!("  {} {}", "-".dimmed(), issue);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        let mut full = vec!["roster", "serve"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Command::Serve(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "host = \"0.0.0.0\"\nport = 4100").unwrap();
        let path = file.path().to_str().unwrap();
        let args = serve_args(&["--config", path, "--port", "4200", "--dev"]);
        let config = server_config(&args).unwrap();
        assert_eq!(config.port, 4200);
        assert!(config.dev_mode);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let args = serve_args(&["--config", "/nonexistent/roster.toml"]);
        let err = server_config(&args).unwrap_err();
        assert!(err.to_string().contains("loading config"));
    }

    #[test]
    fn unknown_procedure_is_rejected_before_any_request() {
        let args = CallArgs {
            procedure: "updateUser".into(),
            input: None,
            url: "http://127.0.0.1:9".into(),
        };
        let err = cmd_call(args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("unknown procedure"));
    }

    #[test]
    fn bad_input_json_is_rejected() {
        let args = CallArgs {
            procedure: "getUserById".into(),
            input: Some("{not json".into()),
            url: "http://127.0.0.1:9".into(),
        };
        let err = cmd_call(args, OutputFormat::Text).unwrap_err();
        assert!(err.to_string().contains("--input"));
    }
}
