use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "roster",
    about = "Roster: in-memory user directory over typed RPC",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the Roster server
    Serve(ServeArgs),
    /// List the procedures the server exposes
    Procedures,
    /// Call a procedure on a running server
    Call(CallArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML config file; flags and environment override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub host: Option<IpAddr>,
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
    /// Expose internal error messages to clients
    #[arg(long)]
    pub dev: bool,
}

#[derive(Args)]
pub struct CallArgs {
    /// Procedure name, e.g. getUserById
    pub procedure: String,
    /// JSON input, e.g. '"1"' or '{"name":"Dana","email":"dana@x.com"}'
    #[arg(short, long)]
    pub input: Option<String>,
    /// Server base URL
    #[arg(long, default_value = "http://127.0.0.1:4000", env = "ROSTER_URL")]
    pub url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_call() {
        let cli = Cli::try_parse_from([
            "roster", "call", "getUserById", "--input", "\"1\"", "--format", "json",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        match cli.command {
            Command::Call(args) => {
                assert_eq!(args.procedure, "getUserById");
                assert_eq!(args.input.as_deref(), Some("\"1\""));
            }
            _ => panic!("expected call"),
        }
    }

    #[test]
    fn parses_serve_flags() {
        let cli = Cli::try_parse_from(["roster", "serve", "--port", "5000", "--dev"]).unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(5000));
                assert!(args.dev);
                assert!(args.host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }
}
