//! CC-Admin: Credential-Chain admin CLI
//!
//! Runs one record invocation against a JSON-file ledger and prints the
//! payload. Failures print `<ErrorKind>: <message>` and exit with status 1.

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use cc_admin::{render, run, AdminRequest};
use cc_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};

/// CC-Admin: run a record invocation
#[derive(Parser, Debug)]
#[command(name = "cc-admin", version)]
#[command(about = "Run one academic-record invocation against a file-backed ledger")]
struct Args {
    /// Caller identity
    #[arg(short, long)]
    identity: String,

    /// Caller organization
    #[arg(short, long)]
    org: String,

    /// Ledger file (JSON)
    #[arg(short, long, default_value = "ledger.json")]
    ledger: PathBuf,

    /// Workflow config file (JSON); defaults to CC_* environment variables
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print Prometheus metrics to stderr after the invocation
    #[arg(long)]
    print_metrics: bool,

    /// Function name, e.g. addStudent
    function: String,

    /// Positional arguments of the function
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();
    init_telemetry(&TelemetryConfig::from_env())?;

    let outcome = run(&AdminRequest {
        identity: args.identity,
        org: args.org,
        ledger: args.ledger,
        config: args.config,
        function: args.function.clone(),
        args: args.args,
    })?;

    if args.print_metrics {
        eprint!("{}", gather_metrics()?);
    }

    match outcome {
        Ok(response) => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", render(&args.function, &response))?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{}: {}", e.kind(), e);
            Ok(ExitCode::FAILURE)
        }
    }
}
