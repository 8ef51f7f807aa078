//! muonc - send one command to a running muon and print the response.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use muon::config::DEFAULT_SOCKET;
use muon::ipc::{format_command, send_command};

/// Send a command to muon, e.g. `muonc root-size +0.05`
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path of the control socket
    #[arg(short, long, env = "MUON_SOCKET", default_value = DEFAULT_SOCKET)]
    socket: PathBuf,

    /// Command and its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    command: Vec<String>,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    if args.command.is_empty() {
        eprintln!("error: arguments");
        return Ok(ExitCode::FAILURE);
    }

    let response = send_command(&args.socket, &format_command(&args.command))?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(response.as_bytes())?;
    stdout.flush()?;

    Ok(ExitCode::SUCCESS)
}
